//! Operation record types mirroring the service wire contract.
//!
//! Field names and enum string values must match the remote service
//! exactly; these are serialization contracts, not internal conveniences.
//! `config` blocks are immutable inputs: they are set at creation and the
//! service echoes them back unchanged on every fetch.
//!
//! All timestamps are RFC 3339 strings as reported by the service. They
//! are only parsed where ordering matters (see [`crate::merge`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::status::{AttackStatus, JobStatus};

// ──────────────────────────────────────────────
// Attacks
// ──────────────────────────────────────────────

/// Over-the-air attack technique to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    Deauth,
    Pmkid,
    WpsPixie,
    WpsPin,
    HandshakeCapture,
    FakeAp,
    WepFrag,
    WepChop,
    WepArpReplay,
}

/// Immutable input parameters for an attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackConfig {
    pub target_bssid: String,
    pub target_essid: String,
    pub attack_type: AttackType,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    /// 0 = continuous.
    #[serde(default)]
    pub deauth_count: Option<u32>,
    #[serde(default)]
    pub channel: Option<u16>,
    pub interface: String,
}

/// Terminal-state payload of an attack. Immutable once observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackResult {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub handshake_file: Option<String>,
    #[serde(default)]
    pub pmkid_file: Option<String>,
    #[serde(default)]
    pub wps_pin: Option<String>,
    #[serde(default)]
    pub wep_key: Option<String>,
    #[serde(default)]
    pub capture_files: Vec<String>,
    #[serde(default)]
    pub packets_sent: u64,
    pub duration_seconds: f64,
}

/// One tracked attack as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    pub id: String,
    pub config: AttackConfig,
    pub status: AttackStatus,
    pub started_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub result: Option<AttackResult>,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub progress_percent: f64,
}

// ──────────────────────────────────────────────
// Cracking jobs
// ──────────────────────────────────────────────

/// Hashcat attack mode for a cracking job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrackMode {
    Wordlist,
    Mask,
    HybridWm,
    HybridMw,
    Combinator,
}

/// GPU provider backing a cracking job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpuProvider {
    Vastai,
    Lambda,
    Runpod,
    Local,
}

/// Immutable input parameters for a cracking job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrackingJobConfig {
    pub handshake_file: String,
    pub bssid: String,
    pub essid: String,
    pub attack_mode: CrackMode,
    #[serde(default)]
    pub wordlist_path: Option<String>,
    #[serde(default)]
    pub wordlist_name: Option<String>,
    #[serde(default)]
    pub mask: Option<String>,
    #[serde(default)]
    pub rules_file: Option<String>,
    pub gpu_provider: GpuProvider,
    pub max_cost_usd: f64,
    pub timeout_minutes: u32,
}

/// Provisioned GPU instance a job is running on, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuInstance {
    pub instance_id: String,
    pub provider: GpuProvider,
    pub gpu_model: String,
    pub gpu_count: u32,
    pub cost_per_hour: f64,
    pub status: String,
    #[serde(default)]
    pub ip_address: Option<String>,
}

/// Advisory progress snapshot for a cracking job.
///
/// `status` here duplicates the job status for display purposes only; the
/// job record's own `status` field is the one the tracker acts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrackingProgress {
    pub job_id: String,
    pub status: JobStatus,
    pub progress_percent: f64,
    pub speed_mh_per_sec: f64,
    pub tried_passwords: u64,
    #[serde(default)]
    pub total_passwords: Option<u64>,
    #[serde(default)]
    pub eta_seconds: Option<u64>,
    #[serde(default)]
    pub current_wordlist_position: Option<u64>,
}

/// One tracked password-cracking job as reported by the service.
///
/// `cost_usd` is a decimal string on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrackingJob {
    pub id: String,
    pub config: CrackingJobConfig,
    pub status: JobStatus,
    #[serde(default)]
    pub gpu_instance: Option<GpuInstance>,
    pub progress: CrackingProgress,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub cost_usd: Decimal,
    pub created_at: String,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub logs: Vec<String>,
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

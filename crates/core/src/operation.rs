//! The `Operation` abstraction shared by both tracked record kinds.
//!
//! Attacks and cracking jobs have the same lifecycle shape: an opaque id,
//! an immutable config, a forward-directed status machine, and a
//! terminal-state payload. The store, lifecycle controller, and poll
//! scheduler are generic over this trait so both kinds run through the
//! same machinery.

use crate::merge;
use crate::record::{Attack, CrackingJob, CrackingJobConfig};

/// Pre-flight validation failure. Never reaches the remote service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },
}

/// One tracked, server-executed operation.
pub trait Operation: Clone + Send + Sync + 'static {
    /// Immutable creation parameters for this kind.
    type Config: Clone + Send + Sync + 'static;

    /// Human-readable kind name, used in diagnostics.
    const KIND: &'static str;

    /// Service-assigned identifier, immutable once set.
    fn id(&self) -> &str;

    /// Wire name of the current status.
    fn status_name(&self) -> &'static str;

    /// Whether the current status permits no further transition.
    fn is_terminal(&self) -> bool;

    /// Whether a stop command is accepted from the current status.
    fn is_stoppable(&self) -> bool;

    /// Validate a config locally before any remote call.
    fn validate(config: &Self::Config) -> Result<(), ValidationError>;

    /// Combine a locally held record with a freshly fetched remote one.
    ///
    /// Deterministic and pure; see [`crate::merge`] for the rules.
    fn reconcile(local: &Self, remote: Self) -> Self;
}

impl Operation for Attack {
    type Config = crate::record::AttackConfig;

    const KIND: &'static str = "attack";

    fn id(&self) -> &str {
        &self.id
    }

    fn status_name(&self) -> &'static str {
        self.status.name()
    }

    fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    fn is_stoppable(&self) -> bool {
        self.status.is_stoppable()
    }

    fn validate(config: &Self::Config) -> Result<(), ValidationError> {
        require(&config.target_bssid, "target_bssid")?;
        require(&config.interface, "interface")?;
        Ok(())
    }

    fn reconcile(local: &Self, remote: Self) -> Self {
        merge::reconcile_attack(local, remote)
    }
}

impl Operation for CrackingJob {
    type Config = CrackingJobConfig;

    const KIND: &'static str = "cracking job";

    fn id(&self) -> &str {
        &self.id
    }

    fn status_name(&self) -> &'static str {
        self.status.name()
    }

    fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    fn is_stoppable(&self) -> bool {
        self.status.is_stoppable()
    }

    fn validate(config: &Self::Config) -> Result<(), ValidationError> {
        require(&config.handshake_file, "handshake_file")?;
        require(&config.bssid, "bssid")?;
        require(&config.essid, "essid")?;
        Ok(())
    }

    fn reconcile(local: &Self, remote: Self) -> Self {
        merge::reconcile_job(local, remote)
    }
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AttackConfig, AttackType, CrackMode, GpuProvider};

    fn attack_config() -> AttackConfig {
        AttackConfig {
            target_bssid: "00:11:22:33:44:55".into(),
            target_essid: "CoffeeShop".into(),
            attack_type: AttackType::Deauth,
            duration_seconds: Some(30),
            deauth_count: Some(0),
            channel: None,
            interface: "wlan0mon".into(),
        }
    }

    fn job_config() -> CrackingJobConfig {
        CrackingJobConfig {
            handshake_file: "/tmp/hs.cap".into(),
            bssid: "00:11:22:33:44:55".into(),
            essid: "CoffeeShop".into(),
            attack_mode: CrackMode::Wordlist,
            wordlist_path: None,
            wordlist_name: None,
            mask: None,
            rules_file: None,
            gpu_provider: GpuProvider::Local,
            max_cost_usd: 10.0,
            timeout_minutes: 120,
        }
    }

    #[test]
    fn valid_configs_pass() {
        assert!(Attack::validate(&attack_config()).is_ok());
        assert!(CrackingJob::validate(&job_config()).is_ok());
    }

    #[test]
    fn attack_requires_target_and_interface() {
        let mut config = attack_config();
        config.target_bssid = String::new();
        assert_eq!(
            Attack::validate(&config),
            Err(ValidationError::MissingField {
                field: "target_bssid"
            })
        );

        let mut config = attack_config();
        config.interface = "   ".into();
        assert_eq!(
            Attack::validate(&config),
            Err(ValidationError::MissingField { field: "interface" })
        );
    }

    #[test]
    fn job_requires_handshake_bssid_essid() {
        for (field, mutate) in [
            (
                "handshake_file",
                Box::new(|c: &mut CrackingJobConfig| c.handshake_file.clear())
                    as Box<dyn Fn(&mut CrackingJobConfig)>,
            ),
            ("bssid", Box::new(|c: &mut CrackingJobConfig| c.bssid.clear())),
            ("essid", Box::new(|c: &mut CrackingJobConfig| c.essid.clear())),
        ] {
            let mut config = job_config();
            mutate(&mut config);
            assert_eq!(
                CrackingJob::validate(&config),
                Err(ValidationError::MissingField { field })
            );
        }
    }
}

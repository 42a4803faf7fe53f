//! rfops -- operation console for a remote wireless assessment service.
//!
//! The service executes the actual attacks and cracking jobs; this binary
//! launches them, polls their status, and follows them to completion.

mod config;
mod runner;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use rfops_client::ApiClient;
use rfops_core::{
    Attack, AttackConfig, AttackType, CrackMode, CrackingJob, CrackingJobConfig, GpuProvider,
    Operation,
};
use rfops_tracker::{LifecycleController, OperationStore, PollScheduler};

use config::Config;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "rfops", version, about = "Operation console for the rfops service")]
struct Cli {
    /// Path to a config file (default: ./rfops.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the remote service (overrides the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress progress output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch an attack and follow it to completion
    Attack {
        /// Target BSSID (AP MAC address)
        #[arg(long)]
        bssid: String,
        /// Target ESSID (network name)
        #[arg(long, default_value = "Unknown")]
        essid: String,
        /// Attack technique
        #[arg(long = "type", value_enum, default_value = "handshake-capture")]
        attack_type: AttackTypeArg,
        /// Monitor-mode interface to attack from
        #[arg(long)]
        interface: String,
        /// Channel of the target AP
        #[arg(long)]
        channel: Option<u16>,
        /// Attack duration in seconds
        #[arg(long, default_value_t = 300)]
        duration: u32,
        /// Number of deauth frames (0 = continuous)
        #[arg(long, default_value_t = 0)]
        deauth_count: u32,
        /// Launch and print the record without following it
        #[arg(long)]
        no_follow: bool,
    },

    /// Create a cracking job and follow it to completion
    Crack {
        /// Captured handshake file on the service host
        #[arg(long)]
        handshake: String,
        /// BSSID the handshake belongs to
        #[arg(long)]
        bssid: String,
        /// ESSID the handshake belongs to
        #[arg(long)]
        essid: String,
        /// Hashcat attack mode
        #[arg(long, value_enum, default_value = "wordlist")]
        mode: CrackModeArg,
        /// Wordlist name known to the service
        #[arg(long)]
        wordlist: Option<String>,
        /// Mask for mask/hybrid modes
        #[arg(long)]
        mask: Option<String>,
        /// GPU provider to run on
        #[arg(long, value_enum, default_value = "local")]
        provider: GpuProviderArg,
        /// Spend ceiling in USD
        #[arg(long, default_value_t = 10.0)]
        max_cost: f64,
        /// Give up after this many minutes
        #[arg(long, default_value_t = 120)]
        timeout_minutes: u32,
        /// Launch and print the record without following it
        #[arg(long)]
        no_follow: bool,
    },

    /// Check service liveness
    Health,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AttackTypeArg {
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

impl From<AttackTypeArg> for AttackType {
    fn from(arg: AttackTypeArg) -> Self {
        match arg {
            AttackTypeArg::Deauth => AttackType::Deauth,
            AttackTypeArg::Pmkid => AttackType::Pmkid,
            AttackTypeArg::WpsPixie => AttackType::WpsPixie,
            AttackTypeArg::WpsPin => AttackType::WpsPin,
            AttackTypeArg::HandshakeCapture => AttackType::HandshakeCapture,
            AttackTypeArg::FakeAp => AttackType::FakeAp,
            AttackTypeArg::WepFrag => AttackType::WepFrag,
            AttackTypeArg::WepChop => AttackType::WepChop,
            AttackTypeArg::WepArpReplay => AttackType::WepArpReplay,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CrackModeArg {
    Wordlist,
    Mask,
    HybridWm,
    HybridMw,
    Combinator,
}

impl From<CrackModeArg> for CrackMode {
    fn from(arg: CrackModeArg) -> Self {
        match arg {
            CrackModeArg::Wordlist => CrackMode::Wordlist,
            CrackModeArg::Mask => CrackMode::Mask,
            CrackModeArg::HybridWm => CrackMode::HybridWm,
            CrackModeArg::HybridMw => CrackMode::HybridMw,
            CrackModeArg::Combinator => CrackMode::Combinator,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GpuProviderArg {
    Vastai,
    Lambda,
    Runpod,
    Local,
}

impl From<GpuProviderArg> for GpuProvider {
    fn from(arg: GpuProviderArg) -> Self {
        match arg {
            GpuProviderArg::Vastai => GpuProvider::Vastai,
            GpuProviderArg::Lambda => GpuProvider::Lambda,
            GpuProviderArg::Runpod => GpuProvider::Runpod,
            GpuProviderArg::Local => GpuProvider::Local,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = match config::load(cli.config.as_deref(), cli.api_url.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    };

    let outcome = match cli.command {
        Commands::Attack {
            bssid,
            essid,
            attack_type,
            interface,
            channel,
            duration,
            deauth_count,
            no_follow,
        } => {
            let attack_config = AttackConfig {
                target_bssid: bssid,
                target_essid: essid,
                attack_type: attack_type.into(),
                duration_seconds: Some(duration),
                deauth_count: Some(deauth_count),
                channel,
                interface,
            };
            cmd_launch::<Attack>(
                &config,
                attack_config,
                Duration::from_secs(config.attack_poll_secs),
                no_follow,
                cli.output,
                cli.quiet,
                attack_line,
            )
            .await
        }

        Commands::Crack {
            handshake,
            bssid,
            essid,
            mode,
            wordlist,
            mask,
            provider,
            max_cost,
            timeout_minutes,
            no_follow,
        } => {
            let job_config = CrackingJobConfig {
                handshake_file: handshake,
                bssid,
                essid,
                attack_mode: mode.into(),
                wordlist_path: None,
                wordlist_name: wordlist,
                mask,
                rules_file: None,
                gpu_provider: provider.into(),
                max_cost_usd: max_cost,
                timeout_minutes,
            };
            cmd_launch::<CrackingJob>(
                &config,
                job_config,
                Duration::from_secs(config.job_poll_secs),
                no_follow,
                cli.output,
                cli.quiet,
                job_line,
            )
            .await
        }

        Commands::Health => cmd_health(&config, cli.output).await,
    };

    if let Err(err) = outcome {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

/// Launch one operation, optionally follow it, and print the final record.
async fn cmd_launch<O>(
    config: &Config,
    op_config: O::Config,
    interval: Duration,
    no_follow: bool,
    output: OutputFormat,
    quiet: bool,
    render: fn(&O) -> String,
) -> Result<(), String>
where
    O: Operation + serde::Serialize,
    ApiClient: rfops_client::CommandClient<O>,
{
    let client = Arc::new(ApiClient::new(&config.api_url));
    let store: Arc<OperationStore<O>> = Arc::new(OperationStore::new());
    let controller = LifecycleController::new(Arc::clone(&store), Arc::clone(&client));
    let mut scheduler = PollScheduler::new(store, client, interval);

    let launched = controller
        .launch(op_config)
        .await
        .map_err(|err| err.to_string())?;
    if !quiet {
        eprintln!(
            "launched {} '{}' ({})",
            O::KIND,
            launched.id(),
            launched.status_name()
        );
    }

    let final_record = if no_follow {
        launched
    } else {
        runner::follow(&controller, &mut scheduler, launched.id(), quiet, render).await?
    };

    print_record(&final_record, output, render);
    Ok(())
}

fn print_record<O>(record: &O, output: OutputFormat, render: fn(&O) -> String)
where
    O: Operation + serde::Serialize,
{
    match output {
        OutputFormat::Json => match serde_json::to_string_pretty(record) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("Error: failed to encode record: {err}"),
        },
        OutputFormat::Text => println!("{}", render(record)),
    }
}

fn attack_line(attack: &Attack) -> String {
    let mut line = format!(
        "[{}] {} {:.1}%",
        attack.status.name(),
        attack.config.target_bssid,
        attack.progress_percent
    );
    if let Some(log) = attack.logs.last() {
        line.push_str(&format!("  {log}"));
    }
    if let Some(result) = &attack.result {
        line.push_str(&format!("  {}", result.message));
        if let Some(handshake) = &result.handshake_file {
            line.push_str(&format!("  handshake: {handshake}"));
        }
    }
    line
}

fn job_line(job: &CrackingJob) -> String {
    let mut line = format!(
        "[{}] {} {:.1}%  {:.1} MH/s  ${}",
        job.status.name(),
        job.config.essid,
        job.progress.progress_percent,
        job.progress.speed_mh_per_sec,
        job.cost_usd
    );
    if let Some(password) = &job.password {
        line.push_str(&format!("  password: {password}"));
    }
    line
}

async fn cmd_health(config: &Config, output: OutputFormat) -> Result<(), String> {
    let client = ApiClient::new(&config.api_url);
    let health = client.health().await.map_err(|err| err.to_string())?;
    match output {
        OutputFormat::Json => println!("{}", serde_json::json!({ "status": health.status })),
        OutputFormat::Text => println!("service is {} at {}", health.status, config.api_url),
    }
    Ok(())
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

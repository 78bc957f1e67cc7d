mod config_cmd;
mod document_cmd;
mod safety_cmd;
mod speech_cmd;
mod translate_cmd;
mod vision_cmd;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use cogforge_config::CogForgeConfig;
use cogforge_report::{write_report, AnalysisOutcome};

#[derive(Parser)]
#[command(name = "cogforge")]
#[command(about = "cogforge: run cognitive service samples from the terminal")]
#[command(version)]
struct Cli {
    /// Config file (YAML or JSON); discovered when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level or filter directive, e.g. `debug` or `cogforge_core=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Directory for the daily rolling JSON log
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Content moderation, prompt shields, protected material and blocklists
    #[command(subcommand)]
    Safety(safety_cmd::SafetyCommand),
    /// Image analysis, face detection and custom vision predictions
    #[command(subcommand)]
    Vision(vision_cmd::VisionCommand),
    /// Prebuilt document models
    #[command(subcommand)]
    Document(document_cmd::DocumentCommand),
    /// Synthesis, recognition, speech translation and speaker verification
    #[command(subcommand)]
    Speech(speech_cmd::SpeechCommand),
    /// Text and document translation
    #[command(subcommand)]
    Translate(translate_cmd::TranslateCommand),
    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(config_cmd::ConfigCommand),
}

/// One printable result and the line shown above it.
#[derive(Debug)]
pub(crate) struct Report {
    pub label: String,
    pub outcome: AnalysisOutcome,
}

impl Report {
    pub fn new(label: impl Into<String>, outcome: AnalysisOutcome) -> Self {
        Self {
            label: label.into(),
            outcome,
        }
    }

    pub fn unlabeled(outcome: AnalysisOutcome) -> Self {
        Self::new(String::new(), outcome)
    }
}

/// Read a local input file, falling back to the bundled sample path.
pub(crate) async fn read_input(path: Option<&Path>, sample: &str) -> Result<Bytes> {
    let path = path.unwrap_or_else(|| Path::new(sample));
    Ok(cogforge_core::load_local_file(path).await?)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        report_failure(&err);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // `config init` must work when the existing file is unreadable.
    if let Commands::Config(config_cmd::ConfigCommand::Init { path, force }) = &cli.command {
        cogforge_logging::init_logger(cli.log_level.as_deref().unwrap_or("info"), None)
            .context("Failed to initialize logging")?;
        return config_cmd::init(path.as_deref(), *force).await;
    }

    let config = cogforge_config::load(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.log_level().to_string());
    let log_dir = cli.log_dir.clone().or_else(|| config.log_dir());
    cogforge_logging::init_logger(&level, log_dir.as_deref())
        .context("Failed to initialize logging")?;
    cogforge_config::log_findings(&config);

    let reports = dispatch(cli.command, &config).await?;
    print_reports(&reports)
}

async fn dispatch(command: Commands, config: &CogForgeConfig) -> Result<Vec<Report>> {
    match command {
        Commands::Safety(cmd) => safety_cmd::run(cmd, config).await,
        Commands::Vision(cmd) => vision_cmd::run(cmd, config).await,
        Commands::Document(cmd) => document_cmd::run(cmd, config).await,
        Commands::Speech(cmd) => speech_cmd::run(cmd, config).await,
        Commands::Translate(cmd) => translate_cmd::run(cmd, config).await,
        Commands::Config(cmd) => {
            config_cmd::run(cmd, config).await?;
            Ok(Vec::new())
        }
    }
}

fn print_reports(reports: &[Report]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for report in reports {
        write_report(&mut out, &report.outcome, &report.label)
            .context("Failed to write report to stdout")?;
    }
    out.flush().context("Failed to flush stdout")?;
    Ok(())
}

/// The one place errors are reported: log, print the cause chain, exit 1.
fn report_failure(err: &anyhow::Error) -> ! {
    tracing::error!(error = %cogforge_logging::redact_sensitive_data(&format!("{err:#}")), "Command failed");
    eprint!("{}", failure_text(err, std::env::var_os("RUST_BACKTRACE").is_some()));
    std::process::exit(1);
}

fn failure_text(err: &anyhow::Error, with_backtrace: bool) -> String {
    let mut text = format!(
        "Error: {}\n",
        cogforge_logging::redact_sensitive_data(&err.to_string())
    );
    for cause in err.chain().skip(1) {
        text.push_str(&format!(
            "  caused by: {}\n",
            cogforge_logging::redact_sensitive_data(&cause.to_string())
        ));
    }
    if with_backtrace {
        text.push_str(&format!("\nBacktrace:\n{}\n", err.backtrace()));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogforge_core::CogError;

    #[test]
    fn failure_text_lists_cause_chain() {
        let err = anyhow::Error::from(CogError::configuration(
            "ContentSafety:Endpoint is not configured",
        ))
        .context("Failed to build the moderation client");
        let text = failure_text(&err, false);
        assert_eq!(
            text,
            "Error: Failed to build the moderation client\n  caused by: configuration error: ContentSafety:Endpoint is not configured\n"
        );
    }

    #[test]
    fn failure_text_masks_keys() {
        let err = anyhow::anyhow!("request to https://x.example/?key=0123456789abcdef0123456789abcdef failed");
        let text = failure_text(&err, false);
        assert!(!text.contains("0123456789abcdef0123456789abcdef"));
    }

    #[test]
    fn parses_nested_subcommands_with_globals() {
        let cli = Cli::try_parse_from([
            "cogforge",
            "--log-level",
            "debug",
            "safety",
            "text",
            "hello there",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(
            cli.command,
            Commands::Safety(safety_cmd::SafetyCommand::Text { text: Some(ref t) }) if t == "hello there"
        ));
    }

    #[test]
    fn subcommands_accept_no_arguments() {
        for args in [
            &["cogforge", "safety", "shield"][..],
            &["cogforge", "vision", "faces"],
            &["cogforge", "document", "invoice"],
            &["cogforge", "speech", "synthesize"],
            &["cogforge", "translate", "text"],
            &["cogforge", "config", "check"],
        ] {
            assert!(Cli::try_parse_from(args).is_ok(), "{args:?}");
        }
    }

    #[tokio::test]
    async fn unusable_log_dir_fails_before_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.yaml");
        std::fs::write(&config, "logging:\n  level: warn\n").unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let args: Vec<std::ffi::OsString> = vec![
            "cogforge".into(),
            "--config".into(),
            config.into(),
            "--log-dir".into(),
            blocker.join("logs").into(),
            "config".into(),
            "check".into(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let err = run(cli).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to initialize logging");
    }

    #[tokio::test]
    async fn missing_input_is_local_resource_error() {
        let err = read_input(None, "does/not/exist.wav").await.unwrap_err();
        let cog = err.downcast_ref::<CogError>().unwrap();
        assert!(matches!(cog, CogError::LocalResource { .. }));
    }
}

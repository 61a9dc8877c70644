//! CLI entrypoint for Ethos Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use council_application::{
    DeliberateError, DeliberateUseCase, ProgressNotifier, SpecialistRegistry,
};
use council_infrastructure::{
    ConfigLoader, FileConfig, FileOutputFormat, InMemoryHistory, JsonlAuditSink,
};
use council_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress};
use std::io::{IsTerminal, Read};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = load_config(&cli)?;
    if !config.output.color {
        ConsoleFormatter::set_color(false);
    }

    info!("Starting Ethos Council");

    let content = match cli.content.clone() {
        Some(content) => content,
        None => read_stdin()?,
    };
    let context = cli.moderation_context().map_err(|e| anyhow!(e))?;

    let mut params = config.to_params();
    if let Some(ms) = cli.timeout_ms {
        if ms == 0 {
            bail!("--timeout-ms must be greater than 0");
        }
        params = params.with_specialist_timeout(Duration::from_millis(ms));
    }

    // === Dependency Injection ===
    let registry = Arc::new(build_registry(&config, &cli.specialist)?);

    let mut use_case =
        DeliberateUseCase::new(registry, params).with_history(Arc::new(InMemoryHistory::new()));

    if config.audit.enabled {
        let sink = JsonlAuditSink::open(&config.audit.path)
            .with_context(|| format!("Failed to open audit file {}", config.audit.path))?;
        info!("Writing audit records to {}", sink.path().display());
        use_case = use_case.with_audit_sink(Arc::new(sink));
    }

    if !cli.quiet && config.output.show_progress {
        let progress: Arc<dyn ProgressNotifier> = if std::io::stderr().is_terminal() {
            Arc::new(ProgressReporter::new())
        } else {
            Arc::new(SimpleProgress)
        };
        use_case = use_case.with_progress(progress);
    }

    // Ctrl-C cancels the deliberation
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling deliberation");
            signal_token.cancel();
        }
    });

    let outcome = match use_case
        .deliberate_with_cancellation(content, context, token)
        .await
    {
        Ok(outcome) => outcome,
        Err(DeliberateError::Cancelled) => bail!("Deliberation cancelled"),
        Err(e) => return Err(e.into()),
    };

    use_case.flush_audit().await;

    let format = cli
        .output
        .or_else(|| config.output.format.map(output_format))
        .unwrap_or(OutputFormat::Full);
    let output = match format {
        OutputFormat::Full => ConsoleFormatter::format(&outcome),
        OutputFormat::Verdict => ConsoleFormatter::format_verdict(&outcome),
        OutputFormat::Json => ConsoleFormatter::format_json(&outcome),
    };

    println!("{}", output);

    Ok(())
}

/// Initialize logging based on verbosity level, optionally mirrored to daily log files
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "ethos-council.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(EnvFilter::new(level))
                .with(stderr_layer)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(EnvFilter::new(level))
                .with(stderr_layer)
                .init();
            Ok(None)
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            error!("Config: {}", issue);
        }
        bail!(
            "Invalid configuration: {}",
            issues
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        );
    }
    Ok(config)
}

/// Register the configured specialists, narrowed to `only` when given
fn build_registry(config: &FileConfig, only: &[String]) -> Result<SpecialistRegistry> {
    let mut specialists = config.build_specialists()?;

    if !only.is_empty() {
        let available: Vec<&str> = specialists.iter().map(|s| s.id().as_str()).collect();
        let unknown: Vec<&str> = only
            .iter()
            .map(String::as_str)
            .filter(|id| !available.contains(id))
            .collect();
        if !unknown.is_empty() {
            bail!(
                "Unknown specialist(s): {} (available: {})",
                unknown.join(", "),
                available.join(", ")
            );
        }
        specialists.retain(|s| only.iter().any(|id| id == s.id().as_str()));
    }

    let registry = SpecialistRegistry::new();
    for specialist in specialists {
        registry.register(specialist)?;
    }
    Ok(registry)
}

fn read_stdin() -> Result<String> {
    if std::io::stdin().is_terminal() {
        bail!("Content is required. Pass it as an argument or pipe it on stdin.");
    }
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read content from stdin")?;
    Ok(content)
}

fn output_format(format: FileOutputFormat) -> OutputFormat {
    match format {
        FileOutputFormat::Full => OutputFormat::Full,
        FileOutputFormat::Verdict => OutputFormat::Verdict,
        FileOutputFormat::Json => OutputFormat::Json,
    }
}

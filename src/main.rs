use std::{fs, io::Read, path::Path, sync::Arc};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use scamlens::{
    config::load_config,
    core::{
        engine::Engine,
        output::{render, OutputFormat},
        sentiment::LexiconOracle,
    },
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "scamlens",
    about = "Scam-message triage with SSRF-safe link previews"
)]
struct Cli {
    /// Message to analyze; use --stdin to read it from standard input instead
    message: Option<String>,
    /// Read the message from standard input
    #[arg(long)]
    stdin: bool,
    /// Path to config file (TOML). Default: config/scamlens.toml
    #[arg(long)]
    config: Option<String>,
    /// Skip link fetching; report classification only
    #[arg(long)]
    no_fetch: bool,
    /// Output format
    #[arg(long, default_value = "text", value_enum)]
    format: FormatArg,
    /// Optional output file path; stdout when absent
    #[arg(long)]
    output: Option<String>,
    /// Increase verbosity (info, debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Optional log file path
    #[arg(long, default_value = "data/scamlens.log")]
    log_file: String,
}

#[derive(ValueEnum, Clone, Debug)]
enum FormatArg {
    Json,
    Text,
    Md,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Md => OutputFormat::Markdown,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let message = read_message(&cli)?;
    let mut cfg = load_config(cli.config.as_deref())?;
    if cli.no_fetch {
        cfg.fetch_links = false;
    }

    let engine = Engine::new(cfg, Arc::new(LexiconOracle))?;
    let outcome = engine.analyze(&message).await;
    let rendered = render(&outcome, cli.format.clone().into())?;

    match &cli.output {
        Some(path) => {
            let path = Path::new(path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &rendered)?;
            tracing::info!("report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn read_message(cli: &Cli) -> anyhow::Result<String> {
    if cli.stdin {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading message from stdin")?;
        return Ok(buf);
    }
    // A missing argument behaves like an empty message: the engine answers
    // with its sentinel prompt.
    Ok(cli.message.clone().unwrap_or_default())
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_path = Path::new(&cli.log_file);
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    if log_path.exists() {
        if let Ok(meta) = fs::metadata(log_path) {
            if meta.len() > 1_000_000 {
                let rotated = log_path.with_extension("log.1");
                let _ = fs::rename(log_path, rotated);
            }
        }
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(false);

    // Logs go to stderr; stdout carries the rendered report.
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;
    Ok(())
}

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use homarrctl::config::Profile;
use homarrctl::resource::dispatch::{self, Action, ResourceKind};
use homarrctl::{HomarrClient, HomarrError};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Manage Homarr dashboard configuration
#[derive(Parser, Debug)]
#[command(name = "homarrctl", version, about, long_about = None)]
struct Args {
    /// Homarr base URL (falls back to HOMARR_URL, then the config file)
    #[arg(long, global = true)]
    url: Option<String>,

    /// API key for the REST API (falls back to HOMARR_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// authjs.session-token cookie value for tRPC (falls back to HOMARR_SESSION_TOKEN)
    #[arg(long, global = true)]
    session_token: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    /// Resource kind
    #[arg(value_enum)]
    resource: ResourceKind,

    /// Action to perform
    #[arg(value_enum)]
    action: Action,

    /// Resource identifier for get, update and delete
    id: Option<String>,

    /// JSON input for create and update; prefix with @ to read a file
    #[arg(short, long)]
    data: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("homarrctl started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("homarrctl").join("homarrctl.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".homarrctl").join("homarrctl.log");
    }
    PathBuf::from("homarrctl.log")
}

/// Parse `--data`, reading from a file when prefixed with `@`
fn read_data(data: Option<&str>) -> Result<Value> {
    let Some(data) = data else {
        return Ok(Value::Null);
    };

    let text = match data.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {path}"))?,
        None => data.to_string(),
    };

    serde_json::from_str(&text).context("--data is not valid JSON")
}

fn render(value: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}

async fn run(args: Args) -> Result<()> {
    // CLI > environment > config file
    let cli = Profile {
        url: args.url,
        api_key: args.api_key,
        session_token: args.session_token,
    };
    let config = cli
        .merge(Profile::from_env())
        .merge(Profile::load())
        .into_connection()?;

    tracing::info!("Using Homarr at {}", config.base_url());

    let client = HomarrClient::new(config)?;
    let params = read_data(args.data.as_deref())?;

    let result = dispatch::invoke(
        &client,
        args.resource,
        args.action,
        args.id.as_deref(),
        &params,
    )
    .await?;

    println!("{}", render(&result, args.output)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = match setup_logging(args.log_level) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Warning: {err:#}");
            None
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            if let Some(hint) = err.downcast_ref::<HomarrError>().and_then(HomarrError::user_hint) {
                eprintln!("Hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

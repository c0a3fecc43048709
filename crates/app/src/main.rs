mod terminal;

use std::fmt;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::QuestionBank;
use services::{QuizLoopService, RemoteConfig, RemoteGateway, StoreGateway, SubmissionGateway};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--data <questions.json>] [--db <sqlite_url>] [--remote <base_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --data data/questions.json");
    eprintln!();
    eprintln!("Without --db or --remote, answers are not persisted and peer");
    eprintln!("review is unavailable.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DATA, QUIZ_DB_URL, QUIZ_SUBMISSIONS_URL");
}

struct Args {
    data_path: String,
    db_url: Option<String>,
    remote_url: Option<String>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut data_path =
            std::env::var("QUIZ_DATA").unwrap_or_else(|_| "data/questions.json".into());
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let mut remote_url = std::env::var("QUIZ_SUBMISSIONS_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data" => {
                    data_path = require_value(args, "--data")?;
                }
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(value);
                }
                "--remote" => {
                    remote_url = Some(require_value(args, "--remote")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            data_path,
            db_url,
            remote_url,
        })
    }
}

/// Accepts `sqlite::memory:`, a `sqlite:`/`sqlite://` URL, or a bare file
/// path; returns a normalized absolute URL with the backing file created.
fn prepare_sqlite_url(raw: &str) -> Result<String, Box<dyn std::error::Error>> {
    if raw == "sqlite::memory:" {
        return Ok(raw.to_owned());
    }

    let path_str = raw
        .trim()
        .strip_prefix("sqlite://")
        .or_else(|| raw.trim().strip_prefix("sqlite:"))
        .unwrap_or(raw.trim())
        .split('?')
        .next()
        .unwrap_or_default();
    if path_str.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: raw.to_owned(),
        }
        .into());
    }

    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    if let Some(parent) = absolute.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !absolute.exists() {
        std::fs::File::create(&absolute)?;
    }

    Ok(format!("sqlite://{}", absolute.display()))
}

// Persistence selection: remote endpoint wins over a local store; with
// neither, the gateway runs unconfigured and review degrades.
async fn build_gateway(
    args: &Args,
    clock: Clock,
) -> Result<Arc<dyn SubmissionGateway>, Box<dyn std::error::Error>> {
    if let Some(remote_url) = &args.remote_url {
        tracing::info!(url = %remote_url, "using remote submissions endpoint");
        return Ok(Arc::new(RemoteGateway::new(Some(RemoteConfig {
            base_url: remote_url.clone(),
        }))));
    }

    if let Some(raw) = &args.db_url {
        let db_url = prepare_sqlite_url(raw)?;
        let storage = Storage::sqlite(&db_url).await?;
        tracing::info!(url = %db_url, "using local submission store");
        return Ok(Arc::new(StoreGateway::new(clock, storage.submissions)));
    }

    tracing::warn!("no persistence configured; peer review will be unavailable");
    Ok(Arc::new(StoreGateway::unconfigured(clock)))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let data = std::fs::read_to_string(&args.data_path)
        .map_err(|e| format!("cannot read dataset {}: {e}", args.data_path))?;
    let bank = Arc::new(QuestionBank::from_json_str(&data)?);
    tracing::info!(questions = bank.len(), "dataset loaded");

    let clock = Clock::default_clock();
    let gateway = build_gateway(&args, clock).await?;
    let loop_svc = QuizLoopService::new(clock, gateway);
    let session = loop_svc.start_session(bank)?;

    terminal::run(&loop_svc, session).await
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

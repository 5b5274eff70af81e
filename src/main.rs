use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use folio::config::Config;
use folio::http::{FsTransport, Transport};
use folio::market::{MarketClient, MarketConfig, Provider};
use folio::registry::Registry;
use folio::resource::{Layout, Project, Resource, ResourceClient, ResourceConfig, TechShowcase};
use folio::{format_fetch_error, FailSoft};
use serde::Serialize;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Portfolio data client
#[derive(Parser, Debug)]
#[command(name = "folio", version, about, long_about = None)]
struct Args {
    /// Site or API root (http(s) URL or local directory)
    #[arg(short, long, global = true)]
    base_url: Option<String>,

    /// Collection layout under the base location
    #[arg(short, long, global = true, value_parser = parse_layout)]
    layout: Option<Layout>,

    /// Log level for debugging
    #[arg(long, global = true, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Exit with an error instead of printing an empty result
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tech showcase entries
    Tech {
        #[command(subcommand)]
        action: RecordAction,
    },
    /// Portfolio projects
    Project {
        #[command(subcommand)]
        action: RecordAction,
    },
    /// Live market data
    Market {
        /// Data provider
        #[arg(long, value_parser = parse_provider)]
        provider: Option<Provider>,

        /// CORS relay prefix
        #[arg(long)]
        relay: Option<String>,

        #[command(subcommand)]
        action: MarketAction,
    },
    /// Build data/tech.json and data/project.json from an uploads directory
    Export {
        /// Output directory (the site root)
        out: PathBuf,

        /// Uploads directory containing tech/ and projects/
        #[arg(long)]
        uploads: Option<PathBuf>,
    },
    /// Show or edit the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum RecordAction {
    /// List every record
    List,
    /// Show one record by id
    Get {
        id: String,
        /// Use the backend's single-record endpoint
        #[arg(long)]
        direct: bool,
    },
}

#[derive(Subcommand, Debug)]
enum MarketAction {
    /// Search instruments
    Search { query: String },
    /// Single-day price history
    Chart { id: String },
    /// History, current price and change from previous close
    Data { symbol: String },
    /// Chart and current stats, fetched concurrently
    Refresh { id: String },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the saved configuration and the effective resource location
    Show,
    /// Save a default base URL
    SetBaseUrl { url: String },
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

fn parse_layout(s: &str) -> Result<Layout, String> {
    s.parse()
}

fn parse_provider(s: &str) -> Result<Provider, String> {
    s.parse()
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

    tracing::info!("folio started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("folio").join("folio.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".folio").join("folio.log");
    }
    PathBuf::from("folio.log")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Apply the fail-soft policy unless `--strict` was given
fn settle<T: Default>(result: folio::Result<T>, strict: bool, context: &str) -> Result<T> {
    match result {
        Err(e) if strict => Err(anyhow::anyhow!("{}: {}", context, format_fetch_error(&e))),
        other => Ok(other.or_empty(context)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let config = Config::load();

    match &args.command {
        Command::Tech { action } => {
            let resource_config = config.resource_config(args.base_url.as_deref(), args.layout);
            run_records::<TechShowcase>(resource_config, action, args.strict).await
        }
        Command::Project { action } => {
            let resource_config = config.resource_config(args.base_url.as_deref(), args.layout);
            run_records::<Project>(resource_config, action, args.strict).await
        }
        Command::Market {
            provider,
            relay,
            action,
        } => {
            let mut market_config: MarketConfig = config.market.clone();
            if let Some(provider) = provider {
                if *provider != market_config.provider {
                    market_config.base_url = None;
                }
                market_config.provider = *provider;
            }
            if relay.is_some() {
                market_config.cors_relay = relay.clone();
            }
            let client = MarketClient::http(market_config)?;
            run_market(&client, action, args.strict).await
        }
        Command::Export { out, uploads } => {
            let uploads = uploads
                .clone()
                .or_else(|| config.uploads_dir.clone())
                .unwrap_or_else(|| PathBuf::from("uploads"));
            let registry = Registry::new(uploads, config.overrides());
            for path in registry.export(out)? {
                println!("{}", path.display());
            }
            Ok(())
        }
        Command::Config { action } => match action {
            ConfigAction::Show => {
                let effective = config.resource_config(args.base_url.as_deref(), args.layout);
                print_json(&serde_json::json!({
                    "saved": &config,
                    "effective": effective,
                }))
            }
            ConfigAction::SetBaseUrl { url } => {
                let mut config = config;
                config.set_base_url(url)?;
                if let Some(path) = Config::config_path() {
                    println!("Saved {}", path.display());
                }
                Ok(())
            }
        },
    }
}

async fn run_records<R>(config: ResourceConfig, action: &RecordAction, strict: bool) -> Result<()>
where
    R: Resource + Serialize,
{
    tracing::info!("Using {} ({:?})", config.base_url, config.layout);

    if config.is_remote() {
        let client = ResourceClient::http(config)?;
        records_action::<R, _>(&client, action, strict).await
    } else {
        let root = PathBuf::from(&config.base_url);
        let client = ResourceClient::new(
            FsTransport::new(root),
            ResourceConfig::new("", config.layout),
        );
        records_action::<R, _>(&client, action, strict).await
    }
}

async fn records_action<R, T>(
    client: &ResourceClient<T>,
    action: &RecordAction,
    strict: bool,
) -> Result<()>
where
    R: Resource + Serialize,
    T: Transport,
{
    match action {
        RecordAction::List => {
            let records = settle(client.fetch_all::<R>().await, strict, R::KIND.segment())?;
            print_json(&records)
        }
        RecordAction::Get { id, direct: false } => {
            let record = settle(client.fetch::<R>(id).await, strict, R::KIND.segment())?;
            print_json(&record)
        }
        RecordAction::Get { id, direct: true } => {
            let record = settle(
                client.fetch_resource_direct(R::KIND, id).await,
                strict,
                R::KIND.segment(),
            )?;
            print_json(&record)
        }
    }
}

async fn run_market<T: Transport>(
    client: &MarketClient<T>,
    action: &MarketAction,
    strict: bool,
) -> Result<()> {
    match action {
        MarketAction::Search { query } => {
            let quotes = settle(client.search(query).await, strict, "search")?;
            print_json(&quotes)
        }
        MarketAction::Chart { id } => {
            let history = settle(client.fetch_chart(id).await, strict, "chart")?;
            print_json(&history)
        }
        MarketAction::Data { symbol } => {
            let data = settle(client.fetch_market_data(symbol).await, strict, "market data")?;
            print_json(&data)
        }
        MarketAction::Refresh { id } => print_json(&client.refresh(id).await),
    }
}

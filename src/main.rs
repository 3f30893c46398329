use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;
use tabledger::application::ledger::Ledger;
use tabledger::config::LedgerConfig;
use tabledger::domain::payment::PaymentResult;
use tabledger::domain::ports::{SettlementLogBox, TableStoreBox};
use tabledger::infrastructure::gateway::SimulatedGateway;
use tabledger::infrastructure::in_memory::{InMemorySettlementLog, InMemoryTableStore};
use tabledger::interfaces::command::CommandOutcome;
use tabledger::interfaces::csv::command_reader::CommandReader;
use tabledger::interfaces::csv::summary_writer::SummaryWriter;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Output format for the table summaries
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Write the settlement log as CSV to this file
    #[arg(long)]
    settlements: Option<PathBuf>,

    /// Give up on a gateway authorization after this many milliseconds
    #[arg(long, default_value_t = 10_000)]
    gateway_timeout_ms: u64,

    /// Artificial latency of the simulated gateway, in milliseconds
    #[arg(long, default_value_t = 0)]
    gateway_latency_ms: u64,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

#[cfg(feature = "storage-rocksdb")]
fn open_storage(db_path: Option<PathBuf>) -> Result<(TableStoreBox, SettlementLogBox)> {
    use tabledger::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(db_path) => {
            let store = RocksDBStore::open(db_path).into_diagnostic()?;
            Ok((Box::new(store.clone()), Box::new(store)))
        }
        None => Ok(in_memory_storage()),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_storage(db_path: Option<PathBuf>) -> Result<(TableStoreBox, SettlementLogBox)> {
    if db_path.is_some() {
        warn!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_storage())
}

fn in_memory_storage() -> (TableStoreBox, SettlementLogBox) {
    (
        Box::new(InMemoryTableStore::new()),
        Box::new(InMemorySettlementLog::new()),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let (store, settlements) = open_storage(cli.db_path)?;
    let gateway =
        SimulatedGateway::new().with_latency(Duration::from_millis(cli.gateway_latency_ms));
    let config =
        LedgerConfig::default().with_gateway_timeout(Duration::from_millis(cli.gateway_timeout_ms));
    let ledger = Ledger::new(store, Box::new(gateway), settlements).with_config(config);

    // Replay commands
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for (row, command) in reader.commands().enumerate() {
        let command = match command {
            Ok(command) => command,
            Err(e) => {
                error!(row = row + 1, "Error reading command: {}", e);
                continue;
            }
        };
        match command.execute(&ledger).await {
            Ok(CommandOutcome::Payment(PaymentResult::Declined { reason, .. })) => {
                warn!(row = row + 1, table = %command.table, ?reason, "Payment not accepted");
            }
            Ok(outcome) => {
                info!(row = row + 1, table = %command.table, ?outcome, "Command applied");
            }
            Err(e) => {
                error!(row = row + 1, table = %command.table, "Error processing command: {}", e);
            }
        }
    }

    if let Some(path) = cli.settlements {
        let entries = ledger.settlements(None).await.into_diagnostic()?;
        let file = File::create(path).into_diagnostic()?;
        SummaryWriter::new(file)
            .write_settlements(&entries)
            .into_diagnostic()?;
    }

    // Output final state
    let summaries = ledger.list_tables().await.into_diagnostic()?;
    let writer = SummaryWriter::new(io::stdout().lock());
    let written = match cli.format {
        OutputFormat::Csv => writer.write_csv(&summaries),
        OutputFormat::Json => writer.write_json(&summaries),
    };
    written.into_diagnostic()?;

    Ok(())
}

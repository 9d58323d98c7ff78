//! `cuadre` command line

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use common::decimal::{dec, ExchangeRate, Money};
use common::error::Error;
use common::model::currency::Currency;
use common::model::ledger::EntryKind;
use common::model::period::Period;
use common::model::reconciliation::{ReconciliationInput, ReconciliationResult};
use cuadre_engine::{CalculatorConfig, CuadreCalculator};
use dotenv::dotenv;
use ledger_service::{CuadreConfig, LedgerService};
use tracing::{debug, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uuid::Uuid;

/// Exit code for a period outside tolerance
const UNBALANCED_EXIT: u8 = 2;

/// Cuadre CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Set the log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Commands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a JSON snapshot and print the result
    Compute {
        /// Snapshot file, or - for stdin
        #[arg(short, long)]
        input: PathBuf,

        /// Balance tolerance in Bs
        #[arg(short, long)]
        tolerance: Option<Money>,

        /// Credit a USD surplus toward the Bs side
        #[arg(short, long)]
        apply_excess_usd: bool,

        /// Override the snapshot's exchange rate
        #[arg(short, long)]
        exchange_rate: Option<ExchangeRate>,
    },
    /// Reconcile a seeded sample day and week
    Demo {
        /// Business date (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    let env_debug = std::env::var("DEBUG").unwrap_or_else(|_| "0".to_string());
    let log_level = if env_debug == "1" {
        Level::DEBUG
    } else {
        cli.log_level.parse::<Level>().unwrap_or(Level::INFO)
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        debug!("Tracing initialized at {}", log_level);
    }

    let config = CuadreConfig::from_env()?;

    match cli.command {
        Commands::Compute { input, tolerance, apply_excess_usd, exchange_rate } => {
            let overrides = ComputeOverrides { tolerance, apply_excess_usd, exchange_rate };
            let (calculator, snapshot) = prepare_compute(&config, read_snapshot(&input)?, &overrides)?;

            let result = calculator.compute(&snapshot)?;
            println!("{}", serde_json::to_string_pretty(&result)?);

            if !result.is_balanced {
                info!(
                    "Final discrepancy {} exceeds tolerance {}",
                    result.final_discrepancy, result.tolerance
                );
            }
            Ok(ExitCode::from(exit_status(&result)))
        }
        Commands::Demo { date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            run_demo(config, date).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Command line overrides for `compute`
#[derive(Debug, Default)]
struct ComputeOverrides {
    tolerance: Option<Money>,
    apply_excess_usd: bool,
    exchange_rate: Option<ExchangeRate>,
}

/// Merge the environment config and the command line flags.
///
/// `--tolerance` wins over `CUADRE_TOLERANCE`. The USD bridge is on when the
/// flag, the environment or the snapshot itself asks for it. `--exchange-rate`
/// replaces the snapshot's rate.
fn prepare_compute(
    config: &CuadreConfig,
    mut snapshot: ReconciliationInput,
    overrides: &ComputeOverrides,
) -> common::Result<(CuadreCalculator, ReconciliationInput)> {
    let calculator_config = match overrides.tolerance {
        Some(tolerance) => CalculatorConfig::new(tolerance)?,
        None => config.calculator_config()?,
    };

    if overrides.apply_excess_usd || config.apply_excess_usd {
        snapshot.apply_excess_usd = true;
    }
    if let Some(rate) = overrides.exchange_rate {
        snapshot.exchange_rate = rate;
    }

    Ok((CuadreCalculator::with_config(calculator_config), snapshot))
}

/// Process exit status for a computed result
fn exit_status(result: &ReconciliationResult) -> u8 {
    if result.is_balanced {
        0
    } else {
        UNBALANCED_EXIT
    }
}

/// Read a snapshot from a file or stdin
fn read_snapshot(path: &Path) -> common::Result<ReconciliationInput> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| Error::Internal(format!("Failed to read stdin: {}", e)))?;
        buf
    } else {
        fs::read_to_string(path)
            .map_err(|e| Error::Internal(format!("Failed to read {}: {}", path.display(), e)))?
    };

    serde_json::from_str(&raw)
        .map_err(|e| Error::ValidationError(format!("Invalid snapshot {}: {}", path.display(), e)))
}

/// Seed an in-memory ledger and print the daily and weekly reports
async fn run_demo(config: CuadreConfig, date: NaiveDate) -> common::Result<()> {
    let exchange_rate = config.default_exchange_rate.unwrap_or(dec!(36.50));
    let service = LedgerService::with_config(config)?;
    let agency = Uuid::new_v4();

    info!("Seeding demo ledger for agency {} on {}", agency, date);

    let yesterday = date - Duration::days(1);
    let movements = [
        (yesterday, EntryKind::Sale, Currency::Bs, dec!(4200)),
        (yesterday, EntryKind::Prize, Currency::Bs, dec!(900)),
        (yesterday, EntryKind::CashCount, Currency::Bs, dec!(3300)),
        (date, EntryKind::Sale, Currency::Bs, dec!(5250.40)),
        (date, EntryKind::Sale, Currency::Usd, dec!(60)),
        (date, EntryKind::Prize, Currency::Bs, dec!(1800)),
        (date, EntryKind::Prize, Currency::Usd, dec!(15)),
        (date, EntryKind::Expense, Currency::Bs, dec!(250)),
        (date, EntryKind::Debt, Currency::Usd, dec!(10)),
        (date, EntryKind::MobilePaymentReceived, Currency::Bs, dec!(640)),
        (date, EntryKind::MobilePaymentPaid, Currency::Bs, dec!(300)),
        (date, EntryKind::PointOfSale, Currency::Bs, dec!(1150)),
        (date, EntryKind::PendingPrize, Currency::Bs, dec!(120)),
        (date, EntryKind::AdditionalAmount, Currency::Bs, dec!(500)),
        (date, EntryKind::CashCount, Currency::Bs, dec!(3420.40)),
        (date, EntryKind::CashCount, Currency::Usd, dec!(38)),
    ];

    for (day, kind, currency, amount) in movements {
        service.record(agency, day, kind, currency, amount, None).await?;
    }

    let daily = service
        .reconcile(&Period::daily(agency, date), Some(exchange_rate), Some(true))
        .await?;
    println!("{}", serde_json::to_string_pretty(&daily)?);

    let weekly = service
        .reconcile(&Period::weekly(agency, date), Some(exchange_rate), Some(true))
        .await?;
    println!("{}", serde_json::to_string_pretty(&weekly)?);

    Ok(())
}

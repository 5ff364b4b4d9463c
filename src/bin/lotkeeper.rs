//! Lotkeeper command-line interface
//!
//! Builds a lot from a TOML layout (or the built-in demo layout) and lets
//! you inspect it, quote fees, or drive simulated traffic through it.
//!
//! # Examples
//!
//! ```bash
//! # Show availability of the demo layout
//! lotkeeper status
//!
//! # Same, as JSON, for a custom layout
//! lotkeeper --config lot.toml status --json
//!
//! # 200 vehicles arriving at once on 8 threads
//! lotkeeper simulate --vehicles 200 --threads 8 --hold-ms 5
//!
//! # Price a 90 minute car stay
//! lotkeeper quote --kind car --minutes 90
//! ```

use clap::{Args, Parser, Subcommand};
use lotkeeper::lot::{billable_hours, FeeSchedule, LotSnapshot, SizeRequirement};
use lotkeeper::{LotConfig, ParkingLot, Vehicle, VehicleKind};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Lotkeeper - concurrent parking spot allocation
#[derive(Parser, Debug)]
#[command(name = "lotkeeper")]
#[command(version = lotkeeper::VERSION)]
#[command(about = "Lotkeeper - concurrent parking spot allocation", long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Lot layout file (TOML); the demo layout is used when omitted
    #[arg(long, global = true, env = "LOTKEEPER_CONFIG")]
    config: Option<PathBuf>,

    /// Log directory path
    #[arg(long, global = true, default_value = "logs", env = "LOTKEEPER_LOG_DIR")]
    log_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show spot availability per floor
    Status {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Drive simulated arrivals and departures through the lot
    Simulate(SimulateArgs),

    /// Quote the fee for a stay
    Quote {
        /// Vehicle kind (motorcycle, car, bus)
        #[arg(short, long)]
        kind: VehicleKind,

        /// Length of the stay in minutes
        #[arg(short, long)]
        minutes: i64,
    },

    /// Show version
    Version,
}

/// Simulation arguments
#[derive(Args, Debug)]
struct SimulateArgs {
    /// Number of arriving vehicles
    #[arg(short, long, default_value = "50")]
    vehicles: usize,

    /// Worker threads (0 = one per core)
    #[arg(short, long, default_value = "0")]
    threads: usize,

    /// How long each vehicle stays before leaving (milliseconds)
    #[arg(long, default_value = "10")]
    hold_ms: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli)?;

    let lot_config = match &cli.config {
        Some(path) => LotConfig::load(path)?,
        None => LotConfig::default(),
    };

    match cli.command {
        Commands::Status { json } => status_command(&lot_config, json),
        Commands::Simulate(args) => simulate_command(&lot_config, args),
        Commands::Quote { kind, minutes } => quote_command(&lot_config, kind, minutes),
        Commands::Version => {
            println!("Lotkeeper {}", lotkeeper::VERSION);
            Ok(())
        }
    }
}

/// Setup logging with rolling files and console output
fn setup_logging(cli: &Cli) -> anyhow::Result<()> {
    std::fs::create_dir_all(&cli.log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &cli.log_dir, "lotkeeper.log");

    let log_level = cli
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!cli.no_color)
                .pretty(),
        )
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .init();

    Ok(())
}

fn status_command(lot_config: &LotConfig, json: bool) -> anyhow::Result<()> {
    let lot = lot_config.build()?;
    let snapshot = lot.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_snapshot(&snapshot);
    }
    Ok(())
}

fn print_snapshot(snapshot: &LotSnapshot) {
    println!("Parking Lot: {}", snapshot.name);
    println!("───────────────────────────────");
    for floor in &snapshot.floors {
        println!(
            "Floor {} [{}] Available: {}/{}",
            floor.number,
            floor.finder,
            floor.available.total(),
            floor.capacity
        );
        println!("  Small spots:  {}", floor.available.small);
        println!("  Medium spots: {}", floor.available.medium);
        println!("  Large spots:  {}", floor.available.large);
    }
    println!(
        "Total: {}/{} available, {} active tickets",
        snapshot.total_available, snapshot.total_capacity, snapshot.active_tickets
    );
}

#[derive(Debug, Default)]
struct SimulationReport {
    parked: usize,
    turned_away: usize,
    revenue: f64,
}

fn simulate_command(lot_config: &LotConfig, args: SimulateArgs) -> anyhow::Result<()> {
    let lot = lot_config.build()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build()?;

    info!(
        lot = %lot.name(),
        vehicles = args.vehicles,
        threads = pool.current_num_threads(),
        "Simulation starting"
    );

    let hold = Duration::from_millis(args.hold_ms);
    let report = pool.install(|| run_arrivals(&lot, args.vehicles, hold));

    println!("Vehicles:    {}", args.vehicles);
    println!("Parked:      {}", report.parked);
    println!("Turned away: {}", report.turned_away);
    println!("Revenue:     ${:.2}", report.revenue);
    print_snapshot(&lot.snapshot());
    Ok(())
}

/// Every vehicle arrives, parks if it can, stays for `hold`, then leaves
fn run_arrivals(lot: &ParkingLot, vehicles: usize, hold: Duration) -> SimulationReport {
    use rayon::prelude::*;

    (0..vehicles)
        .into_par_iter()
        .map(|i| {
            // Mostly cars, some motorcycles, the odd bus
            let kind = match i % 10 {
                0 | 1 => VehicleKind::Motorcycle,
                9 => VehicleKind::Bus,
                _ => VehicleKind::Car,
            };
            let vehicle = Vehicle::new(format!("SIM-{:04}", i), kind);

            let Some(ticket) = lot.park(&vehicle) else {
                return SimulationReport {
                    turned_away: 1,
                    ..Default::default()
                };
            };

            std::thread::sleep(hold);
            match lot.exit(ticket.id()) {
                Ok(fee) => SimulationReport {
                    parked: 1,
                    revenue: fee,
                    ..Default::default()
                },
                Err(e) => {
                    warn!(ticket = %ticket.id(), error = %e, "Exit failed");
                    SimulationReport {
                        parked: 1,
                        ..Default::default()
                    }
                }
            }
        })
        .reduce(SimulationReport::default, |a, b| SimulationReport {
            parked: a.parked + b.parked,
            turned_away: a.turned_away + b.turned_away,
            revenue: a.revenue + b.revenue,
        })
}

fn quote_command(lot_config: &LotConfig, kind: VehicleKind, minutes: i64) -> anyhow::Result<()> {
    let (hours, fee) = quote(lot_config, kind, minutes, chrono::Utc::now())?;
    println!("{} for {} minutes: {} hour(s) billed, ${:.2}", kind, minutes, hours, fee);
    Ok(())
}

/// Billable hours and fee for a stay of `minutes` starting at `entry`
fn quote(
    lot_config: &LotConfig,
    kind: VehicleKind,
    minutes: i64,
    entry: chrono::DateTime<chrono::Utc>,
) -> anyhow::Result<(u64, f64)> {
    if minutes < 0 {
        anyhow::bail!("Stay length must not be negative");
    }

    let exit = chrono::Duration::try_minutes(minutes)
        .and_then(|stay| entry.checked_add_signed(stay))
        .ok_or_else(|| anyhow::anyhow!("Stay of {} minutes is too long to price", minutes))?;
    let hours = billable_hours(entry, exit);
    let fee = lot_config.fees.fee(kind.required_size(), hours);
    Ok((hours, fee))
}

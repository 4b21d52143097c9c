//! Command Line Interface for genesis exposure analysis.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use genesis_exposure_aggregation::prelude::*;
use genesis_exposure_data::Snapshot;
use genesis_exposure_domain::enums::FeePolicy;
use genesis_exposure_domain::math::ReservePool;
use genesis_exposure_domain::token::TokenAmount;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod report;

#[derive(Parser)]
#[command(name = "genesis-exposure")]
#[command(about = "Per-account exposure to target assets from a genesis snapshot")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FeePolicyArg {
    /// Convert pool shares at book value
    BookValue,
    /// Deduct the chain's withdrawal fee
    Withdrawal,
}

impl From<FeePolicyArg> for FeePolicy {
    fn from(arg: FeePolicyArg) -> Self {
        match arg {
            FeePolicyArg::BookValue => FeePolicy::BookValue,
            FeePolicyArg::Withdrawal => FeePolicy::Withdrawal,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate exposure, write the CSV and print the summary
    Run {
        /// Snapshot JSON file
        #[arg(short, long, env = "GENESIS_SNAPSHOT")]
        snapshot: PathBuf,

        /// Target denomination (repeatable)
        #[arg(short, long = "target", required = true)]
        targets: Vec<String>,

        /// Pool share denomination to convert (repeatable)
        ///
        /// Defaults to every pool paired with a target.
        #[arg(short, long = "pool-denom")]
        pool_denoms: Vec<String>,

        /// Fee applied when converting pool shares
        #[arg(long, value_enum, default_value_t = FeePolicyArg::BookValue)]
        fee_policy: FeePolicyArg,

        /// Output CSV file
        #[arg(short, long, default_value = "result.csv")]
        output: PathBuf,
    },
    /// List the snapshot's pools with their reserves
    Pools {
        /// Snapshot JSON file
        #[arg(short, long, env = "GENESIS_SNAPSHOT")]
        snapshot: PathBuf,
    },
    /// Convert pool shares into reserves for a single pool state
    Quote {
        /// Quote reserve amount
        #[arg(long)]
        reserve_quote: TokenAmount,

        /// Base reserve amount
        #[arg(long)]
        reserve_base: TokenAmount,

        /// Total pool share supply
        #[arg(long)]
        supply: TokenAmount,

        /// Pool shares to redeem
        #[arg(long)]
        shares: TokenAmount,

        /// Withdrawal fee rate in [0, 1]
        #[arg(long, default_value = "0")]
        fee_rate: Decimal,
    },
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            snapshot,
            targets,
            pool_denoms,
            fee_policy,
            output,
        } => {
            let config = ExposureConfig::new(targets)
                .with_pool_denoms(pool_denoms)
                .with_fee_policy(fee_policy.into());
            run(&snapshot, &config, &output)?;
        }
        Commands::Pools { snapshot } => {
            let snapshot = load(&snapshot)?;
            let index = PoolIndex::build(&snapshot)?;
            report::pools_table(&index).printstd();
        }
        Commands::Quote {
            reserve_quote,
            reserve_base,
            supply,
            shares,
            fee_rate,
        } => {
            let pool = ReservePool::new(reserve_quote, reserve_base, supply)?;
            let (quote, base) = pool.withdraw(shares, fee_rate)?;
            println!("Quote amount: {quote}");
            println!("Base amount:  {base}");
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<Snapshot> {
    Snapshot::from_path(path).with_context(|| format!("loading snapshot {}", path.display()))
}

fn run(snapshot_path: &Path, config: &ExposureConfig, output: &Path) -> Result<()> {
    let snapshot = load(snapshot_path)?;
    let index = PoolIndex::build(&snapshot).context("building pool index")?;
    let outcome = aggregate(&snapshot, &index, config).context("aggregating exposure")?;

    report::write_csv(&outcome.table, output)?;
    info!(path = %output.display(), rows = outcome.table.len(), "Wrote exposure report");

    let residuals = reconcile(
        &outcome.table,
        |denom| snapshot.supply_of(denom),
        outcome.stats.conversions,
    );

    println!("\n📊 Exposure Summary");
    report::summary_table(&outcome, &residuals, chrono::Utc::now()).printstd();
    Ok(())
}

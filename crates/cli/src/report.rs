//! Report rendering: per-account CSV, run summary and pool listing.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use genesis_exposure_aggregation::prelude::{
    AggregationOutcome, ExposureTable, PoolIndex, Residual,
};
use prettytable::{Cell, Row, Table, format};
use std::fs::File;
use std::path::Path;

/// One row per account: address, a coin per target, then the three role flags.
pub fn exposure_table(table: &ExposureTable) -> Table {
    let mut out = Table::new();

    let mut titles = vec![Cell::new("address")];
    titles.extend(table.targets().iter().map(|target| Cell::new(target)));
    titles.extend(["holder", "liquidity_provider", "farmer"].map(Cell::new));
    out.set_titles(Row::new(titles));

    for (address, row) in table.iter() {
        let mut cells = vec![Cell::new(address)];
        cells.extend(table.targets().iter().map(|target| {
            let coin = format!("{}{}", row.total_of(target), target);
            Cell::new(&coin)
        }));
        cells.extend(
            [row.holder, row.liquidity_provider, row.farmer]
                .map(|flag| Cell::new(&flag.to_string())),
        );
        out.add_row(Row::new(cells));
    }
    out
}

/// Writes the per-account table as CSV.
pub fn write_csv(table: &ExposureTable, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = exposure_table(table)
        .to_csv(file)
        .with_context(|| format!("failed to write {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

/// Counts, statistics and reconciliation residuals of a run.
pub fn summary_table(
    outcome: &AggregationOutcome,
    residuals: &[Residual],
    generated_at: DateTime<Utc>,
) -> Table {
    let counts = outcome.table.role_counts();
    let stats = &outcome.stats;

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.add_row(Row::new(vec![
        Cell::new("Generated at"),
        Cell::new(&generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
    ]));

    let lines = [
        ("Accounts", counts.accounts.to_string()),
        ("Holders", counts.holders.to_string()),
        ("Liquidity providers", counts.liquidity_providers.to_string()),
        ("Farmers", counts.farmers.to_string()),
        ("Balance records", stats.balance_records.to_string()),
        ("Stake records", stats.stake_records.to_string()),
        ("Queued stake records", stats.queued_stake_records.to_string()),
        ("Skipped reserve records", stats.skipped_reserve_records.to_string()),
        ("Pool share conversions", stats.conversions.to_string()),
    ];
    for (label, value) in lines {
        table.add_row(Row::new(vec![Cell::new(label), Cell::new(&value)]));
    }

    for residual in residuals {
        let status = if residual.within_rounding_bound() {
            "ok"
        } else {
            "EXCEEDS ROUNDING BOUND"
        };
        table.add_row(Row::new(vec![
            Cell::new(&format!("{} supply / accounted", residual.denom)),
            Cell::new(&format!("{} / {}", residual.supply, residual.accounted)),
        ]));
        table.add_row(Row::new(vec![
            Cell::new(&format!("{} residual", residual.denom)),
            Cell::new(&format!("{residual} ({status})")),
        ]));
    }
    table
}

/// Pool id, share denomination, pair, reserves, supply and spot price.
pub fn pools_table(index: &PoolIndex) -> Table {
    let mut table = Table::new();
    table.set_titles(Row::new(
        ["pool", "share denom", "pair", "quote reserve", "base reserve", "share supply", "price"]
            .map(Cell::new)
            .to_vec(),
    ));

    for entry in index.entries() {
        let price = entry
            .reserves
            .price()
            .map(|price| price.round_dp(6).to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(Row::new(vec![
            Cell::new(&entry.pool.id.to_string()),
            Cell::new(&entry.pool.pool_coin_denom),
            Cell::new(&format!(
                "{} / {}",
                entry.pair.base_coin_denom, entry.pair.quote_coin_denom
            )),
            Cell::new(&format!(
                "{}{}",
                entry.reserves.quote_reserve(),
                entry.pair.quote_coin_denom
            )),
            Cell::new(&format!(
                "{}{}",
                entry.reserves.base_reserve(),
                entry.pair.base_coin_denom
            )),
            Cell::new(&entry.reserves.share_supply().to_string()),
            Cell::new(&price),
        ]));
    }
    table
}

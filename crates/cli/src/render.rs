//! Output formats for a finished trajectory.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use stakesim_economics::{
    PropensityPoint, RowStats, SimulationConfig, SimulationState, Trajectory, TrajectorySummary,
};
use std::io::Write;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON document
    Json,
    /// One CSV record per row
    Csv,
}

/// Compact magnitude formatting: `1.5k`, `540M`, `1.08B`.
pub fn format_compact(value: f64) -> String {
    const SUFFIXES: [&str; 5] = ["", "k", "M", "B", "T"];

    let mut scaled = value;
    let mut idx = 0;
    while scaled.abs() >= 1_000.0 && idx < SUFFIXES.len() - 1 {
        scaled /= 1_000.0;
        idx += 1;
    }

    let text = format!("{scaled:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{text}{}", SUFFIXES[idx])
}

/// Fraction rendered as a percentage with two decimals.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

fn format_delta(delta: Option<f64>, format: fn(f64) -> String) -> String {
    match delta {
        Some(d) if d >= 0.0 => format!("+{}", format(d)),
        Some(d) => format(d),
        None => "-".to_string(),
    }
}

const TABLE_HEADER: [&str; 11] = [
    "year",
    "supply",
    "Δsupply",
    "inflation",
    "Δinfl.",
    "yield",
    "Δyield",
    "staked",
    "unstaked dil.",
    "staked dil.",
    "valuation (u/s)",
];

pub fn write_table_header<W: Write>(out: &mut W) -> Result<()> {
    writeln!(
        out,
        "{:>4} {:>9} {:>9} {:>9} {:>8} {:>8} {:>8} {:>8} {:>13} {:>11}  {}",
        TABLE_HEADER[0],
        TABLE_HEADER[1],
        TABLE_HEADER[2],
        TABLE_HEADER[3],
        TABLE_HEADER[4],
        TABLE_HEADER[5],
        TABLE_HEADER[6],
        TABLE_HEADER[7],
        TABLE_HEADER[8],
        TABLE_HEADER[9],
        TABLE_HEADER[10],
    )?;
    Ok(())
}

pub fn write_table_row<W: Write>(
    out: &mut W,
    row: &SimulationState,
    previous: Option<&SimulationState>,
) -> Result<()> {
    let stats = RowStats::new(row, previous);
    writeln!(
        out,
        "{:>4} {:>9} {:>9} {:>9} {:>8} {:>8} {:>8} {:>8} {:>13} {:>11}  {} / {}",
        row.timestep,
        format_compact(row.total_supply),
        format_delta(stats.total_supply_delta, format_compact),
        format_percent(row.inflation),
        format_delta(stats.inflation_delta, format_percent),
        format_percent(row.staker_yield),
        format_delta(stats.staker_yield_delta, format_percent),
        format_percent(row.perc_staked),
        format_percent(row.unstaked_dilution),
        format_percent(row.staked_dilution),
        format_compact(row.unstaked_valuation),
        format_compact(row.staked_valuation),
    )?;
    Ok(())
}

pub fn write_summary<W: Write>(out: &mut W, summary: &TrajectorySummary) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "After {} years:", summary.years)?;
    writeln!(
        out,
        "  total supply      {} ({} growth)",
        format_compact(summary.final_total_supply),
        format_percent(summary.supply_growth)
    )?;
    writeln!(out, "  staked            {}", format_percent(summary.final_perc_staked))?;
    writeln!(out, "  staker yield      {}", format_percent(summary.final_staker_yield))?;
    writeln!(
        out,
        "  valuation         unstaked {} / staked {} ({:.2}x)",
        format_compact(summary.final_unstaked_valuation),
        format_compact(summary.final_staked_valuation),
        summary.staking_advantage
    )?;
    Ok(())
}

pub fn write_table<W: Write>(out: &mut W, trajectory: &Trajectory) -> Result<()> {
    write_table_header(out)?;
    let rows = trajectory.as_slice();
    for (i, row) in rows.iter().enumerate() {
        write_table_row(out, row, i.checked_sub(1).map(|p| &rows[p]))?;
    }
    if let Some(summary) = TrajectorySummary::from_trajectory(trajectory) {
        write_summary(out, &summary)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct RunReport<'a> {
    config: &'a SimulationConfig,
    trajectory: &'a Trajectory,
    summary: Option<TrajectorySummary>,
}

pub fn write_json<W: Write>(
    out: &mut W,
    config: &SimulationConfig,
    trajectory: &Trajectory,
) -> Result<()> {
    let report = RunReport {
        config,
        trajectory,
        summary: TrajectorySummary::from_trajectory(trajectory),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_csv<W: Write, T: Serialize>(out: &mut W, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_trajectory<W: Write>(
    out: &mut W,
    format: OutputFormat,
    config: &SimulationConfig,
    trajectory: &Trajectory,
) -> Result<()> {
    match format {
        OutputFormat::Table => write_table(out, trajectory),
        OutputFormat::Json => write_json(out, config, trajectory),
        OutputFormat::Csv => write_csv(out, trajectory.as_slice()),
    }
}

pub fn write_propensity<W: Write>(
    out: &mut W,
    format: OutputFormat,
    curve: &[PropensityPoint],
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            writeln!(out, "{:>8} {:>10} {:>10}", "yield", "staked", "unstaked")?;
            for point in curve {
                writeln!(
                    out,
                    "{:>8} {:>10.4} {:>10.4}",
                    format_percent(point.previous_yield),
                    point.staked,
                    point.unstaked
                )?;
            }
            Ok(())
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, curve)?;
            writeln!(out)?;
            Ok(())
        }
        OutputFormat::Csv => write_csv(out, curve),
    }
}

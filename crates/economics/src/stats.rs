//! Headline metrics and step-over-step deltas for a finished trajectory.

use crate::types::{SimulationState, Timestep, Trajectory};
use serde::{Deserialize, Serialize};

/// Headline metrics for one row, with changes against the previous row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowStats {
    pub timestep: Timestep,
    pub total_supply: f64,
    pub inflation: f64,
    pub staker_yield: f64,
    /// Absolute change in supply
    pub total_supply_delta: Option<f64>,
    /// Relative change in inflation
    pub inflation_delta: Option<f64>,
    /// Relative change in staker yield
    pub staker_yield_delta: Option<f64>,
}

impl RowStats {
    pub fn new(row: &SimulationState, previous: Option<&SimulationState>) -> Self {
        Self {
            timestep: row.timestep,
            total_supply: row.total_supply,
            inflation: row.inflation,
            staker_yield: row.staker_yield,
            total_supply_delta: previous.map(|p| row.total_supply - p.total_supply),
            inflation_delta: previous.and_then(|p| relative_change(row.inflation, p.inflation)),
            staker_yield_delta: previous
                .and_then(|p| relative_change(row.staker_yield, p.staker_yield)),
        }
    }
}

fn relative_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous)
}

/// Stats for every row of `trajectory`, in order.
pub fn row_stats(trajectory: &Trajectory) -> Vec<RowStats> {
    let rows = trajectory.as_slice();
    rows.iter()
        .enumerate()
        .map(|(i, row)| RowStats::new(row, i.checked_sub(1).map(|p| &rows[p])))
        .collect()
}

/// End-of-run summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySummary {
    pub years: Timestep,
    pub final_total_supply: f64,
    /// Growth of supply over the run as a fraction of the initial supply
    pub supply_growth: f64,
    pub final_perc_staked: f64,
    pub final_staker_yield: f64,
    pub final_unstaked_valuation: f64,
    pub final_staked_valuation: f64,
    /// Staked valuation divided by unstaked valuation
    pub staking_advantage: f64,
}

impl TrajectorySummary {
    /// `None` for an empty trajectory.
    pub fn from_trajectory(trajectory: &Trajectory) -> Option<Self> {
        let first = trajectory.first()?;
        let last = trajectory.last()?;

        Some(Self {
            years: last.timestep,
            final_total_supply: last.total_supply,
            supply_growth: (last.total_supply - first.total_supply) / first.total_supply,
            final_perc_staked: last.perc_staked,
            final_staker_yield: last.staker_yield,
            final_unstaked_valuation: last.unstaked_valuation,
            final_staked_valuation: last.staked_valuation,
            staking_advantage: last.staked_valuation / last.unstaked_valuation,
        })
    }
}

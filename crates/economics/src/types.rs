//! Core types for the staking economics engine
//!
//! A run produces one [`SimulationState`] per annual timestep; the ordered
//! sequence is a [`Trajectory`].

use crate::errors::DomainError;
use crate::model::{compute_staked_dilution, compute_staker_yield, compute_unstaked_dilution};
use crate::params::SimulationParameters;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Timestep index (years since genesis of the run)
pub type Timestep = u64;

/// Cohort whose retention is being computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    /// Holders currently staking
    Staked,
    /// Holders currently idle
    Unstaked,
}

/// Network state at one timestep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub timestep: Timestep,
    /// Fractional supply growth applied over the upcoming step
    pub inflation: f64,
    pub total_supply: f64,
    pub sol_staked: f64,
    /// `sol_staked / total_supply`
    pub perc_staked: f64,
    pub staker_yield: f64,
    pub unstaked_dilution: f64,
    pub staked_dilution: f64,
    /// Compounded value of one unit of unstaked principal
    pub unstaked_valuation: f64,
    /// Compounded value of one unit of staked principal
    pub staked_valuation: f64,
}

impl SimulationState {
    /// Build the timestep-0 state from operator input.
    ///
    /// Inflation starts at the base rate and both cohorts start at the
    /// initial valuation. Fails with [`DomainError::ZeroStake`] when nothing
    /// is staked, and with the matching range error when the supply or the
    /// staked fraction is outside the model's domain.
    pub fn initial(
        params: &SimulationParameters,
        initial_supply: f64,
        initial_fraction_staked: f64,
    ) -> Result<Self, DomainError> {
        check_supply(initial_supply)?;
        check_stake_fraction(initial_fraction_staked)?;

        let inflation = params.base_inflation_rate;
        let staker_yield = compute_staker_yield(
            inflation,
            params.validator_uptime,
            params.validator_commission,
            initial_fraction_staked,
        )?;

        Ok(Self {
            timestep: 0,
            inflation,
            total_supply: initial_supply,
            sol_staked: initial_fraction_staked * initial_supply,
            perc_staked: initial_fraction_staked,
            staker_yield,
            unstaked_dilution: compute_unstaked_dilution(inflation),
            staked_dilution: compute_staked_dilution(inflation, initial_fraction_staked)?,
            unstaked_valuation: params.initial_valuation,
            staked_valuation: params.initial_valuation,
        })
    }

    /// Supply not currently staked
    pub fn sol_unstaked(&self) -> f64 {
        self.total_supply - self.sol_staked
    }

    /// Check that a state can seed a run: positive finite supply and a
    /// staked fraction in `(0, 1]`.
    pub fn validate(&self) -> Result<(), DomainError> {
        check_supply(self.total_supply)?;
        check_stake_fraction(self.perc_staked)
    }
}

fn check_supply(total_supply: f64) -> Result<(), DomainError> {
    if !total_supply.is_finite() || total_supply <= 0.0 {
        return Err(DomainError::InvalidSupply(total_supply));
    }
    Ok(())
}

fn check_stake_fraction(perc_staked: f64) -> Result<(), DomainError> {
    if perc_staked == 0.0 {
        return Err(DomainError::ZeroStake);
    }
    if !perc_staked.is_finite() || perc_staked < 0.0 || perc_staked > 1.0 {
        return Err(DomainError::StakeFractionOutOfRange(perc_staked));
    }
    Ok(())
}

/// Immutable, ordered output of one run. `trajectory[i].timestep == i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory(Vec<SimulationState>);

impl Trajectory {
    pub(crate) fn new(states: Vec<SimulationState>) -> Self {
        Self(states)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SimulationState> {
        self.0.get(index)
    }

    pub fn first(&self) -> Option<&SimulationState> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&SimulationState> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SimulationState> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[SimulationState] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<SimulationState> {
        self.0
    }
}

impl Index<usize> for Trajectory {
    type Output = SimulationState;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a SimulationState;
    type IntoIter = std::slice::Iter<'a, SimulationState>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

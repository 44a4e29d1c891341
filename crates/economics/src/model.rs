//! Economic model: inflation schedule, dilution, yield and the staker
//! behaviour transition.
//!
//! Every function here is pure. Context is passed in explicitly and the same
//! inputs always produce the same outputs.

use crate::errors::DomainError;
use crate::params::{Policy, SimulationParameters};
use crate::types::{Behavior, SimulationState, Timestep};

/// Largest overshoot of a staked fraction above 1 treated as rounding.
const ROUNDING_TOLERANCE: f64 = 1e-12;

/// Inflation rate for `timestep`.
///
/// Formula:
/// `rate(t) = max(base_rate * (1 + growth_rate)^t, long_term_rate)`
///
/// `growth_rate` is normally negative. The caller guarantees
/// `long_term_rate <= base_rate`.
pub fn compute_inflation_rate(
    base_rate: f64,
    growth_rate: f64,
    long_term_rate: f64,
    timestep: Timestep,
) -> f64 {
    let exponent = i32::try_from(timestep).unwrap_or(i32::MAX);
    (base_rate * (1.0 + growth_rate).powi(exponent)).max(long_term_rate)
}

/// Value change of one unit of unstaked principal over a step at
/// `inflation`. Never positive for `inflation >= 0`.
pub fn compute_unstaked_dilution(inflation: f64) -> f64 {
    -inflation / (1.0 + inflation)
}

/// Value change of one unit of staked principal over a step. New supply is
/// paid pro rata to stakers, so this is a gain whenever `perc_staked < 1`.
pub fn compute_staked_dilution(inflation: f64, perc_staked: f64) -> Result<f64, DomainError> {
    if perc_staked == 0.0 {
        return Err(DomainError::ZeroStake);
    }
    Ok(((inflation / perc_staked) - inflation) / (1.0 + inflation))
}

/// Annualised return on staked tokens after validator downtime and
/// commission.
pub fn compute_staker_yield(
    inflation: f64,
    uptime: f64,
    commission: f64,
    perc_staked: f64,
) -> Result<f64, DomainError> {
    if perc_staked == 0.0 {
        return Err(DomainError::ZeroStake);
    }
    Ok(inflation * uptime * (1.0 - commission) / perc_staked)
}

/// Propensity of a staker to keep staking given last step's yield.
///
/// Logistic curve `1 / (1 + e^{-(y - location) / scale})`: 0.5 at
/// `location`, rising towards 1 as yield grows.
pub fn compute_stake_propensity(previous_yield: f64, location: f64, scale: f64) -> f64 {
    1.0 / (1.0 + (-(previous_yield - location) / scale).exp())
}

impl Policy {
    /// Fraction of the `behavior` cohort keeping its behaviour this step.
    /// Always in `[0, 1]`.
    pub fn retention(&self, previous_yield: f64, behavior: Behavior) -> f64 {
        match *self {
            Policy::Constant => 1.0,
            Policy::Proactive { location, scale } => {
                let stay_staked = compute_stake_propensity(previous_yield, location, scale);
                match behavior {
                    Behavior::Staked => stay_staked,
                    Behavior::Unstaked => 1.0 - stay_staked,
                }
            }
        }
    }
}

/// Advance the network one timestep.
///
/// Valuations compound with the dilution realised over the previous period,
/// supply rolls forward at the previous inflation rate, and the inflation
/// award lands entirely in the staked pool before the cohorts churn.
pub fn next_state(
    previous: &SimulationState,
    params: &SimulationParameters,
) -> Result<SimulationState, DomainError> {
    let timestep = previous.timestep + 1;

    let unstaked_valuation =
        previous.unstaked_valuation * (1.0 + compute_unstaked_dilution(previous.inflation));
    let staked_valuation = previous.staked_valuation
        * (1.0 + compute_staked_dilution(previous.inflation, previous.perc_staked)?);

    let total_supply = previous.total_supply * (1.0 + previous.inflation);
    let award = previous.total_supply * previous.inflation;
    let tentative_staked = previous.sol_staked + award;
    let tentative_unstaked = total_supply - tentative_staked;

    let inflation = compute_inflation_rate(
        params.base_inflation_rate,
        params.disinflation_rate,
        params.long_term_inflation_rate,
        timestep,
    );

    let staked_retention = params
        .staked_policy
        .retention(previous.staker_yield, Behavior::Staked);
    let unstaked_retention = params
        .unstaked_policy
        .retention(previous.staker_yield, Behavior::Unstaked);

    // Stakers who stay, plus idle holders who switch to staking.
    let sol_staked =
        staked_retention * tentative_staked + (1.0 - unstaked_retention) * tentative_unstaked;

    let (sol_staked, perc_staked) = match sol_staked / total_supply {
        p if p.is_finite() && p > 0.0 && p <= 1.0 => (sol_staked, p),
        // Full stake can overshoot by an ulp when both pools are summed.
        p if p > 1.0 && p - 1.0 <= ROUNDING_TOLERANCE => (total_supply, 1.0),
        p => return Err(DomainError::StakeFractionOutOfRange(p)),
    };

    Ok(SimulationState {
        timestep,
        inflation,
        total_supply,
        sol_staked,
        perc_staked,
        staker_yield: compute_staker_yield(
            inflation,
            params.validator_uptime,
            params.validator_commission,
            perc_staked,
        )?,
        unstaked_dilution: compute_unstaked_dilution(inflation),
        staked_dilution: compute_staked_dilution(inflation, perc_staked)?,
        unstaked_valuation,
        staked_valuation,
    })
}

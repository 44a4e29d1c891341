//! Sequential simulation driver.
//!
//! Threads state through time: the row at timestep `t` is a pure function of
//! the row at `t - 1` and the run's parameters, so steps are applied strictly
//! in order.

use crate::errors::{ConfigError, SimulationError};
use crate::model::next_state;
use crate::params::SimulationParameters;
use crate::types::{SimulationState, Trajectory};
use tracing::{debug, info, warn};

/// A validated, ready-to-run simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    params: SimulationParameters,
    initial_state: SimulationState,
    steps: usize,
}

/// Validate the inflation ordering and package the run inputs.
///
/// Range checks on individual parameters belong to whoever collects them;
/// only `long_term_inflation_rate <= base_inflation_rate` is enforced here,
/// along with a non-empty horizon and an initial state at timestep 0 whose
/// supply and staked fraction are in domain. A bad initial state is a domain
/// error at timestep 0.
pub fn build_simulation(
    params: SimulationParameters,
    initial_state: SimulationState,
    steps: usize,
) -> Result<Simulation, SimulationError> {
    params.validate_inflation_ordering()?;
    if steps == 0 {
        return Err(ConfigError::EmptyHorizon.into());
    }
    if initial_state.timestep != 0 {
        return Err(ConfigError::InitialTimestep(initial_state.timestep).into());
    }
    initial_state
        .validate()
        .map_err(|source| SimulationError::Domain {
            timestep: 0,
            source,
        })?;

    Ok(Simulation {
        params,
        initial_state,
        steps,
    })
}

impl Simulation {
    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn initial_state(&self) -> &SimulationState {
        &self.initial_state
    }

    /// Number of rows the trajectory will hold, initial state included.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Run to completion. Row 0 is the initial state and
    /// `trajectory[i].timestep == i`. Calling again yields the same
    /// trajectory.
    pub fn run(&self) -> Result<Trajectory, SimulationError> {
        info!(
            steps = self.steps,
            base_inflation_rate = self.params.base_inflation_rate,
            staked_policy = %self.params.staked_policy.kind(),
            unstaked_policy = %self.params.unstaked_policy.kind(),
            "starting simulation run"
        );

        let mut states = Vec::with_capacity(self.steps);
        states.push(self.initial_state.clone());

        while states.len() < self.steps {
            let previous = &states[states.len() - 1];
            let timestep = previous.timestep + 1;
            let state = next_state(previous, &self.params).map_err(|source| {
                warn!(timestep, error = %source, "simulation step failed");
                SimulationError::Domain { timestep, source }
            })?;

            debug!(
                timestep = state.timestep,
                total_supply = state.total_supply,
                perc_staked = state.perc_staked,
                staker_yield = state.staker_yield,
                "advanced simulation"
            );
            states.push(state);
        }

        let trajectory = Trajectory::new(states);
        if let Some(last) = trajectory.last() {
            info!(
                timestep = last.timestep,
                total_supply = last.total_supply,
                perc_staked = last.perc_staked,
                "simulation complete"
            );
        }
        Ok(trajectory)
    }
}

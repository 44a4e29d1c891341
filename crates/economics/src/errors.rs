use thiserror::Error;

/// Problems with the operator-supplied configuration. Detected before any
/// state is produced; the run does not proceed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("long-term inflation rate {long_term} must be <= base inflation rate {base}")]
    InflationOrdering { base: f64, long_term: f64 },

    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("unknown behaviour policy: {0} (expected `constant` or `proactive`)")]
    UnknownPolicy(String),

    #[error("simulation horizon must be at least one step")]
    EmptyHorizon,

    #[error("initial state must be at timestep 0, got {0}")]
    InitialTimestep(u64),
}

/// Arithmetic outside the model's domain.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DomainError {
    #[error("staked fraction is zero: dilution and yield are undefined")]
    ZeroStake,

    #[error("staked fraction {0} is outside (0, 1]")]
    StakeFractionOutOfRange(f64),

    #[error("total supply {0} must be finite and positive")]
    InvalidSupply(f64),
}

/// Errors surfaced by [`crate::build_simulation`] and [`crate::Simulation::run`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("domain error at timestep {timestep}: {source}")]
    Domain {
        timestep: u64,
        #[source]
        source: DomainError,
    },
}

impl SimulationError {
    /// Timestep at which a domain error was raised, if any.
    pub fn timestep(&self) -> Option<u64> {
        match self {
            SimulationError::Domain { timestep, .. } => Some(*timestep),
            SimulationError::Config(_) => None,
        }
    }
}

//! Staking economics simulator
//!
//! Models a proof-of-stake token network over annual timesteps:
//! - Decaying inflation schedule with a long-term floor
//! - Inflation awards restaked by stakers, with cohort-level churn driven by
//!   a behaviour policy
//! - Dilution and compounded valuation of staked vs. unstaked principal
//!
//! The engine is deterministic and single-threaded. [`build_simulation`]
//! validates the inputs, [`Simulation::run`] returns the whole
//! [`Trajectory`] at once.

pub mod config;
pub mod errors;
pub mod model;
pub mod params;
pub mod propensity;
pub mod simulation;
pub mod stats;
pub mod types;

pub use config::*;
pub use errors::*;
pub use model::*;
pub use params::*;
pub use propensity::*;
pub use simulation::*;
pub use stats::*;
pub use types::*;

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

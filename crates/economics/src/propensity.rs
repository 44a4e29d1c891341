//! Preview of the proactive behaviour curve, for showing operators what a
//! given `location`/`scale` pair means before they run anything.

use crate::model::compute_stake_propensity;
use serde::{Deserialize, Serialize};

/// Upper end of the default yield grid (16%).
pub const DEFAULT_MAX_YIELD: f64 = 0.16;
/// Points on the default yield grid.
pub const DEFAULT_SAMPLES: usize = 101;

/// Propensity of each cohort to keep its behaviour at one yield.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropensityPoint {
    pub previous_yield: f64,
    /// Propensity to stay staked
    pub staked: f64,
    /// Propensity to stay unstaked
    pub unstaked: f64,
}

/// `samples` evenly spaced yields from 0 to `max_yield` inclusive.
pub fn yield_grid(max_yield: f64, samples: usize) -> Vec<f64> {
    match samples {
        0 => Vec::new(),
        1 => vec![0.0],
        n => {
            let step = max_yield / (n - 1) as f64;
            (0..n).map(|i| step * i as f64).collect()
        }
    }
}

/// Sample the proactive curve over `yields`.
pub fn propensity_curve(yields: &[f64], location: f64, scale: f64) -> Vec<PropensityPoint> {
    yields
        .iter()
        .map(|&previous_yield| {
            let staked = compute_stake_propensity(previous_yield, location, scale);
            PropensityPoint {
                previous_yield,
                staked,
                unstaked: 1.0 - staked,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_spans_zero_to_sixteen_percent() {
        let grid = yield_grid(DEFAULT_MAX_YIELD, DEFAULT_SAMPLES);
        assert_eq!(grid.len(), 101);
        assert_eq!(grid[0], 0.0);
        assert!((grid[100] - 0.16).abs() < 1e-15);
        assert!((grid[50] - 0.08).abs() < 1e-15);
    }

    #[test]
    fn degenerate_grids() {
        assert!(yield_grid(0.16, 0).is_empty());
        assert_eq!(yield_grid(0.16, 1), vec![0.0]);
    }

    #[test]
    fn curves_cross_at_location() {
        let curve = propensity_curve(&[0.0, 0.06, 0.16], 0.06, 0.01);

        assert!(curve[0].staked < 0.01);
        assert_eq!(curve[1].staked, 0.5);
        assert_eq!(curve[1].unstaked, 0.5);
        assert!(curve[2].staked > 0.99);
        for point in &curve {
            assert!((point.staked + point.unstaked - 1.0).abs() < 1e-15);
        }
    }
}

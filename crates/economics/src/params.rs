use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a cohort reacts to the previous step's staker yield.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Policy {
    /// Every holder keeps their current behaviour.
    #[default]
    Constant,
    /// Retention follows an S-curve over the previous yield, centred on
    /// `location` with width `scale`.
    Proactive { location: f64, scale: f64 },
}

impl Policy {
    /// Proactive policy with a validated shape.
    pub fn proactive(location: f64, scale: f64) -> Result<Self, ConfigError> {
        if !location.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "yield_location".to_string(),
                value: location.to_string(),
                reason: "must be finite".to_string(),
            });
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "yield_scale".to_string(),
                value: scale.to_string(),
                reason: "must be finite and greater than 0".to_string(),
            });
        }
        Ok(Policy::Proactive { location, scale })
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            Policy::Constant => PolicyKind::Constant,
            Policy::Proactive { .. } => PolicyKind::Proactive,
        }
    }
}

/// Policy selector as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Constant,
    Proactive,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Constant => "constant",
            PolicyKind::Proactive => "proactive",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "constant" => Ok(PolicyKind::Constant),
            "proactive" => Ok(PolicyKind::Proactive),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Economic parameters, fixed for the life of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Inflation at timestep 0
    pub base_inflation_rate: f64,
    /// Yearly growth of the inflation rate (negative = disinflation)
    pub disinflation_rate: f64,
    /// Floor the schedule never decays below
    pub long_term_inflation_rate: f64,
    /// Fraction of rewards kept by validators
    pub validator_commission: f64,
    /// Fraction of time validators are up and earning
    pub validator_uptime: f64,
    /// Starting value of one unit of principal for both cohorts
    pub initial_valuation: f64,
    pub staked_policy: Policy,
    pub unstaked_policy: Policy,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            // 8% at launch, shrinking 15% a year down to 1.5%
            base_inflation_rate: 0.08,
            disinflation_rate: -0.15,
            long_term_inflation_rate: 0.015,
            validator_commission: 0.10,
            validator_uptime: 0.95,
            initial_valuation: 1_000.0,
            staked_policy: Policy::Constant,
            unstaked_policy: Policy::Constant,
        }
    }
}

impl SimulationParameters {
    /// The only check performed before a run: the schedule must decay
    /// towards its floor, not away from it.
    pub fn validate_inflation_ordering(&self) -> Result<(), ConfigError> {
        if self.long_term_inflation_rate > self.base_inflation_rate {
            return Err(ConfigError::InflationOrdering {
                base: self.base_inflation_rate,
                long_term: self.long_term_inflation_rate,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters_pass_ordering_check() {
        assert!(SimulationParameters::default()
            .validate_inflation_ordering()
            .is_ok());
    }

    #[test]
    fn ordering_check_rejects_inverted_rates() {
        let params = SimulationParameters {
            base_inflation_rate: 0.05,
            long_term_inflation_rate: 0.08,
            ..Default::default()
        };

        match params.validate_inflation_ordering() {
            Err(ConfigError::InflationOrdering { base, long_term }) => {
                assert_eq!(base, 0.05);
                assert_eq!(long_term, 0.08);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn equal_rates_are_accepted() {
        let params = SimulationParameters {
            base_inflation_rate: 0.03,
            long_term_inflation_rate: 0.03,
            ..Default::default()
        };
        assert!(params.validate_inflation_ordering().is_ok());
    }

    #[test]
    fn policy_kind_parses_case_insensitively() {
        assert_eq!("Constant".parse::<PolicyKind>().unwrap(), PolicyKind::Constant);
        assert_eq!(" PROACTIVE ".parse::<PolicyKind>().unwrap(), PolicyKind::Proactive);
        assert!(matches!(
            "greedy".parse::<PolicyKind>(),
            Err(ConfigError::UnknownPolicy(name)) if name == "greedy"
        ));
    }

    #[test]
    fn proactive_requires_positive_scale() {
        assert!(Policy::proactive(0.06, 0.01).is_ok());
        assert!(Policy::proactive(0.06, 0.0).is_err());
        assert!(Policy::proactive(0.06, -1.0).is_err());
        assert!(Policy::proactive(f64::NAN, 0.01).is_err());
    }
}

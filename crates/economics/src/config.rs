//! Flat name → value parameter maps and their conversion into run inputs.
//!
//! Callers assemble the map however they like (files, environment, UI
//! controls); this module only interprets it. Nothing here reads ambient
//! configuration.

use crate::errors::{ConfigError, SimulationError};
use crate::params::{Policy, PolicyKind, SimulationParameters};
use crate::simulation::{build_simulation, Simulation};
use crate::types::SimulationState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const INITIAL_SUPPLY: &str = "initial_supply";
pub const INITIAL_FRACTION_STAKED: &str = "initial_fraction_staked";
pub const BASE_INFLATION_RATE: &str = "base_inflation_rate";
pub const DISINFLATION_RATE: &str = "disinflation_rate";
pub const LONG_TERM_INFLATION_RATE: &str = "long_term_inflation_rate";
pub const VALIDATOR_COMMISSION_FRACTION: &str = "validator_commission_fraction";
pub const VALIDATOR_UPTIME_FREQUENCY: &str = "validator_uptime_frequency";
pub const INITIAL_VALUATION: &str = "initial_valuation";
pub const TOTAL_YEARS: &str = "total_years";
pub const STAKED_POLICY: &str = "staked_policy";
pub const UNSTAKED_POLICY: &str = "unstaked_policy";
pub const YIELD_LOCATION: &str = "yield_location";
pub const YIELD_SCALE: &str = "yield_scale";

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ParameterValue {
    /// Numeric view; text that parses as a number is accepted.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterValue::Number(n) => Some(*n),
            ParameterValue::Text(s) => s.trim().parse().ok(),
            ParameterValue::Bool(_) => None,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            ParameterValue::Bool(b) => b.to_string(),
            ParameterValue::Number(n) => n.to_string(),
            ParameterValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Number(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Text(value.to_string())
    }
}

/// Flat mapping of parameter name to value.
pub type ParameterMap = BTreeMap<String, ParameterValue>;

/// Everything needed to build one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub params: SimulationParameters,
    pub initial_supply: f64,
    pub initial_fraction_staked: f64,
    /// Horizon in years; also the number of trajectory rows.
    pub total_years: usize,
}

impl SimulationConfig {
    /// Interpret a flat parameter map. Missing required keys are reported by
    /// name; values are otherwise passed through unchecked.
    pub fn from_map(map: &ParameterMap) -> Result<Self, ConfigError> {
        let staked_kind = policy_kind(map, STAKED_POLICY)?;
        let unstaked_kind = policy_kind(map, UNSTAKED_POLICY)?;

        let shape = if staked_kind == PolicyKind::Proactive
            || unstaked_kind == PolicyKind::Proactive
        {
            Some((
                required_f64(map, YIELD_LOCATION)?,
                required_f64(map, YIELD_SCALE)?,
            ))
        } else {
            None
        };
        let policy = |kind: PolicyKind| -> Result<Policy, ConfigError> {
            match (kind, shape) {
                (PolicyKind::Proactive, Some((location, scale))) => {
                    Policy::proactive(location, scale)
                }
                _ => Ok(Policy::Constant),
            }
        };

        let params = SimulationParameters {
            base_inflation_rate: required_f64(map, BASE_INFLATION_RATE)?,
            disinflation_rate: required_f64(map, DISINFLATION_RATE)?,
            long_term_inflation_rate: required_f64(map, LONG_TERM_INFLATION_RATE)?,
            validator_commission: required_f64(map, VALIDATOR_COMMISSION_FRACTION)?,
            validator_uptime: required_f64(map, VALIDATOR_UPTIME_FREQUENCY)?,
            initial_valuation: required_f64(map, INITIAL_VALUATION)?,
            staked_policy: policy(staked_kind)?,
            unstaked_policy: policy(unstaked_kind)?,
        };

        Ok(Self {
            params,
            initial_supply: required_f64(map, INITIAL_SUPPLY)?,
            initial_fraction_staked: required_f64(map, INITIAL_FRACTION_STAKED)?,
            total_years: required_count(map, TOTAL_YEARS)?,
        })
    }

    /// Built-in defaults, matching the bundled defaults file.
    pub fn defaults() -> Self {
        Self {
            params: SimulationParameters::default(),
            initial_supply: 500_000_000.0,
            initial_fraction_staked: 0.8,
            total_years: 30,
        }
    }

    /// Flatten back into a parameter map.
    pub fn to_map(&self) -> ParameterMap {
        let p = &self.params;
        let mut map = ParameterMap::new();
        map.insert(INITIAL_SUPPLY.into(), self.initial_supply.into());
        map.insert(
            INITIAL_FRACTION_STAKED.into(),
            self.initial_fraction_staked.into(),
        );
        map.insert(BASE_INFLATION_RATE.into(), p.base_inflation_rate.into());
        map.insert(DISINFLATION_RATE.into(), p.disinflation_rate.into());
        map.insert(
            LONG_TERM_INFLATION_RATE.into(),
            p.long_term_inflation_rate.into(),
        );
        map.insert(
            VALIDATOR_COMMISSION_FRACTION.into(),
            p.validator_commission.into(),
        );
        map.insert(VALIDATOR_UPTIME_FREQUENCY.into(), p.validator_uptime.into());
        map.insert(INITIAL_VALUATION.into(), p.initial_valuation.into());
        map.insert(TOTAL_YEARS.into(), (self.total_years as f64).into());
        map.insert(STAKED_POLICY.into(), p.staked_policy.kind().as_str().into());
        map.insert(
            UNSTAKED_POLICY.into(),
            p.unstaked_policy.kind().as_str().into(),
        );
        for policy in [p.staked_policy, p.unstaked_policy] {
            if let Policy::Proactive { location, scale } = policy {
                map.insert(YIELD_LOCATION.into(), location.into());
                map.insert(YIELD_SCALE.into(), scale.into());
            }
        }
        map
    }

    pub fn initial_state(&self) -> Result<SimulationState, SimulationError> {
        SimulationState::initial(
            &self.params,
            self.initial_supply,
            self.initial_fraction_staked,
        )
        .map_err(|source| SimulationError::Domain {
            timestep: 0,
            source,
        })
    }

    /// Construct the initial state and hand everything to
    /// [`build_simulation`].
    pub fn build(&self) -> Result<Simulation, SimulationError> {
        // Ordering is reported before any state is constructed.
        self.params.validate_inflation_ordering()?;
        build_simulation(self.params.clone(), self.initial_state()?, self.total_years)
    }
}

fn required<'a>(map: &'a ParameterMap, key: &str) -> Result<&'a ParameterValue, ConfigError> {
    map.get(key)
        .ok_or_else(|| ConfigError::MissingParameter(key.to_string()))
}

fn required_f64(map: &ParameterMap, key: &str) -> Result<f64, ConfigError> {
    let value = required(map, key)?;
    value.as_f64().ok_or_else(|| ConfigError::InvalidParameter {
        name: key.to_string(),
        value: value.as_text(),
        reason: "expected a number".to_string(),
    })
}

fn required_count(map: &ParameterMap, key: &str) -> Result<usize, ConfigError> {
    let value = required_f64(map, key)?;
    if value.fract() != 0.0 || value < 1.0 || value > u32::MAX as f64 {
        return Err(ConfigError::InvalidParameter {
            name: key.to_string(),
            value: value.to_string(),
            reason: "expected a positive whole number".to_string(),
        });
    }
    Ok(value as usize)
}

fn policy_kind(map: &ParameterMap, key: &str) -> Result<PolicyKind, ConfigError> {
    match map.get(key) {
        None => Ok(PolicyKind::Constant),
        Some(ParameterValue::Text(name)) => name.parse(),
        Some(other) => Err(ConfigError::UnknownPolicy(other.as_text())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;

    #[test]
    fn defaults_round_trip_through_map() {
        let config = SimulationConfig::defaults();
        let parsed = SimulationConfig::from_map(&config.to_map()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn missing_key_is_named() {
        let mut map = SimulationConfig::defaults().to_map();
        map.remove(DISINFLATION_RATE);

        assert_eq!(
            SimulationConfig::from_map(&map),
            Err(ConfigError::MissingParameter(DISINFLATION_RATE.to_string()))
        );
    }

    #[test]
    fn numeric_text_is_accepted() {
        let mut map = SimulationConfig::defaults().to_map();
        map.insert(BASE_INFLATION_RATE.into(), "0.07".into());

        let config = SimulationConfig::from_map(&map).unwrap();
        assert_eq!(config.params.base_inflation_rate, 0.07);
    }

    #[test]
    fn non_numeric_value_is_invalid() {
        let mut map = SimulationConfig::defaults().to_map();
        map.insert(VALIDATOR_UPTIME_FREQUENCY.into(), "always".into());

        assert!(matches!(
            SimulationConfig::from_map(&map),
            Err(ConfigError::InvalidParameter { name, .. }) if name == VALIDATOR_UPTIME_FREQUENCY
        ));
    }

    #[test]
    fn proactive_policy_requires_shape_parameters() {
        let mut map = SimulationConfig::defaults().to_map();
        map.insert(STAKED_POLICY.into(), "Proactive".into());

        assert_eq!(
            SimulationConfig::from_map(&map),
            Err(ConfigError::MissingParameter(YIELD_LOCATION.to_string()))
        );

        map.insert(YIELD_LOCATION.into(), 0.06.into());
        map.insert(YIELD_SCALE.into(), 0.01.into());
        let config = SimulationConfig::from_map(&map).unwrap();
        assert_eq!(
            config.params.staked_policy,
            Policy::Proactive {
                location: 0.06,
                scale: 0.01
            }
        );
        assert_eq!(config.params.unstaked_policy, Policy::Constant);
    }

    #[test]
    fn unknown_policy_name_is_rejected() {
        let mut map = SimulationConfig::defaults().to_map();
        map.insert(UNSTAKED_POLICY.into(), "random".into());

        assert_eq!(
            SimulationConfig::from_map(&map),
            Err(ConfigError::UnknownPolicy("random".to_string()))
        );
    }

    #[test]
    fn fractional_horizon_is_invalid() {
        let mut map = SimulationConfig::defaults().to_map();
        map.insert(TOTAL_YEARS.into(), 2.5.into());
        assert!(SimulationConfig::from_map(&map).is_err());
    }

    #[test]
    fn inverted_rates_fail_before_state_construction() {
        let mut config = SimulationConfig::defaults();
        config.params.base_inflation_rate = 0.05;
        config.params.long_term_inflation_rate = 0.08;
        // Would otherwise be a domain error at timestep 0.
        config.initial_fraction_staked = 0.0;

        assert!(matches!(
            config.build(),
            Err(SimulationError::Config(ConfigError::InflationOrdering { .. }))
        ));
    }

    #[test]
    fn zero_initial_stake_is_a_timestep_zero_domain_error() {
        let mut config = SimulationConfig::defaults();
        config.initial_fraction_staked = 0.0;

        let err = config.build().unwrap_err();
        assert_eq!(err.timestep(), Some(0));
    }

    #[test]
    fn out_of_range_initial_inputs_fail_at_build() {
        let mut config = SimulationConfig::defaults();
        config.initial_fraction_staked = 1.5;
        assert_eq!(
            config.build().unwrap_err(),
            SimulationError::Domain {
                timestep: 0,
                source: DomainError::StakeFractionOutOfRange(1.5)
            }
        );

        let mut config = SimulationConfig::defaults();
        config.initial_supply = -100.0;
        assert_eq!(
            config.build().unwrap_err(),
            SimulationError::Domain {
                timestep: 0,
                source: DomainError::InvalidSupply(-100.0)
            }
        );
    }
}

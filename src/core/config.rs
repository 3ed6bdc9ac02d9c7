/*!
 * Simulation Configuration
 * Run-level settings with serde defaults and environment overrides
 */

use super::errors::{SimResult, SimulationError};
use super::limits::{
    DEFAULT_CONTEXT_SWITCH_OVERHEAD, DEFAULT_IO_DURATION_MAX, DEFAULT_IO_DURATION_MIN,
    DEFAULT_MAX_TIME,
};
use super::rng::SeededRandom;
use super::types::Tick;
use crate::runner::RunOptions;
use crate::scheduler::PolicyConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Configuration for one simulation run
///
/// Environment variables read by [`SimulationConfig::from_env`]:
/// - `SIM_POLICY`: policy name (`fcfs`, `sjf`, `srtf`, `rr`, `mlfq`)
/// - `SIM_OVERHEAD`: context-switch overhead in ticks
/// - `SIM_MAX_TIME`: safety bound for batch runs
/// - `SIM_SEED`: seed for the I/O random source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SimulationConfig {
    pub policy: PolicyConfig,
    pub context_switch_overhead: Tick,
    pub max_time: Tick,
    pub seed: Option<u64>,
    pub io_duration_min: Tick,
    pub io_duration_max: Tick,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            context_switch_overhead: DEFAULT_CONTEXT_SWITCH_OVERHEAD,
            max_time: DEFAULT_MAX_TIME,
            seed: None,
            io_duration_min: DEFAULT_IO_DURATION_MIN,
            io_duration_max: DEFAULT_IO_DURATION_MAX,
        }
    }
}

impl SimulationConfig {
    /// Defaults overridden by `SIM_*` environment variables
    pub fn from_env() -> SimResult<Self> {
        let mut config = Self::default();

        if let Some(policy) = env_var::<PolicyConfig>("SIM_POLICY")? {
            config.policy = policy;
        }
        if let Some(overhead) = env_var::<Tick>("SIM_OVERHEAD")? {
            config.context_switch_overhead = overhead;
        }
        if let Some(max_time) = env_var::<Tick>("SIM_MAX_TIME")? {
            config.max_time = max_time;
        }
        if let Some(seed) = env_var::<u64>("SIM_SEED")? {
            config.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make a run meaningless
    pub fn validate(&self) -> SimResult<()> {
        if self.max_time == 0 {
            return Err(SimulationError::invalid_config("max_time must be at least 1"));
        }
        if self.io_duration_min == 0 || self.io_duration_min > self.io_duration_max {
            return Err(SimulationError::invalid_config(format!(
                "I/O duration range {}..={} is empty",
                self.io_duration_min, self.io_duration_max
            )));
        }
        self.policy.validate()
    }

    /// Random source described by this configuration
    pub fn random_source(&self) -> SimResult<SeededRandom> {
        let base = match self.seed {
            Some(seed) => SeededRandom::from_seed(seed),
            None => SeededRandom::from_entropy(),
        };
        base.with_io_range(self.io_duration_min, self.io_duration_max)
    }

    /// Options for the batch runner
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            max_time: self.max_time,
            context_switch_overhead: self.context_switch_overhead,
            seed: self.seed.unwrap_or_default(),
            io_duration: (self.io_duration_min, self.io_duration_max),
        }
    }
}

fn env_var<T: FromStr>(key: &str) -> SimResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            SimulationError::invalid_config(format!("{}={:?}: {}", key, raw, e))
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.context_switch_overhead, 1);
        assert_eq!(config.max_time, DEFAULT_MAX_TIME);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"max_time": 500, "seed": 3}"#).unwrap();
        assert_eq!(config.max_time, 500);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.io_duration_min, DEFAULT_IO_DURATION_MIN);
    }

    #[test]
    fn test_invalid_io_range() {
        let config = SimulationConfig {
            io_duration_min: 9,
            io_duration_max: 2,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_run_options_carry_seed() {
        let config = SimulationConfig {
            seed: Some(11),
            ..SimulationConfig::default()
        };
        assert_eq!(config.run_options().seed, 11);
    }

    #[test]
    fn test_seeded_random_source_replays() {
        use crate::core::rng::RandomSource;

        let config = SimulationConfig {
            seed: Some(5),
            io_duration_min: 2,
            io_duration_max: 2,
            ..SimulationConfig::default()
        };
        let mut a = config.random_source().unwrap();
        let mut b = config.random_source().unwrap();
        assert_eq!(a.chance(0.5), b.chance(0.5));
        assert_eq!(a.io_duration(), 2);
    }
}

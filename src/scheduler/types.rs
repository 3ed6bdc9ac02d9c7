/*!
 * Scheduler Types
 * Policy configuration and descriptive types
 */

use super::fcfs::Fcfs;
use super::mlfq::Mlfq;
use super::round_robin::RoundRobin;
use super::sjf::Sjf;
use super::traits::SchedulingPolicy;
use crate::core::errors::{SimResult, SimulationError};
use crate::core::limits::{
    DEFAULT_BOOST_INTERVAL, DEFAULT_MLFQ_LEVELS, DEFAULT_MLFQ_QUANTA, DEFAULT_TIME_QUANTUM,
};
use crate::core::types::Tick;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of policies the simulator knows how to build
///
/// Each call to [`PolicyConfig::build`] yields an independent instance, so
/// comparison runs never share policy state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyConfig {
    /// First come, first served
    Fcfs,
    /// Shortest job first, non-preemptive
    Sjf,
    /// Shortest remaining time first (preemptive SJF)
    Srtf,
    /// Round robin with a fixed quantum
    RoundRobin {
        #[serde(default = "default_time_quantum")]
        time_quantum: Tick,
    },
    /// Multi-level feedback queue
    Mlfq {
        #[serde(default = "default_levels")]
        levels: usize,
        #[serde(default = "default_quanta")]
        quanta: Vec<Tick>,
        #[serde(default = "default_boost_interval")]
        boost_interval: Tick,
    },
}

fn default_time_quantum() -> Tick {
    DEFAULT_TIME_QUANTUM
}

fn default_levels() -> usize {
    DEFAULT_MLFQ_LEVELS
}

fn default_quanta() -> Vec<Tick> {
    DEFAULT_MLFQ_QUANTA.to_vec()
}

fn default_boost_interval() -> Tick {
    DEFAULT_BOOST_INTERVAL
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::round_robin()
    }
}

impl PolicyConfig {
    #[must_use]
    pub fn round_robin() -> Self {
        Self::RoundRobin {
            time_quantum: DEFAULT_TIME_QUANTUM,
        }
    }

    #[must_use]
    pub fn mlfq() -> Self {
        Self::Mlfq {
            levels: DEFAULT_MLFQ_LEVELS,
            quanta: DEFAULT_MLFQ_QUANTA.to_vec(),
            boost_interval: DEFAULT_BOOST_INTERVAL,
        }
    }

    /// The four policies with their default settings
    #[must_use]
    pub fn all() -> Vec<Self> {
        vec![Self::Fcfs, Self::Sjf, Self::Srtf, Self::round_robin(), Self::mlfq()]
    }

    /// Build a fresh policy instance
    pub fn build(&self) -> SimResult<Box<dyn SchedulingPolicy>> {
        Ok(match self {
            Self::Fcfs => Box::new(Fcfs),
            Self::Sjf => Box::new(Sjf::new(false)),
            Self::Srtf => Box::new(Sjf::new(true)),
            Self::RoundRobin { time_quantum } => Box::new(RoundRobin::new(*time_quantum)),
            Self::Mlfq {
                levels,
                quanta,
                boost_interval,
            } => Box::new(Mlfq::new(*levels, quanta.clone(), *boost_interval)?),
        })
    }

    pub fn validate(&self) -> SimResult<()> {
        self.build().map(|_| ())
    }

    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::Sjf => "sjf",
            Self::Srtf => "srtf",
            Self::RoundRobin { .. } => "round_robin",
            Self::Mlfq { .. } => "mlfq",
        }
    }
}

impl FromStr for PolicyConfig {
    type Err = SimulationError;

    /// Parse a policy name with default settings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fcfs" | "fifo" => Ok(Self::Fcfs),
            "sjf" => Ok(Self::Sjf),
            "srtf" | "sjf_preemptive" => Ok(Self::Srtf),
            "round_robin" | "roundrobin" | "rr" => Ok(Self::round_robin()),
            "mlfq" | "feedback" => Ok(Self::mlfq()),
            _ => Err(SimulationError::invalid_config(format!(
                "Invalid policy '{}'. Valid: fcfs, sjf, srtf, round_robin, mlfq",
                s
            ))),
        }
    }
}

impl fmt::Display for PolicyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializable description of the active policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PolicyInfo {
    pub name: String,
    pub preemptive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_quantum: Option<Tick>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub level_quanta: Vec<Tick>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost_interval: Option<Tick>,
}

impl PolicyInfo {
    pub(crate) fn simple(name: &str, preemptive: bool) -> Self {
        Self {
            name: name.to_string(),
            preemptive,
            time_quantum: None,
            level_quanta: Vec::new(),
            boost_interval: None,
        }
    }
}

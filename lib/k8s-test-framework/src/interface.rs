//! An interface into the system.

use std::{env, str::FromStr, time::Duration};

use snafu::ensure;

use crate::{error::InvalidEnvSnafu, predicates::PodReadiness, Result, WaitConfig};

/// Test settings read from the environment: the namespace to work in, how to
/// poll while waiting, and when a verification pod counts as ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    /// The namespace test resources are created in.
    pub namespace: String,

    /// How to poll while waiting for resources.
    pub wait: WaitConfig,

    /// What counts as a verification pod being ready to be read.
    pub pod_readiness: PodReadiness,
}

impl Interface {
    pub const NAMESPACE_ENV: &'static str = "PIPELINE_E2E_NAMESPACE";
    pub const POLL_INTERVAL_ENV: &'static str = "PIPELINE_E2E_POLL_INTERVAL";
    pub const TIMEOUT_ENV: &'static str = "PIPELINE_E2E_TIMEOUT";
    pub const POD_READINESS_ENV: &'static str = "PIPELINE_E2E_POD_READINESS";

    /// Create a new [`Interface`] instance with the parameters obtained from
    /// the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Create a new [`Interface`] instance with the parameters obtained from
    /// `lookup`; unset values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let namespace = lookup(Self::NAMESPACE_ENV).unwrap_or(defaults.namespace);
        let interval = lookup(Self::POLL_INTERVAL_ENV)
            .map(|value| parse_interval(Self::POLL_INTERVAL_ENV, value))
            .transpose()?
            .unwrap_or(defaults.wait.interval);
        let timeout = lookup(Self::TIMEOUT_ENV)
            .map(|value| parse_duration(Self::TIMEOUT_ENV, value))
            .transpose()?
            .unwrap_or(defaults.wait.timeout);
        let pod_readiness = lookup(Self::POD_READINESS_ENV)
            .map(|value| {
                PodReadiness::from_str(&value).map_err(|reason| {
                    InvalidEnvSnafu {
                        var: Self::POD_READINESS_ENV,
                        value,
                        reason,
                    }
                    .build()
                })
            })
            .transpose()?
            .unwrap_or(defaults.pod_readiness);

        Ok(Self {
            namespace,
            wait: WaitConfig::new(interval, timeout),
            pod_readiness,
        })
    }
}

impl Default for Interface {
    fn default() -> Self {
        Self {
            namespace: "default".to_owned(),
            wait: WaitConfig::default(),
            pod_readiness: PodReadiness::default(),
        }
    }
}

fn parse_interval(var: &'static str, value: String) -> Result<Duration> {
    let interval = parse_duration(var, value.clone())?;
    ensure!(
        !interval.is_zero(),
        InvalidEnvSnafu {
            var,
            value,
            reason: "poll interval must be greater than zero",
        }
    );
    Ok(interval)
}

fn parse_duration(var: &'static str, value: String) -> Result<Duration> {
    humantime::parse_duration(&value).map_err(|error| {
        InvalidEnvSnafu {
            var,
            value,
            reason: error.to_string(),
        }
        .build()
    })
}

//! Ready-made predicates for [`wait_for_state`](crate::wait_for_state).

use std::{fmt, str::FromStr};

use k8s_openapi::api::core::v1::Pod;

use crate::{wait_for_resource::PredicateResult, ObservedPhase};

/// Which pod phases count as "ready to be read".
///
/// A pod that only prints a file can go through `Running` and reach
/// `Succeeded` between two polls, and with the default restart policy it is
/// restarted and seen as `Running` again. Waiting for `Succeeded` alone can
/// therefore miss it, while waiting for `Running` alone may read the output
/// before it is complete. Which trade-off to take is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PodReadiness {
    Running,
    Succeeded,
    #[default]
    RunningOrSucceeded,
}

impl PodReadiness {
    pub fn accepts(self, phase: &str) -> bool {
        match self {
            Self::Running => phase == "Running",
            Self::Succeeded => phase == "Succeeded",
            Self::RunningOrSucceeded => phase == "Running" || phase == "Succeeded",
        }
    }
}

impl FromStr for PodReadiness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "succeeded" => Ok(Self::Succeeded),
            "running-or-succeeded" => Ok(Self::RunningOrSucceeded),
            other => Err(format!(
                "unknown pod readiness {:?}, expected one of \"running\", \"succeeded\", \"running-or-succeeded\"",
                other
            )),
        }
    }
}

impl fmt::Display for PodReadiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::RunningOrSucceeded => "running-or-succeeded",
        })
    }
}

/// A pod that was scheduled and failed.
#[derive(Debug)]
pub struct PodFailed {
    pub reason: Option<String>,
    pub message: Option<String>,
}

impl fmt::Display for PodFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pod failed")?;
        if let Some(reason) = &self.reason {
            write!(f, " ({})", reason)?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for PodFailed {}

/// Satisfied once the pod's phase is accepted by `readiness`. A `Failed` pod
/// is reported as an error, since it won't ever become ready.
pub fn pod_ready(readiness: PodReadiness) -> impl FnMut(&Pod) -> PredicateResult {
    move |pod: &Pod| -> PredicateResult {
        match pod.observed_phase().as_deref() {
            Some("Failed") => {
                let status = pod.status.as_ref();
                Err(PodFailed {
                    reason: status.and_then(|status| status.reason.clone()),
                    message: status.and_then(|status| status.message.clone()),
                }
                .into())
            }
            Some(phase) => Ok(readiness.accepts(phase)),
            None => Ok(false),
        }
    }
}

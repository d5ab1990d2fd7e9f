//! Wait for a resource to reach a certain state.

use std::time::Duration;

use snafu::ResultExt;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    error::{PredicateFailedSnafu, TimeoutSnafu},
    BoxError, ClusterClient, ClusterResource, ObservedPhase, Result,
};

/// The outcome of checking an observed object: `Ok(true)` when the awaited
/// state is reached, `Ok(false)` to keep waiting, `Err(_)` when the object is
/// in a state it will never recover from.
pub type PredicateResult = std::result::Result<bool, BoxError>;

/// Classifies an observed object as satisfied, not yet satisfied, or failed.
///
/// The poller has no notion of success or failure phases of its own; all of
/// that lives in the predicate.
pub trait Predicate<K> {
    fn check(&mut self, object: &K) -> PredicateResult;
}

impl<K, F> Predicate<K> for F
where
    F: FnMut(&K) -> PredicateResult,
{
    fn check(&mut self, object: &K) -> PredicateResult {
        self(object)
    }
}

/// How often to poll and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl WaitConfig {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10 * 60);

    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL, Self::DEFAULT_TIMEOUT)
    }
}

/// Poll the object `name` in `namespace` until `predicate` is satisfied.
///
/// Returns the object that satisfied the predicate. A failure to fetch the
/// object is considered transient and retried until the deadline; an error
/// from the predicate is returned right away. The object is always fetched at
/// least once, even if `wait.timeout` is zero.
///
/// `label` only shows up in logs and errors.
pub async fn wait_for_state<C, K, P>(
    client: &C,
    name: &str,
    namespace: &str,
    mut predicate: P,
    label: &str,
    wait: WaitConfig,
) -> Result<K>
where
    C: ClusterClient + ?Sized,
    K: ClusterResource + ObservedPhase,
    P: Predicate<K>,
{
    let start = Instant::now();
    // A timeout too large to represent never expires.
    let deadline = start.checked_add(wait.timeout);
    let mut last_phase = None;
    let mut last_fetch_error = None;
    let mut attempts: u64 = 0;

    info!(
        message = "Waiting for resource.",
        %label,
        %name,
        %namespace,
        kind = %K::kind(&()),
        timeout = ?wait.timeout,
    );

    loop {
        attempts += 1;
        match client.get::<K>(name, namespace).await {
            Ok(object) => {
                last_phase = object.observed_phase();
                last_fetch_error = None;
                debug!(message = "Observed resource.", %label, attempts, phase = ?last_phase);
                let satisfied = predicate.check(&object).context(PredicateFailedSnafu {
                    label,
                    name,
                    namespace,
                })?;
                if satisfied {
                    info!(message = "Resource reached the awaited state.", %label, %name, attempts);
                    return Ok(object);
                }
            }
            Err(error) => {
                debug!(message = "Failed to fetch resource; retrying.", %label, %name, %error);
                last_fetch_error = Some(error.to_string());
            }
        }

        let now = Instant::now();
        let remaining = match deadline {
            Some(deadline) => deadline.saturating_duration_since(now),
            None => wait.interval,
        };
        if deadline.is_some() && remaining.is_zero() {
            warn!(message = "Timed out waiting for resource.", %label, %name, attempts, phase = ?last_phase);
            return TimeoutSnafu {
                label,
                name,
                namespace,
                elapsed: now - start,
                last_phase,
                last_fetch_error,
            }
            .fail();
        }
        tokio::time::sleep(wait.interval.min(remaining)).await;
    }
}

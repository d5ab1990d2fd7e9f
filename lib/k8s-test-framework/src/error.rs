use std::{string::FromUtf8Error, time::Duration};

use snafu::Snafu;

/// A boxed error, used for predicate failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while verifying a workload.
///
/// Transient failures to read a resource while polling are not represented
/// here: they are retried until the deadline and then reported as part of
/// [`Error::Timeout`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Failed to create {} {}/{}: {}.", kind, namespace, name, source))]
    ResourceCreation {
        kind: String,
        name: String,
        namespace: String,
        source: kube::Error,
    },

    #[snafu(display(
        "{}: {}/{} reached a state it can't recover from: {}.",
        label,
        namespace,
        name,
        source
    ))]
    PredicateFailed {
        label: String,
        name: String,
        namespace: String,
        source: BoxError,
    },

    #[snafu(display(
        "{}: timed out after {:?} waiting for {}/{} (last phase: {}, last fetch error: {}).",
        label,
        elapsed,
        namespace,
        name,
        last_phase.as_deref().unwrap_or("<none>"),
        last_fetch_error.as_deref().unwrap_or("<none>")
    ))]
    Timeout {
        label: String,
        name: String,
        namespace: String,
        elapsed: Duration,
        last_phase: Option<String>,
        last_fetch_error: Option<String>,
    },

    #[snafu(display("Failed to open log stream of pod {}/{}: {}.", namespace, pod, source))]
    StreamOpen {
        pod: String,
        namespace: String,
        source: kube::Error,
    },

    #[snafu(display(
        "Failed reading log stream of pod {}/{} after {} bytes: {}.",
        namespace,
        pod,
        partial.len(),
        source
    ))]
    StreamRead {
        pod: String,
        namespace: String,
        /// Whatever was read before the stream broke.
        partial: Vec<u8>,
        source: std::io::Error,
    },

    #[snafu(display("Log output of pod {}/{} is not valid UTF-8: {}.", namespace, pod, source))]
    LogEncoding {
        pod: String,
        namespace: String,
        source: FromUtf8Error,
    },

    #[snafu(display("Invalid value {:?} for environment variable {}: {}.", value, var, reason))]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },
}

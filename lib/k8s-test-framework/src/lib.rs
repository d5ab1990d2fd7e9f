//! Kubernetes test framework.
//!
//! The main goal of the design of this test framework is to allow verifying
//! that a workload actually ran by inspecting what it left behind on a shared
//! volume. A companion pod mounts the volume, prints the file of interest, and
//! the framework waits for that pod and reads its output back.
//!
//! The cluster is reached through the [`ClusterClient`] trait, which is
//! implemented for [`kube::Client`]. Test bodies should interact with the
//! cluster via the [`Framework`] type.

#![deny(missing_debug_implementations)]

pub mod client;
mod error;
pub mod framework;
pub mod interface;
pub mod log_lookup;
#[cfg(any(test, feature = "mocks"))]
pub mod mock;
pub mod phase;
pub mod predicates;
pub mod wait_for_resource;

pub use client::{ClusterClient, ClusterResource, LogStream};
pub use error::{BoxError, Error, Result};
pub use framework::Framework;
pub use interface::Interface;
pub use log_lookup::fetch_output;
pub use phase::ObservedPhase;
pub use wait_for_resource::{wait_for_state, Predicate, WaitConfig};

/// Install a `tracing` subscriber for test output.
///
/// The filter is taken from `RUST_LOG` and defaults to `info`. Calling this
/// more than once is harmless.
pub fn trace_init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

//! Coarse lifecycle phase of an observed object, for diagnostics.

use k8s_openapi::api::core::v1::Pod;

/// Exposes the coarse lifecycle phase of an object (`Pending`, `Running`,
/// `Succeeded`, `Failed`, `Unknown`, ...).
///
/// The poller only uses this to report what it saw last when it gives up; it
/// never decides anything based on it.
pub trait ObservedPhase {
    fn observed_phase(&self) -> Option<String>;
}

impl ObservedPhase for Pod {
    fn observed_phase(&self) -> Option<String> {
        self.status.as_ref()?.phase.clone()
    }
}

//! End-to-end verification of pipeline runs.
//!
//! A run proves it did its work by writing a log file to the volume claim it
//! owns. The helpers here build the pipeline resources, deploy a pod that
//! mounts the same claim and prints that file, and hand its output back to the
//! test for assertion.

#![deny(missing_debug_implementations)]

pub mod crd;
pub mod log_volume;
pub mod predicates;
pub mod resources;
pub mod verify;

pub use log_volume::LogVolume;
pub use verify::{build_output_from_volume, run_hello_world_pipeline, run_hello_world_task};

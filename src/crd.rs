//! Custom resources of the pipeline system under test.
//!
//! Only the fields the tests set or inspect are modelled.

use k8s_openapi::api::core::v1::Container;
use k8s_test_framework::ObservedPhase;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// A reusable unit of work: an ordered list of steps, each run as a container.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
    group = "tekton.dev",
    version = "v1alpha1",
    kind = "Task",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Container>,
}

/// One execution of a [`Task`].
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
    group = "tekton.dev",
    version = "v1alpha1",
    kind = "TaskRun",
    namespaced,
    status = "RunStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct TaskRunSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_ref: Option<TaskRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskRef {
    pub name: String,
}

/// An ordered composition of tasks.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
    group = "tekton.dev",
    version = "v1alpha1",
    kind = "Pipeline",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<PipelineTask>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTask {
    pub name: String,
    pub task_ref: TaskRef,
}

/// One execution of a [`Pipeline`].
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
    group = "tekton.dev",
    version = "v1alpha1",
    kind = "PipelineRun",
    namespaced,
    status = "RunStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRunSpec {
    pub pipeline_ref: PipelineRef,
    #[serde(default)]
    pub trigger: PipelineTrigger,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineRef {
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PipelineTrigger {
    #[serde(rename = "type")]
    pub type_: String,
}

impl Default for PipelineTrigger {
    fn default() -> Self {
        Self {
            type_: "manual".to_owned(),
        }
    }
}

/// Status shared by task runs and pipeline runs.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RunStatus {
    pub const SUCCEEDED: &'static str = "Succeeded";

    /// The `Succeeded` condition, if the controller has reported one yet.
    pub fn succeeded(&self) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|condition| condition.type_ == Self::SUCCEEDED)
    }

    /// `Succeeded` or `Failed` once the run finished, `Running` before that.
    pub fn phase(&self) -> Option<&'static str> {
        self.succeeded().map(|condition| match condition.status.as_str() {
            "True" => "Succeeded",
            "False" => "Failed",
            _ => "Running",
        })
    }
}

/// A resource that carries a [`RunStatus`].
pub trait Run {
    fn run_status(&self) -> Option<&RunStatus>;
}

impl Run for TaskRun {
    fn run_status(&self) -> Option<&RunStatus> {
        self.status.as_ref()
    }
}

impl Run for PipelineRun {
    fn run_status(&self) -> Option<&RunStatus> {
        self.status.as_ref()
    }
}

impl ObservedPhase for TaskRun {
    fn observed_phase(&self) -> Option<String> {
        self.run_status()?.phase().map(str::to_owned)
    }
}

impl ObservedPhase for PipelineRun {
    fn observed_phase(&self) -> Option<String> {
        self.run_status()?.phase().map(str::to_owned)
    }
}

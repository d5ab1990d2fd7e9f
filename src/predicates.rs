//! Predicates over task runs and pipeline runs.

use std::fmt;

use k8s_test_framework::wait_for_resource::PredicateResult;

use crate::crd::{Condition, PipelineRun, Run, TaskRun};

/// A run finished unsuccessfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFailed {
    pub reason: Option<String>,
    pub message: Option<String>,
}

impl fmt::Display for RunFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run failed")?;
        if let Some(reason) = &self.reason {
            write!(f, " ({})", reason)?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for RunFailed {}

impl From<&Condition> for RunFailed {
    fn from(condition: &Condition) -> Self {
        Self {
            reason: condition.reason.clone(),
            message: condition.message.clone(),
        }
    }
}

/// Satisfied once the run's `Succeeded` condition is `True`; a `False`
/// condition is an error.
pub fn run_succeeded<K: Run>() -> impl FnMut(&K) -> PredicateResult {
    |run: &K| -> PredicateResult {
        match run.run_status().and_then(|status| status.succeeded()) {
            Some(condition) if condition.status == "True" => Ok(true),
            Some(condition) if condition.status == "False" => {
                Err(RunFailed::from(condition).into())
            }
            _ => Ok(false),
        }
    }
}

pub fn task_run_succeeded() -> impl FnMut(&TaskRun) -> PredicateResult {
    run_succeeded::<TaskRun>()
}

pub fn pipeline_run_succeeded() -> impl FnMut(&PipelineRun) -> PredicateResult {
    run_succeeded::<PipelineRun>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{RunStatus, TaskRunSpec};

    fn task_run(conditions: Vec<Condition>) -> TaskRun {
        let mut run = TaskRun::new("run", TaskRunSpec::default());
        run.status = Some(RunStatus { conditions });
        run
    }

    fn succeeded(status: &str) -> Condition {
        Condition {
            type_: "Succeeded".to_owned(),
            status: status.to_owned(),
            ..Condition::default()
        }
    }

    #[test]
    fn pending_run_is_not_satisfied() {
        let mut predicate = run_succeeded::<TaskRun>();

        assert!(!predicate(&TaskRun::new("run", TaskRunSpec::default())).unwrap());
        assert!(!predicate(&task_run(vec![])).unwrap());
        assert!(!predicate(&task_run(vec![succeeded("Unknown")])).unwrap());
    }

    #[test]
    fn succeeded_run_is_satisfied() {
        let mut predicate = task_run_succeeded();
        assert!(predicate(&task_run(vec![succeeded("True")])).unwrap());
    }

    #[test]
    fn failed_run_is_an_error() {
        let mut predicate = run_succeeded::<TaskRun>();
        let mut condition = succeeded("False");
        condition.reason = Some("Failed".to_owned());
        condition.message = Some("step helloworld-busybox exited with 1".to_owned());

        let error = predicate(&task_run(vec![condition])).unwrap_err();

        assert_eq!(
            error.to_string(),
            "run failed (Failed): step helloworld-busybox exited with 1"
        );
    }

    #[test]
    fn works_for_pipeline_runs() {
        let mut run: PipelineRun = serde_json::from_value(serde_json::json!({
            "apiVersion": "tekton.dev/v1alpha1",
            "kind": "PipelineRun",
            "metadata": { "name": "pipeline-run" },
            "spec": { "pipelineRef": { "name": "pipeline" } },
        }))
        .unwrap();
        let mut predicate = pipeline_run_succeeded();
        assert!(!predicate(&run).unwrap());

        run.status = Some(RunStatus {
            conditions: vec![succeeded("True")],
        });
        assert!(predicate(&run).unwrap());
    }
}

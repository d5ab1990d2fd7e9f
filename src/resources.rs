//! Declarative descriptions of the resources the tests deploy.
//!
//! Everything here is pure construction; nothing talks to the cluster.

use k8s_openapi::{
    api::core::v1::{
        Container, PersistentVolumeClaimVolumeSource, Pod, PodSpec, Volume, VolumeMount,
    },
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};

use crate::{
    crd::{
        Pipeline, PipelineRef, PipelineRun, PipelineRunSpec, PipelineSpec, PipelineTask, Task,
        TaskRef, TaskRun, TaskRunSpec, TaskSpec,
    },
    log_volume::LogVolume,
};

pub const HW_TASK_NAME: &str = "helloworld";
pub const HW_TASK_RUN_NAME: &str = "helloworld-run";
pub const HW_VALIDATION_POD_NAME: &str = "helloworld-validation-busybox";
pub const HW_PIPELINE_NAME: &str = "helloworld-pipeline";
pub const HW_PIPELINE_RUN_NAME: &str = "helloworld-pipelinerun";
pub const HW_PIPELINE_TASK_NAME_1: &str = "helloworld-task-1";
pub const HW_PIPELINE_TASK_NAME_2: &str = "helloworld-task-2";
pub const HW_CONTAINER_NAME: &str = "helloworld-busybox";

/// What the hello world task writes to its log.
pub const TASK_OUTPUT: &str = "do you want to build a snowman";

const BUSYBOX_IMAGE: &str = "busybox";
const LOG_VOLUME_NAME: &str = "scratch";

fn metadata(namespace: &str, name: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_owned()),
        namespace: Some(namespace.to_owned()),
        ..ObjectMeta::default()
    }
}

/// A task with a single busybox step running `args` as its command.
pub fn hello_world_task(namespace: &str, args: Vec<String>) -> Task {
    Task {
        metadata: metadata(namespace, HW_TASK_NAME),
        spec: TaskSpec {
            steps: vec![Container {
                name: HW_CONTAINER_NAME.to_owned(),
                image: Some(BUSYBOX_IMAGE.to_owned()),
                command: Some(args),
                ..Container::default()
            }],
        },
    }
}

pub fn hello_world_task_run(namespace: &str) -> TaskRun {
    TaskRun {
        metadata: metadata(namespace, HW_TASK_RUN_NAME),
        spec: TaskRunSpec {
            task_ref: Some(TaskRef {
                name: HW_TASK_NAME.to_owned(),
            }),
            ..TaskRunSpec::default()
        },
        status: None,
    }
}

/// A pipeline running the hello world task twice.
pub fn hello_world_pipeline(namespace: &str) -> Pipeline {
    let task = |name: &str| PipelineTask {
        name: name.to_owned(),
        task_ref: TaskRef {
            name: HW_TASK_NAME.to_owned(),
        },
    };
    Pipeline {
        metadata: metadata(namespace, HW_PIPELINE_NAME),
        spec: PipelineSpec {
            tasks: vec![task(HW_PIPELINE_TASK_NAME_1), task(HW_PIPELINE_TASK_NAME_2)],
        },
    }
}

pub fn hello_world_pipeline_run(namespace: &str) -> PipelineRun {
    PipelineRun {
        metadata: metadata(namespace, HW_PIPELINE_RUN_NAME),
        spec: PipelineRunSpec {
            pipeline_ref: PipelineRef {
                name: HW_PIPELINE_NAME.to_owned(),
            },
            ..PipelineRunSpec::default()
        },
        status: None,
    }
}

/// Name of the pod that reads the volume claimed as `claim_name`.
pub fn verification_pod_name(claim_name: &str) -> String {
    format!("{}-validation", claim_name)
}

/// A pod named [`HW_VALIDATION_POD_NAME`] that mounts the claim
/// `volume_claim_name` and prints the log file of the run that claim belongs
/// to.
pub fn verification_pod(namespace: &str, volume_claim_name: &str) -> Pod {
    verification_pod_named(
        namespace,
        HW_VALIDATION_POD_NAME,
        &LogVolume::for_run(volume_claim_name),
    )
}

/// Like [`verification_pod`], for an arbitrary log location.
///
/// The pod is named after the claim, see [`verification_pod_name`], so
/// volumes of different runs never share a pod.
pub fn verification_pod_for(namespace: &str, volume: &LogVolume) -> Pod {
    verification_pod_named(
        namespace,
        &verification_pod_name(volume.claim_name()),
        volume,
    )
}

fn verification_pod_named(namespace: &str, name: &str, volume: &LogVolume) -> Pod {
    Pod {
        metadata: metadata(namespace, name),
        spec: Some(PodSpec {
            containers: vec![Container {
                name: HW_VALIDATION_POD_NAME.to_owned(),
                image: Some(BUSYBOX_IMAGE.to_owned()),
                command: Some(vec!["cat".to_owned()]),
                args: Some(vec![volume.log_file_path()]),
                volume_mounts: Some(vec![VolumeMount {
                    name: LOG_VOLUME_NAME.to_owned(),
                    mount_path: volume.mount_path().to_owned(),
                    read_only: Some(true),
                    ..VolumeMount::default()
                }]),
                ..Container::default()
            }],
            volumes: Some(vec![Volume {
                name: LOG_VOLUME_NAME.to_owned(),
                persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                    claim_name: volume.claim_name().to_owned(),
                    read_only: Some(true),
                }),
                ..Volume::default()
            }]),
            ..PodSpec::default()
        }),
        ..Pod::default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn verification_pod_mounts_the_run_claim() {
        let pod = verification_pod("arendelle", "helloworld-run");

        assert_eq!(pod.metadata.name.as_deref(), Some(HW_VALIDATION_POD_NAME));
        assert_eq!(pod.metadata.namespace.as_deref(), Some("arendelle"));

        let spec = pod.spec.unwrap();
        let volumes = spec.volumes.unwrap();
        assert_eq!(volumes.len(), 1);
        let claim = volumes[0].persistent_volume_claim.as_ref().unwrap();
        assert_eq!(claim.claim_name, "helloworld-run");

        assert_eq!(spec.containers.len(), 1);
        let container = &spec.containers[0];
        assert_eq!(container.command, Some(vec!["cat".to_owned()]));
        assert_eq!(
            container.args,
            Some(vec!["/logs/process-log.txt".to_owned()])
        );
        let mounts = container.volume_mounts.as_ref().unwrap();
        assert_eq!(mounts.len(), 1);
        assert_eq!(mounts[0].name, volumes[0].name);
        assert_eq!(mounts[0].mount_path, "/logs");
    }

    #[test]
    fn verification_pod_for_custom_location() {
        let volume = LogVolume::new("other-run", "/workspace", "out.txt").unwrap();
        let pod = verification_pod_for("ns", &volume);

        assert_eq!(pod.metadata.name.as_deref(), Some("other-run-validation"));
        let spec = pod.spec.unwrap();
        assert_eq!(
            spec.containers[0].args,
            Some(vec!["/workspace/out.txt".to_owned()])
        );
        assert_eq!(
            spec.volumes.unwrap()[0]
                .persistent_volume_claim
                .as_ref()
                .unwrap()
                .claim_name,
            "other-run"
        );
    }

    #[test]
    fn verification_pods_of_different_claims_do_not_collide() {
        let first = verification_pod_for("ns", &LogVolume::for_run("first-run"));
        let second = verification_pod_for("ns", &LogVolume::for_run("second-run"));

        assert_eq!(first.metadata.name.as_deref(), Some("first-run-validation"));
        assert_eq!(second.metadata.name.as_deref(), Some("second-run-validation"));
    }

    #[test]
    fn task_writes_where_the_verification_pod_reads() {
        let volume = LogVolume::for_run(HW_TASK_RUN_NAME);
        let task = hello_world_task("ns", volume.write_command(TASK_OUTPUT));

        let step = &task.spec.steps[0];
        let script = &step.command.as_ref().unwrap()[2];
        assert!(script.contains(&volume.log_file_path()));

        let pod = verification_pod("ns", &hello_world_task_run("ns").metadata.name.unwrap());
        assert_eq!(
            pod.spec.unwrap().containers[0].args,
            Some(vec![volume.log_file_path()])
        );
    }

    #[test]
    fn task_and_run() {
        let task = hello_world_task("ns", vec!["echo".to_owned(), "hi".to_owned()]);
        similar_asserts::assert_eq!(
            serde_json::to_value(&task).unwrap(),
            json!({
                "apiVersion": "tekton.dev/v1alpha1",
                "kind": "Task",
                "metadata": { "name": "helloworld", "namespace": "ns" },
                "spec": {
                    "steps": [{
                        "name": "helloworld-busybox",
                        "image": "busybox",
                        "command": ["echo", "hi"],
                    }],
                },
            })
        );

        let run = hello_world_task_run("ns");
        assert_eq!(run.spec.task_ref.unwrap().name, HW_TASK_NAME);
    }

    #[test]
    fn pipeline_and_run() {
        let pipeline = hello_world_pipeline("ns");
        let names: Vec<_> = pipeline
            .spec
            .tasks
            .iter()
            .map(|task| task.name.as_str())
            .collect();
        assert_eq!(names, vec![HW_PIPELINE_TASK_NAME_1, HW_PIPELINE_TASK_NAME_2]);
        assert!(pipeline
            .spec
            .tasks
            .iter()
            .all(|task| task.task_ref.name == HW_TASK_NAME));

        let run = hello_world_pipeline_run("ns");
        assert_eq!(run.metadata.name.as_deref(), Some(HW_PIPELINE_RUN_NAME));
        assert_eq!(run.spec.pipeline_ref.name, HW_PIPELINE_NAME);
    }
}

//! Verify that a run did its work by reading back what it wrote to its
//! volume.

use k8s_test_framework::{ClusterClient, Framework, Result};
use tracing::info;

use crate::{
    crd::{PipelineRun, TaskRun},
    log_volume::LogVolume,
    predicates::{pipeline_run_succeeded, task_run_succeeded},
    resources::{
        hello_world_pipeline, hello_world_pipeline_run, hello_world_task, hello_world_task_run,
        verification_pod_for, HW_PIPELINE_RUN_NAME, HW_TASK_RUN_NAME, TASK_OUTPUT,
    },
};

pub const VALIDATION_POD_LABEL: &str = "ValidationPodCompleted";
pub const TASK_RUN_LABEL: &str = "TaskRunSuccess";
pub const PIPELINE_RUN_LABEL: &str = "PipelineRunSuccess";

/// Deploy a pod that mounts `volume`, wait for it to come up and return what
/// it printed from the log file.
///
/// If the pod can't be created this fails right away, without waiting.
pub async fn build_output_from_volume<C>(
    framework: &Framework<C>,
    namespace: &str,
    volume: &LogVolume,
) -> Result<String>
where
    C: ClusterClient,
{
    let pod = verification_pod_for(namespace, volume);
    let pod_name = pod.metadata.name.clone().unwrap_or_default();

    framework.create(namespace, &pod).await?;

    info!(
        message = "Waiting for pod with test volume to come up so its logs can be read.",
        claim = %volume.claim_name(),
        pod = %pod_name,
    );
    framework
        .wait_for_pod_ready(&pod_name, namespace, VALIDATION_POD_LABEL)
        .await?;

    framework.logs(&pod_name, namespace).await
}

/// Run the hello world task, which writes [`TASK_OUTPUT`] to its log volume,
/// and return the content of that log as read by a verification pod.
pub async fn run_hello_world_task<C>(framework: &Framework<C>, namespace: &str) -> Result<String>
where
    C: ClusterClient,
{
    let volume = LogVolume::for_run(HW_TASK_RUN_NAME);

    framework
        .create(
            namespace,
            &hello_world_task(namespace, volume.write_command(TASK_OUTPUT)),
        )
        .await?;
    framework
        .create(namespace, &hello_world_task_run(namespace))
        .await?;

    info!(message = "Waiting for task run to succeed.", run = HW_TASK_RUN_NAME);
    framework
        .wait::<TaskRun, _>(
            HW_TASK_RUN_NAME,
            namespace,
            task_run_succeeded(),
            TASK_RUN_LABEL,
        )
        .await?;

    build_output_from_volume(framework, namespace, &volume).await
}

/// Run the hello world pipeline and wait for it to succeed.
pub async fn run_hello_world_pipeline<C>(framework: &Framework<C>, namespace: &str) -> Result<()>
where
    C: ClusterClient,
{
    let volume = LogVolume::for_run(HW_TASK_RUN_NAME);

    framework
        .create(
            namespace,
            &hello_world_task(namespace, volume.write_command(TASK_OUTPUT)),
        )
        .await?;
    framework
        .create(namespace, &hello_world_pipeline(namespace))
        .await?;
    framework
        .create(namespace, &hello_world_pipeline_run(namespace))
        .await?;

    info!(message = "Waiting for pipeline run to succeed.", run = HW_PIPELINE_RUN_NAME);
    framework
        .wait::<PipelineRun, _>(
            HW_PIPELINE_RUN_NAME,
            namespace,
            pipeline_run_succeeded(),
            PIPELINE_RUN_LABEL,
        )
        .await?;
    Ok(())
}

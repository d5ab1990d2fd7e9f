use k8s_test_framework::Error;
use pipeline_e2e::{
    build_output_from_volume, resources::TASK_OUTPUT, run_hello_world_task, LogVolume,
};
use serial_test::serial;

use super::make_framework;

/// The hello world task writes a marker to its log volume; a pod mounting
/// the same claim must print exactly that marker.
#[tokio::test]
#[serial]
async fn task_run_output_is_on_its_volume() -> Result<(), Box<dyn std::error::Error>> {
    let framework = make_framework().await;
    let namespace = framework.interface().namespace.clone();

    let output = run_hello_world_task(&framework, &namespace).await?;

    assert_eq!(output, TASK_OUTPUT);
    Ok(())
}

/// A pod without a claim name is rejected by the API server, which fails the
/// flow before anything is polled.
#[tokio::test]
#[serial]
async fn missing_claim_name_is_rejected() {
    let framework = make_framework().await;
    let namespace = framework.interface().namespace.clone();

    let error = build_output_from_volume(&framework, &namespace, &LogVolume::for_run(""))
        .await
        .unwrap_err();

    assert!(
        matches!(error, Error::ResourceCreation { .. }),
        "unexpected error: {}",
        error
    );
}

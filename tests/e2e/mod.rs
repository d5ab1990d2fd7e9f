//! Tests against a live cluster, reached through the default kubeconfig.
//!
//! The CRDs of the pipeline system must be installed, and the namespace named
//! by `PIPELINE_E2E_NAMESPACE` must exist and be empty.

use k8s_test_framework::{trace_init, Framework, Interface};

mod helloworld;

async fn make_framework() -> Framework<kube::Client> {
    trace_init();
    let interface = Interface::from_env().expect("interface is not ready");
    let client = kube::Client::try_default()
        .await
        .expect("unable to reach the cluster");
    Framework::new(client, interface)
}

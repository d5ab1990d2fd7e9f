//! The test framework main entry point.

use k8s_openapi::api::core::v1::Pod;
use snafu::ResultExt;
use tracing::info;

use super::{
    error::ResourceCreationSnafu, fetch_output, predicates, wait_for_state, ClusterClient,
    ClusterResource, Interface, ObservedPhase, Predicate, Result,
};

/// Framework wraps the interface to the system with an easy-to-use rust API
/// optimized for implementing test cases.
#[derive(Debug)]
pub struct Framework<C> {
    client: C,
    interface: Interface,
}

impl<C> Framework<C>
where
    C: ClusterClient,
{
    /// Create a new [`Framework`] powered by the passed client and interface.
    pub fn new(client: C, interface: Interface) -> Self {
        Self { client, interface }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn interface(&self) -> &Interface {
        &self.interface
    }

    /// Submit `object` to the cluster in `namespace`.
    ///
    /// A rejection is final; nothing is retried.
    pub async fn create<K>(&self, namespace: &str, object: &K) -> Result<K>
    where
        K: ClusterResource,
    {
        let name = object.meta().name.clone().unwrap_or_default();
        let created = self
            .client
            .create(namespace, object)
            .await
            .context(ResourceCreationSnafu {
                kind: K::kind(&()),
                name: name.as_str(),
                namespace,
            })?;
        info!(message = "Created resource.", kind = %K::kind(&()), %name, %namespace);
        Ok(created)
    }

    /// Wait for the object `name` in `namespace` to satisfy `predicate`,
    /// polling as configured by the interface.
    pub async fn wait<K, P>(
        &self,
        name: &str,
        namespace: &str,
        predicate: P,
        label: &str,
    ) -> Result<K>
    where
        K: ClusterResource + ObservedPhase,
        P: Predicate<K>,
    {
        wait_for_state(
            &self.client,
            name,
            namespace,
            predicate,
            label,
            self.interface.wait,
        )
        .await
    }

    /// Wait for the pod `name` in `namespace` to be ready to be read,
    /// according to the interface's pod readiness policy.
    pub async fn wait_for_pod_ready(&self, name: &str, namespace: &str, label: &str) -> Result<()> {
        self.wait::<Pod, _>(
            name,
            namespace,
            predicates::pod_ready(self.interface.pod_readiness),
            label,
        )
        .await?;
        Ok(())
    }

    /// Read the whole output of the pod `pod_name` in `namespace`.
    pub async fn logs(&self, pod_name: &str, namespace: &str) -> Result<String> {
        fetch_output(&self.client, pod_name, namespace).await
    }
}

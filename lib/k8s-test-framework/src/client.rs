//! The seam between the framework and the cluster.

use std::{fmt::Debug, pin::Pin};

use async_trait::async_trait;
use futures::io::AsyncRead;
use k8s_openapi::{api::core::v1::Pod, NamespaceResourceScope};
use kube::{
    api::{Api, LogParams, PostParams},
    Resource,
};
use serde::{de::DeserializeOwned, Serialize};

/// A readable stream of a pod's output.
///
/// Dropping it closes the underlying connection.
pub type LogStream = Pin<Box<dyn AsyncRead + Send>>;

/// A namespaced object the framework can create and read back.
pub trait ClusterResource:
    Resource<Scope = NamespaceResourceScope, DynamicType = ()>
    + Clone
    + Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
}

impl<K> ClusterResource for K where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Clone
        + Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static
{
}

/// The operations the framework needs from a cluster.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Submit `object` to the cluster in `namespace`.
    async fn create<K: ClusterResource>(&self, namespace: &str, object: &K) -> kube::Result<K>;

    /// Read the current state of the object `name` in `namespace`.
    async fn get<K: ClusterResource>(&self, name: &str, namespace: &str) -> kube::Result<K>;

    /// Open a fresh stream of the output of pod `pod_name`.
    async fn log_stream(&self, pod_name: &str, namespace: &str) -> kube::Result<LogStream>;
}

#[async_trait]
impl ClusterClient for kube::Client {
    async fn create<K: ClusterResource>(&self, namespace: &str, object: &K) -> kube::Result<K> {
        let api: Api<K> = Api::namespaced(self.clone(), namespace);
        api.create(&PostParams::default(), object).await
    }

    async fn get<K: ClusterResource>(&self, name: &str, namespace: &str) -> kube::Result<K> {
        let api: Api<K> = Api::namespaced(self.clone(), namespace);
        api.get(name).await
    }

    async fn log_stream(&self, pod_name: &str, namespace: &str) -> kube::Result<LogStream> {
        let api: Api<Pod> = Api::namespaced(self.clone(), namespace);
        let stream = api.log_stream(pod_name, &LogParams::default()).await?;
        Ok(Box::pin(stream))
    }
}

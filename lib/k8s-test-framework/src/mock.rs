//! A mock cluster.
//!
//! Replies are scripted per object name. `get` replays the queued replies in
//! order and keeps repeating the last one once the queue is down to a single
//! reply, which models an object that stays in its final state.

use std::{
    collections::{HashMap, VecDeque},
    io,
    pin::Pin,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard,
    },
    task::{Context, Poll},
};

use async_trait::async_trait;
use futures::{
    io::{AsyncRead, Cursor},
    stream, TryStreamExt,
};
use k8s_openapi::{
    api::core::v1::{Pod, PodStatus},
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};
use kube::core::ErrorResponse;
use serde::Serialize;

use crate::{ClusterClient, ClusterResource, LogStream};

#[derive(Debug, Clone)]
enum Reply {
    Object(serde_json::Value),
    NotFound,
}

/// What reading a pod's log stream produces.
#[derive(Debug, Clone)]
pub enum LogBody {
    /// The whole body is delivered, then the stream ends.
    Complete(Vec<u8>),
    /// The given bytes are delivered, then the stream fails.
    Broken(Vec<u8>),
}

#[derive(Debug, Default)]
struct State {
    replies: HashMap<String, VecDeque<Reply>>,
    logs: HashMap<String, LogBody>,
    rejection: Option<String>,
    created: Vec<serde_json::Value>,
    get_calls: usize,
    create_calls: usize,
    log_opens: usize,
}

/// Mock [`ClusterClient`].
#[derive(Debug, Default)]
pub struct MockClient {
    state: Mutex<State>,
    closed_streams: Arc<AtomicUsize>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("mock state poisoned")
    }

    /// Queue `object` as the next reply to `get` for `name`.
    pub fn push_object<K: Serialize>(&self, name: &str, object: &K) {
        let value = serde_json::to_value(object).expect("mock object must serialize");
        self.push(name, Reply::Object(value));
    }

    /// Queue a pod named `name` in `phase`.
    pub fn push_pod_phase(&self, name: &str, phase: &str) {
        let pod = Pod {
            metadata: ObjectMeta {
                name: Some(name.to_owned()),
                ..ObjectMeta::default()
            },
            status: Some(PodStatus {
                phase: Some(phase.to_owned()),
                ..PodStatus::default()
            }),
            ..Pod::default()
        };
        self.push_object(name, &pod);
    }

    /// Queue a "not found" failure as the next reply to `get` for `name`.
    pub fn push_not_found(&self, name: &str) {
        self.push(name, Reply::NotFound);
    }

    fn push(&self, name: &str, reply: Reply) {
        self.state()
            .replies
            .entry(name.to_owned())
            .or_default()
            .push_back(reply);
    }

    /// Make every subsequent `create` fail with `message`.
    ///
    /// Without this, `create` only fails for a name that was already created.
    pub fn reject_creates(&self, message: &str) {
        self.state().rejection = Some(message.to_owned());
    }

    pub fn set_logs(&self, pod_name: &str, body: LogBody) {
        self.state().logs.insert(pod_name.to_owned(), body);
    }

    /// Objects accepted by `create`, in submission order.
    pub fn created(&self) -> Vec<serde_json::Value> {
        self.state().created.clone()
    }

    pub fn get_calls(&self) -> usize {
        self.state().get_calls
    }

    pub fn create_calls(&self) -> usize {
        self.state().create_calls
    }

    pub fn log_opens(&self) -> usize {
        self.state().log_opens
    }

    /// Number of log streams that have been dropped.
    pub fn closed_streams(&self) -> usize {
        self.closed_streams.load(Ordering::SeqCst)
    }
}

fn api_error(code: u16, reason: &str, message: String) -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".to_owned(),
        message,
        reason: reason.to_owned(),
        code,
    })
}

#[async_trait]
impl ClusterClient for MockClient {
    async fn create<K: ClusterResource>(&self, namespace: &str, object: &K) -> kube::Result<K> {
        let mut state = self.state();
        state.create_calls += 1;
        if let Some(message) = &state.rejection {
            return Err(api_error(
                422,
                "Invalid",
                format!("{} in namespace {} is invalid: {}", K::kind(&()), namespace, message),
            ));
        }
        let value = serde_json::to_value(object).map_err(kube::Error::SerdeError)?;
        let exists = state.created.iter().any(|created| {
            created["kind"] == value["kind"]
                && created["metadata"]["name"] == value["metadata"]["name"]
        });
        if exists {
            return Err(api_error(
                409,
                "AlreadyExists",
                format!(
                    "{} {} already exists",
                    K::kind(&()),
                    value["metadata"]["name"].as_str().unwrap_or_default()
                ),
            ));
        }
        state.created.push(value);
        Ok(object.clone())
    }

    async fn get<K: ClusterResource>(&self, name: &str, namespace: &str) -> kube::Result<K> {
        let mut state = self.state();
        state.get_calls += 1;
        let reply = match state.replies.get_mut(name) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match reply {
            Some(Reply::Object(value)) => {
                serde_json::from_value(value).map_err(kube::Error::SerdeError)
            }
            Some(Reply::NotFound) | None => Err(api_error(
                404,
                "NotFound",
                format!("{} {:?} not found in namespace {}", K::plural(&()), name, namespace),
            )),
        }
    }

    async fn log_stream(&self, pod_name: &str, namespace: &str) -> kube::Result<LogStream> {
        let mut state = self.state();
        state.log_opens += 1;
        let inner: LogStream = match state.logs.get(pod_name).cloned() {
            Some(LogBody::Complete(body)) => Box::pin(Cursor::new(body)),
            Some(LogBody::Broken(partial)) => Box::pin(
                stream::iter(vec![
                    Ok(partial),
                    Err(io::Error::new(io::ErrorKind::ConnectionReset, "stream reset")),
                ])
                .into_async_read(),
            ),
            None => {
                return Err(api_error(
                    404,
                    "NotFound",
                    format!("pods {:?} not found in namespace {}", pod_name, namespace),
                ))
            }
        };
        Ok(Box::pin(TrackedStream {
            inner,
            closed: Arc::clone(&self.closed_streams),
        }))
    }
}

/// Counts itself as closed when dropped.
struct TrackedStream {
    inner: LogStream,
    closed: Arc<AtomicUsize>,
}

impl AsyncRead for TrackedStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        self.get_mut().inner.as_mut().poll_read(cx, buf)
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

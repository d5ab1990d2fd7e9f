//! Read the output of a pod.

use futures::io::AsyncReadExt;
use snafu::ResultExt;
use tracing::{debug, info};

use crate::{
    error::{LogEncodingSnafu, StreamOpenSnafu, StreamReadSnafu},
    ClusterClient, Result,
};

/// Read the whole output of the pod `pod_name` in `namespace`.
///
/// Every call opens a new stream and buffers it completely, so the size of
/// the output has to be bounded by whatever produces it. The stream is closed
/// before this returns, whether the read succeeded or not. If the stream
/// breaks half way, the bytes read so far are handed back in
/// [`Error::StreamRead`](crate::Error::StreamRead).
pub async fn fetch_output<C>(client: &C, pod_name: &str, namespace: &str) -> Result<String>
where
    C: ClusterClient + ?Sized,
{
    let mut stream = client
        .log_stream(pod_name, namespace)
        .await
        .context(StreamOpenSnafu {
            pod: pod_name,
            namespace,
        })?;

    let mut buf = Vec::new();
    let read = stream.read_to_end(&mut buf).await;
    drop(stream);
    if let Err(source) = read {
        return Err(source).context(StreamReadSnafu {
            pod: pod_name,
            namespace,
            partial: buf,
        });
    }
    debug!(message = "Read pod output.", pod = %pod_name, %namespace, bytes = buf.len());

    let output = String::from_utf8(buf).context(LogEncodingSnafu {
        pod: pod_name,
        namespace,
    })?;
    info!(message = "Fetched pod output.", pod = %pod_name, %namespace);
    Ok(output)
}

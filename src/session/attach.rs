//! Attach decision and the attach capability.
//!
//! Attach is requested by an explicit `--attach`; when that is unset it
//! follows the stdin flag, so `-i` alone attaches. This mirrors how other
//! commands of the tool treat `--attach` and is kept on purpose even though it
//! can surprise callers who only wanted stdin enabled on the container.

use crate::{
    error::{Error, Result},
    transform::OverrideRequest,
};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::{Api, AttachParams},
    runtime::wait::await_condition,
    Client, ResourceExt,
};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, instrument};

/// Whether an interactive session should be opened after creation.
pub fn should_attach(request: &OverrideRequest) -> bool {
    request.attach.unwrap_or(request.stdin)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachRequest {
    pub namespace: String,
    pub pod: String,
    pub container: String,
    pub stdin: bool,
    pub tty: bool,
}

impl AttachRequest {
    /// Target the persisted pod's identity, not the locally built one.
    pub fn for_pod(pod: &Pod, container: &str, request: &OverrideRequest) -> Self {
        Self {
            namespace: pod.namespace().unwrap_or_default(),
            pod: pod.name_any(),
            container: container.to_string(),
            stdin: request.stdin,
            tty: request.tty,
        }
    }

    pub fn failure(&self, reason: impl Into<String>) -> Error {
        Error::AttachError {
            namespace: self.namespace.clone(),
            name: self.pod.clone(),
            container: self.container.clone(),
            reason: reason.into(),
        }
    }
}

/// Exit state of an attach session, when the transport reports one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttachExit {
    pub status: Option<String>,
    pub message: Option<String>,
}

impl AttachExit {
    pub fn success(&self) -> bool {
        self.status.as_deref().map_or(true, |s| s == "Success")
    }
}

/// Where the debug pod is on its way to being attachable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PodStartup {
    Pending,
    Running,
    /// Terminal phase reached without ever being attachable
    Finished(String),
}

pub fn pod_startup(pod: Option<&Pod>) -> PodStartup {
    let phase = pod
        .and_then(|p| p.status.as_ref())
        .and_then(|s| s.phase.as_deref());

    match phase {
        Some("Running") => PodStartup::Running,
        Some(phase @ ("Succeeded" | "Failed")) => PodStartup::Finished(phase.to_string()),
        _ => PodStartup::Pending,
    }
}

/// Local ends of the interactive session.
pub struct AttachStreams {
    pub input: Box<dyn AsyncRead + Send + Unpin>,
    pub output: Box<dyn AsyncWrite + Send + Unpin>,
    pub error: Box<dyn AsyncWrite + Send + Unpin>,
}

impl AttachStreams {
    pub fn stdio() -> Self {
        Self {
            input: Box::new(tokio::io::stdin()),
            output: Box::new(tokio::io::stdout()),
            error: Box::new(tokio::io::stderr()),
        }
    }

    pub fn null() -> Self {
        Self {
            input: Box::new(tokio::io::empty()),
            output: Box::new(tokio::io::sink()),
            error: Box::new(tokio::io::sink()),
        }
    }
}

/// Opens an interactive stream to a container and runs it to completion.
#[async_trait]
pub trait Attacher: Send + Sync {
    async fn attach(&self, request: &AttachRequest, streams: AttachStreams) -> Result<AttachExit>;
}

/// Attaches through the API server's attach subresource.
#[derive(Clone)]
pub struct KubeAttacher {
    client: Client,
    running_timeout: Duration,
}

impl KubeAttacher {
    pub fn new(client: Client, running_timeout: Duration) -> Self {
        Self {
            client,
            running_timeout,
        }
    }

    async fn wait_running(&self, pods: &Api<Pod>, request: &AttachRequest) -> Result<()> {
        info!(
            "Waiting up to {:?} for pod {}/{} to run",
            self.running_timeout, request.namespace, request.pod
        );

        let settled = await_condition(pods.clone(), &request.pod, |pod: Option<&Pod>| {
            pod_startup(pod) != PodStartup::Pending
        });
        let pod = match tokio::time::timeout(self.running_timeout, settled).await {
            Ok(Ok(pod)) => pod,
            Ok(Err(e)) => return Err(request.failure(e.to_string())),
            Err(_) => {
                return Err(request.failure(format!(
                    "pod did not start running within {:?}",
                    self.running_timeout
                )))
            }
        };

        match pod_startup(pod.as_ref()) {
            PodStartup::Running => Ok(()),
            PodStartup::Finished(phase) => Err(request.failure(format!(
                "pod reached phase {} before it could be attached",
                phase
            ))),
            PodStartup::Pending => Err(request.failure("pod is no longer available")),
        }
    }
}

#[async_trait]
impl Attacher for KubeAttacher {
    #[instrument(skip(self, streams), fields(pod = %request.pod, container = %request.container))]
    async fn attach(&self, request: &AttachRequest, streams: AttachStreams) -> Result<AttachExit> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), &request.namespace);
        self.wait_running(&pods, request).await?;

        let params = AttachParams::default()
            .container(request.container.clone())
            .stdin(request.stdin)
            .stdout(true)
            .stderr(!request.tty)
            .tty(request.tty);

        let mut attached = pods
            .attach(&request.pod, &params)
            .await
            .map_err(|e| request.failure(e.to_string()))?;
        info!("Attached to {}/{}", request.pod, request.container);

        let status = attached.take_status();
        let remote_stdin = attached.stdin();
        let remote_stdout = attached.stdout();
        let remote_stderr = attached.stderr();
        let AttachStreams {
            mut input,
            mut output,
            mut error,
        } = streams;

        // stdin may stay open after the remote side exits, so it is not awaited
        let upload = remote_stdin.map(|mut remote| {
            tokio::spawn(async move { tokio::io::copy(&mut input, &mut remote).await })
        });

        let download = async move {
            if let Some(mut remote) = remote_stdout {
                tokio::io::copy(&mut remote, &mut output).await?;
            }
            Ok::<_, std::io::Error>(())
        };
        let download_err = async move {
            if let Some(mut remote) = remote_stderr {
                tokio::io::copy(&mut remote, &mut error).await?;
            }
            Ok::<_, std::io::Error>(())
        };

        let copied = futures::future::try_join(download, download_err).await;
        if let Some(upload) = upload {
            upload.abort();
        }
        copied.map_err(|e| request.failure(e.to_string()))?;

        let exit = match status {
            Some(status) => status.await.map(|s| AttachExit {
                status: s.status,
                message: s.message,
            }),
            None => None,
        }
        .unwrap_or_default();

        debug!("Attach session ended: {:?}", exit);
        Ok(exit)
    }
}

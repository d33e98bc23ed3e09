use crate::{
    config::DebugConfig,
    error::{Error, Result},
    resources::PodStore,
    transform::OverrideRequest,
};
use attach::{AttachExit, AttachStreams, Attacher};
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use std::sync::Arc;
use tracing::{info, instrument};

pub mod attach;
pub mod state;

#[derive(Clone)]
pub struct Context {
    pub pods: Arc<dyn PodStore>,
    pub attacher: Arc<dyn Attacher>,
}

/// Pipeline position of a single debug invocation.
///
/// `Submitted` is the durable point: a failure after it never undoes the
/// created pod.
#[derive(Debug)]
pub enum Stage {
    Loaded {
        source: Pod,
    },
    Transformed {
        pod: Pod,
        container: String,
    },
    Submitted {
        pod: Pod,
        container: String,
    },
    Attached {
        pod: Pod,
        exit: AttachExit,
    },
    AttachFailed {
        pod: Pod,
        container: String,
        error: Error,
    },
}

/// Final result of a debug invocation.
#[derive(Debug)]
pub enum Outcome {
    /// Dry run: the derived pod, never submitted
    DryRun { pod: Pod },
    Created { pod: Pod },
    Attached { pod: Pod, exit: AttachExit },
    /// The pod exists but the interactive session could not be opened
    AttachFailed {
        pod: Pod,
        container: String,
        error: Error,
    },
}

impl Outcome {
    pub fn pod(&self) -> &Pod {
        match self {
            Outcome::DryRun { pod }
            | Outcome::Created { pod }
            | Outcome::Attached { pod, .. }
            | Outcome::AttachFailed { pod, .. } => pod,
        }
    }

    pub fn pod_name(&self) -> String {
        self.pod().name_any()
    }
}

/// Namespace of the source pod: explicit override, then config, then the
/// client default.
pub fn resolve_namespace(
    explicit: Option<&str>,
    config: &DebugConfig,
    client_default: &str,
) -> String {
    explicit
        .filter(|ns| !ns.is_empty())
        .or(config.namespace.as_deref().filter(|ns| !ns.is_empty()))
        .unwrap_or(client_default)
        .to_string()
}

/// Run load, transform, submit and optional attach, in that order.
#[instrument(skip(ctx, request, streams), fields(source = %request.source))]
pub async fn run(
    request: &OverrideRequest,
    namespace: &str,
    ctx: Arc<Context>,
    streams: AttachStreams,
) -> Result<Outcome> {
    request.validate()?;
    info!("Debugging pod {}/{}", namespace, request.source);

    let mut streams = Some(streams);
    let mut stage = state::load(request, namespace, &ctx).await?;

    loop {
        stage = match stage {
            Stage::Loaded { source } => state::transform(&source, request)?,
            Stage::Transformed { pod, .. } if request.dry_run => {
                info!("Dry run, not creating pod {}", pod.name_any());
                return Ok(Outcome::DryRun { pod });
            }
            Stage::Transformed { pod, container } => {
                state::submit(pod, container, &ctx).await?
            }
            Stage::Submitted { pod, container } => {
                if !attach::should_attach(request) {
                    return Ok(Outcome::Created { pod });
                }
                let streams = streams.take().unwrap_or_else(AttachStreams::null);
                state::attach(pod, container, request, &ctx, streams).await
            }
            Stage::Attached { pod, exit } => return Ok(Outcome::Attached { pod, exit }),
            Stage::AttachFailed {
                pod,
                container,
                error,
            } => {
                return Ok(Outcome::AttachFailed {
                    pod,
                    container,
                    error,
                })
            }
        };
    }
}

use super::{
    attach::{AttachRequest, AttachStreams},
    Context, Stage,
};
use crate::{error::Result, resources, transform, transform::OverrideRequest};
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use tracing::{info, warn};

/// → Loaded
pub async fn load(request: &OverrideRequest, namespace: &str, ctx: &Context) -> Result<Stage> {
    let source = resources::pod::load(ctx.pods.as_ref(), namespace, &request.source).await?;
    Ok(Stage::Loaded { source })
}

/// Loaded → Transformed
pub fn transform(source: &Pod, request: &OverrideRequest) -> Result<Stage> {
    let derived = transform::transform(source, request)?;
    info!(
        "Derived pod {} from {} ({:?} container {})",
        derived.pod.name_any(),
        source.name_any(),
        derived.action,
        derived.container
    );

    Ok(Stage::Transformed {
        pod: derived.pod,
        container: derived.container,
    })
}

/// Transformed → Submitted
///
/// The returned stage carries the control plane's copy of the pod.
pub async fn submit(pod: Pod, container: String, ctx: &Context) -> Result<Stage> {
    let created = resources::pod::submit(ctx.pods.as_ref(), &pod).await?;
    Ok(Stage::Submitted {
        pod: created,
        container,
    })
}

/// Submitted → Attached | AttachFailed
///
/// Never fails: the pod already exists, so attach errors are carried in the
/// stage instead of aborting.
pub async fn attach(
    pod: Pod,
    container: String,
    request: &OverrideRequest,
    ctx: &Context,
    streams: AttachStreams,
) -> Stage {
    let attach_request = AttachRequest::for_pod(&pod, &container, request);
    info!(
        "Attaching to container {} of pod {}/{}",
        container, attach_request.namespace, attach_request.pod
    );

    match ctx.attacher.attach(&attach_request, streams).await {
        Ok(exit) => Stage::Attached { pod, exit },
        Err(error) => {
            warn!("Pod {} was created but attach failed: {}", pod.name_any(), error);
            Stage::AttachFailed {
                pod,
                container,
                error,
            }
        }
    }
}

//! Derive a debug pod from an existing pod and a sparse override.
//!
//! The target container is the override's container name, or the first
//! container of the source pod when none is given. A matching container is
//! patched on a copy; otherwise a new container is appended. Every other
//! container is carried over unchanged and in order.

use crate::error::{Error, Result};
use k8s_openapi::api::core::v1::{Container, Pod};
use kube::{api::ObjectMeta, ResourceExt};
use tracing::debug;

pub mod container;
pub mod request;

pub use request::{EntryPoint, OverrideRequest};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerAction {
    Patched,
    Appended,
}

/// A pod ready for submission plus the container chosen for it.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugPod {
    pub pod: Pod,
    pub container: String,
    pub action: ContainerAction,
}

fn containers(pod: &Pod) -> &[Container] {
    pod.spec
        .as_ref()
        .map(|s| s.containers.as_slice())
        .unwrap_or_default()
}

/// Resolve the container name the override applies to.
pub fn resolve_target(source: &Pod, request: &OverrideRequest) -> Result<String> {
    if let Some(name) = request.container_name() {
        return Ok(name.to_string());
    }

    containers(source)
        .first()
        .map(|c| c.name.clone())
        .ok_or_else(|| {
            Error::ValidationError(format!(
                "pod {} has no containers and no container name was given",
                source.name_any()
            ))
        })
}

/// Build the debug pod. Pure: the source pod is never modified.
pub fn transform(source: &Pod, request: &OverrideRequest) -> Result<DebugPod> {
    let target = resolve_target(source, request)?;
    let mut spec = source.spec.clone().unwrap_or_default();
    // rejected by the API server on create
    spec.ephemeral_containers = None;
    if !request.same_node {
        spec.node_name = None;
    }

    let action = match spec.containers.iter().position(|c| c.name == target) {
        Some(index) => {
            debug!("Patching container {} of pod {}", target, source.name_any());
            spec.containers[index] = container::patch(&spec.containers[index], request);
            ContainerAction::Patched
        }
        None => {
            let shadows_init = spec
                .init_containers
                .as_ref()
                .is_some_and(|init| init.iter().any(|c| c.name == target));
            if shadows_init {
                return Err(Error::ValidationError(format!(
                    "container name {} is already used by an init container",
                    target
                )));
            }
            if request.image().is_none() {
                return Err(Error::ValidationError(format!(
                    "an image is required to add container {}",
                    target
                )));
            }

            debug!("Appending container {} to pod {}", target, source.name_any());
            spec.containers.push(container::build(&target, request));
            ContainerAction::Appended
        }
    };

    Ok(DebugPod {
        pod: Pod {
            metadata: debug_metadata(source, &request.destination_name()),
            spec: Some(spec),
            status: None,
        },
        container: target,
        action,
    })
}

/// Fresh metadata for the copy: server-owned fields and labels are not carried.
fn debug_metadata(source: &Pod, name: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: source.metadata.namespace.clone(),
        annotations: source.metadata.annotations.clone(),
        ..ObjectMeta::default()
    }
}

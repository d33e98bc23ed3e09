use crate::error::{Error, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::{Api, PostParams},
    Client, ResourceExt,
};
use tracing::{info, instrument};

/// Read and create access to pods in the control plane.
#[async_trait]
pub trait PodStore: Send + Sync {
    async fn get(&self, namespace: &str, name: &str) -> Result<Pod>;

    /// Create `pod` in its own namespace and return the persisted copy.
    async fn create(&self, pod: &Pod) -> Result<Pod>;
}

#[derive(Clone)]
pub struct KubePodStore {
    client: Client,
    field_manager: String,
}

impl KubePodStore {
    pub fn new(client: Client, field_manager: impl Into<String>) -> Self {
        Self {
            client,
            field_manager: field_manager.into(),
        }
    }
}

#[async_trait]
impl PodStore for KubePodStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Pod> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);

        pods.get(name)
            .await
            .map_err(|e| Error::from_kube(e, namespace, name))
    }

    async fn create(&self, pod: &Pod) -> Result<Pod> {
        let name = pod.name_any();
        let namespace = pod.namespace().ok_or_else(|| {
            Error::ValidationError(format!("pod {} has no namespace", name))
        })?;
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), &namespace);

        let params = PostParams {
            field_manager: Some(self.field_manager.clone()),
            ..PostParams::default()
        };

        pods.create(&params, pod)
            .await
            .map_err(|e| Error::from_kube(e, &namespace, &name))
    }
}

/// Fetch the source pod. A single attempt; failures surface unchanged.
#[instrument(skip(store))]
pub async fn load(store: &dyn PodStore, namespace: &str, name: &str) -> Result<Pod> {
    if name.is_empty() {
        return Err(Error::ValidationError(
            "a source pod name is required".to_string(),
        ));
    }

    let pod = store.get(namespace, name).await?;
    info!("Loaded pod {}/{}", namespace, name);
    Ok(pod)
}

/// Create the debug pod. A name collision is reported as
/// [`Error::PodAlreadyExists`]; no client-side pre-check is made.
#[instrument(skip(store, pod), fields(pod_name = %pod.name_any()))]
pub async fn submit(store: &dyn PodStore, pod: &Pod) -> Result<Pod> {
    let created = store.create(pod).await?;
    info!(
        "Created pod {}/{}",
        created.namespace().unwrap_or_default(),
        created.name_any()
    );
    Ok(created)
}

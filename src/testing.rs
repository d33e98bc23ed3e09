//! In-memory control plane and attach fakes for tests.

use crate::{
    error::{Error, Result},
    resources::PodStore,
    session::attach::{AttachExit, AttachRequest, AttachStreams, Attacher},
};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Container, Pod, PodSpec};
use kube::{api::ObjectMeta, ResourceExt};
use std::{collections::BTreeMap, sync::Mutex};

pub fn container(name: &str, image: &str) -> Container {
    Container {
        name: name.to_string(),
        image: Some(image.to_string()),
        ..Default::default()
    }
}

pub fn pod(namespace: &str, name: &str, containers: Vec<Container>) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: Some(PodSpec {
            containers,
            ..Default::default()
        }),
        status: None,
    }
}

#[derive(Default)]
pub struct MemoryPodStore {
    pods: Mutex<BTreeMap<(String, String), Pod>>,
    creates: Mutex<u32>,
}

impl MemoryPodStore {
    pub fn with_pods(pods: Vec<Pod>) -> Self {
        let store = Self::default();
        {
            let mut map = store.pods.lock().unwrap();
            for pod in pods {
                map.insert((pod.namespace().unwrap_or_default(), pod.name_any()), pod);
            }
        }
        store
    }

    pub fn create_calls(&self) -> u32 {
        *self.creates.lock().unwrap()
    }

    pub fn len(&self) -> usize {
        self.pods.lock().unwrap().len()
    }
}

#[async_trait]
impl PodStore for MemoryPodStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Pod> {
        self.pods
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| Error::PodNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn create(&self, pod: &Pod) -> Result<Pod> {
        *self.creates.lock().unwrap() += 1;

        let key = (pod.namespace().unwrap_or_default(), pod.name_any());
        let mut pods = self.pods.lock().unwrap();
        if pods.contains_key(&key) {
            return Err(Error::PodAlreadyExists {
                namespace: key.0,
                name: key.1,
            });
        }

        // mimic server-assigned fields
        let mut created = pod.clone();
        created.metadata.uid = Some(format!("uid-{}", pods.len() + 1));
        created.metadata.resource_version = Some("1".to_string());
        pods.insert(key, created.clone());
        Ok(created)
    }
}

pub struct FakeAttacher {
    outcome: std::result::Result<AttachExit, String>,
    requests: Mutex<Vec<AttachRequest>>,
}

impl FakeAttacher {
    pub fn succeeding() -> Self {
        Self {
            outcome: Ok(AttachExit {
                status: Some("Success".to_string()),
                message: None,
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<AttachRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Attacher for FakeAttacher {
    async fn attach(&self, request: &AttachRequest, _streams: AttachStreams) -> Result<AttachExit> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcome.clone().map_err(|reason| Error::AttachError {
            namespace: request.namespace.clone(),
            name: request.pod.clone(),
            container: request.container.clone(),
            reason,
        })
    }
}

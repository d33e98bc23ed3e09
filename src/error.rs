use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid debug request: {0}")]
    ValidationError(String),

    #[error("Pod not found: {namespace}/{name}")]
    PodNotFound { namespace: String, name: String },

    #[error("Pod already exists: {namespace}/{name}")]
    PodAlreadyExists { namespace: String, name: String },

    #[error("Kubernetes API error for pod {name}: {source}")]
    Transport {
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("Attach to {namespace}/{name} (container {container}) failed: {reason}")]
    AttachError {
        namespace: String,
        name: String,
        container: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl Error {
    /// Whether the debug pod was already persisted when this error occurred.
    ///
    /// Only attach failures happen after the create call, in which case the
    /// pod exists and can be attached to manually.
    pub fn pod_created(&self) -> bool {
        matches!(self, Error::AttachError { .. })
    }

    /// Map a kube error for pod `name` into the local taxonomy.
    pub(crate) fn from_kube(err: kube::Error, namespace: &str, name: &str) -> Self {
        match err {
            kube::Error::Api(ae) if ae.code == 404 => Error::PodNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            },
            kube::Error::Api(ae) if ae.code == 409 => Error::PodAlreadyExists {
                namespace: namespace.to_string(),
                name: name.to_string(),
            },
            source => Error::Transport {
                name: name.to_string(),
                source,
            },
        }
    }
}

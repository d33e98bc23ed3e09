use crate::error::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_FIELD_MANAGER: &str = "kubectl-debug";

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "snake_case")]
pub struct DebugConfig {
    /// Namespace override; the kubeconfig default is used when unset
    pub namespace: Option<String>,

    /// Field manager recorded on the created pod
    pub field_manager: String,

    /// How long to wait for the debug pod to run before attaching
    pub pod_running_timeout_secs: u64,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            field_manager: DEFAULT_FIELD_MANAGER.to_string(),
            pod_running_timeout_secs: 60,
        }
    }
}

impl DebugConfig {
    /// Load defaults, then `kubectl-debug.{toml,yaml,json}` if present, then
    /// `KUBECTL_DEBUG_*` environment variables.
    pub fn load() -> Result<Self> {
        Self::from_builder(
            ::config::Config::builder()
                .add_source(::config::File::with_name("kubectl-debug").required(false))
                .add_source(::config::Environment::with_prefix("KUBECTL_DEBUG")),
        )
    }

    fn from_builder(
        builder: ::config::ConfigBuilder<::config::builder::DefaultState>,
    ) -> Result<Self> {
        let defaults = Self::default();
        builder
            .set_default("field_manager", defaults.field_manager)
            .and_then(|b| b.set_default("pod_running_timeout_secs", defaults.pod_running_timeout_secs))
            .and_then(|b| b.build())
            .and_then(|c| c.try_deserialize::<Self>())
            .map_err(|e| Error::ConfigError(e.to_string()))
            .and_then(Self::validate)
    }

    fn validate(self) -> Result<Self> {
        if self.field_manager.is_empty() {
            return Err(Error::ConfigError("field_manager must not be empty".to_string()));
        }
        if self.pod_running_timeout_secs == 0 {
            return Err(Error::ConfigError(
                "pod_running_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn pod_running_timeout(&self) -> Duration {
        Duration::from_secs(self.pod_running_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_sources() {
        let config = DebugConfig::from_builder(::config::Config::builder()).unwrap();
        assert_eq!(config.namespace, None);
        assert_eq!(config.field_manager, DEFAULT_FIELD_MANAGER);
        assert_eq!(config.pod_running_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_overrides_win_over_defaults() {
        let builder = ::config::Config::builder()
            .set_override("namespace", "staging")
            .unwrap()
            .set_override("pod_running_timeout_secs", 5)
            .unwrap();
        let config = DebugConfig::from_builder(builder).unwrap();
        assert_eq!(config.namespace.as_deref(), Some("staging"));
        assert_eq!(config.pod_running_timeout_secs, 5);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let builder = ::config::Config::builder()
            .set_override("pod_running_timeout_secs", 0)
            .unwrap();
        assert!(matches!(
            DebugConfig::from_builder(builder),
            Err(Error::ConfigError(_))
        ));
    }
}

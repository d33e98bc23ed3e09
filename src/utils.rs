/// Utility functions for pod-debug

pub const DEBUG_SUFFIX: &str = "-debug";

/// Generate the default debug pod name from the source pod name
pub fn generate_debug_pod_name(source: &str) -> String {
    format!("{}{}", source, DEBUG_SUFFIX)
}

/// Treat empty strings as absent
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

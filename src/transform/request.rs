use crate::{
    error::{Error, Result},
    utils,
};

/// Sparse caller intent applied on top of an existing pod.
///
/// Optional strings treat `Some("")` the same as `None`. `stdin` and `tty` are
/// always explicit and are written to the target container unconditionally.
/// `attach` is tri-state: `None` defers to `stdin`. `same_node` keeps the
/// source's `nodeName` instead of leaving placement to the scheduler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverrideRequest {
    pub source: String,
    pub destination: Option<String>,
    pub container: Option<String>,
    pub image: Option<String>,
    pub command: Vec<String>,
    pub args: Vec<String>,
    pub stdin: bool,
    pub tty: bool,
    pub attach: Option<bool>,
    pub same_node: bool,
    pub dry_run: bool,
}

impl OverrideRequest {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.is_empty() {
            return Err(Error::ValidationError(
                "a source pod name is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Name of the pod to create, `<source>-debug` unless given.
    pub fn destination_name(&self) -> String {
        utils::non_empty(self.destination.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| utils::generate_debug_pod_name(&self.source))
    }

    pub fn container_name(&self) -> Option<&str> {
        utils::non_empty(self.container.as_deref())
    }

    pub fn image(&self) -> Option<&str> {
        utils::non_empty(self.image.as_deref())
    }

    pub fn with_entry_point(mut self, entry_point: EntryPoint) -> Self {
        self.command = entry_point.command;
        self.args = entry_point.args;
        self
    }
}

/// Entry-point and argument tokens split from the caller's trailing tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryPoint {
    pub command: Vec<String>,
    pub args: Vec<String>,
}

impl EntryPoint {
    pub const BOUNDARY: &'static str = "--";

    /// With `as_command`, tokens up to the first `--` are the entry-point and
    /// the rest are arguments. Otherwise every token is an argument.
    pub fn from_tokens(tokens: Vec<String>, as_command: bool) -> Self {
        if !as_command {
            return Self {
                command: Vec::new(),
                args: tokens,
            };
        }

        match tokens.iter().position(|t| t == Self::BOUNDARY) {
            Some(boundary) => {
                let mut command = tokens;
                let args = command.split_off(boundary + 1);
                command.truncate(boundary);
                Self { command, args }
            }
            None => Self {
                command: tokens,
                args: Vec::new(),
            },
        }
    }
}

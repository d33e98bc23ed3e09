use crate::transform::{EntryPoint, OverrideRequest};
use clap::{Parser, ValueEnum};

/// Format for printing the derived pod on `--dry-run`
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Debug a pod by copying and modifying it.
///
/// If the container exists in the copied pod it is patched, otherwise a new
/// container is added:
///
///   kubectl-debug --copy-of example -c shell --image=debian -i -t
///
///   kubectl-debug --copy-of example -p example-copy -c example --command -- /bin/sh
#[derive(Parser, Debug)]
#[command(name = "kubectl-debug", version, verbatim_doc_comment)]
pub struct Cli {
    /// Name of the pod to base the debug pod on
    #[arg(long = "copy-of", value_name = "POD")]
    pub copy_of: String,

    /// Name of the pod to spawn [default: <copy-of>-debug]
    #[arg(short = 'p', long = "pod", value_name = "POD")]
    pub pod: Option<String>,

    /// Name of the container to patch or add [default: first container]
    #[arg(short = 'c', long)]
    pub container: Option<String>,

    /// Container image to use
    #[arg(long)]
    pub image: Option<String>,

    /// Keep stdin open on the container
    #[arg(short = 'i', long)]
    pub stdin: bool,

    /// Allocate a TTY for the container
    #[arg(short = 't', long)]
    pub tty: bool,

    /// Attach to the container after creating the pod [default: value of --stdin]
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub attach: Option<bool>,

    /// Treat the trailing tokens as the entry-point; a second `--` separates arguments
    #[arg(long)]
    pub command: bool,

    /// Schedule the copy on the same node as the source pod
    #[arg(long)]
    pub same_node: bool,

    /// Namespace of the source pod
    #[arg(short = 'n', long)]
    pub namespace: Option<String>,

    /// Print the derived pod instead of creating it
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub output: OutputFormat,

    /// Entry-point or argument tokens
    #[arg(last = true, value_name = "TOKENS")]
    pub tokens: Vec<String>,
}

impl Cli {
    pub fn to_request(&self) -> OverrideRequest {
        OverrideRequest {
            source: self.copy_of.clone(),
            destination: self.pod.clone(),
            container: self.container.clone(),
            image: self.image.clone(),
            stdin: self.stdin,
            tty: self.tty,
            attach: self.attach,
            same_node: self.same_node,
            dry_run: self.dry_run,
            ..OverrideRequest::default()
        }
        .with_entry_point(EntryPoint::from_tokens(self.tokens.clone(), self.command))
    }
}

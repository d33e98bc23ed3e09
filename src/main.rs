use clap::Parser;
use kube::{Client, ResourceExt};
use pod_debug::{
    cli::{Cli, OutputFormat},
    config::DebugConfig,
    resources::KubePodStore,
    session::{
        self,
        attach::{AttachStreams, KubeAttacher},
        Context, Outcome,
    },
    telemetry,
};
use std::{process::ExitCode, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    telemetry::init();

    let config = Arc::new(DebugConfig::load()?);
    info!("Configuration loaded");
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    let namespace =
        session::resolve_namespace(cli.namespace.as_deref(), &config, client.default_namespace());

    let ctx = Arc::new(Context {
        pods: Arc::new(KubePodStore::new(client.clone(), config.field_manager.clone())),
        attacher: Arc::new(KubeAttacher::new(client, config.pod_running_timeout())),
    });

    let request = cli.to_request();
    let outcome = session::run(&request, &namespace, ctx, AttachStreams::stdio()).await?;

    match outcome {
        Outcome::DryRun { pod } => {
            let rendered = match cli.output {
                OutputFormat::Yaml => serde_yaml::to_string(&pod)?,
                OutputFormat::Json => serde_json::to_string_pretty(&pod)?,
            };
            println!("{}", rendered);
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Created { pod } => {
            println!("pod/{} created", pod.name_any());
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Attached { pod, exit } => {
            eprintln!("Session ended, pod/{} is still running", pod.name_any());
            if exit.success() {
                Ok(ExitCode::SUCCESS)
            } else {
                if let Some(message) = exit.message {
                    eprintln!("{}", message);
                }
                Ok(ExitCode::FAILURE)
            }
        }
        Outcome::AttachFailed {
            pod,
            container,
            error,
        } => {
            let namespace = pod.namespace().unwrap_or_default();
            eprintln!("pod/{} created, but attach failed: {}", pod.name_any(), error);
            eprintln!(
                "Attach manually with: kubectl attach -n {} {} -c {} -i -t",
                namespace,
                pod.name_any(),
                container
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

//! Command line surface for site-sync.
//!
//! Each subcommand is one lifecycle hook; `hook <name>` lets the orchestrator fire
//! hooks by their own names. All work is delegated to [`lifecycle::dispatch`].
//!
//! [`lifecycle::dispatch`]: crate::lifecycle::dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::command::AwsCliRunner;
use crate::context::DeployContext;
use crate::lifecycle::{dispatch, LifecycleEvent, COMMANDS};
use crate::load_config::{load_config, Overrides};
use crate::provider::AwsCliProvider;

#[derive(Parser)]
#[clap(
    name = "site-sync",
    version,
    about = "Sync a static site to its S3 bucket and invalidate the CloudFront cache"
)]
pub struct Cli {
    /// Path to the service's deployment file
    #[clap(long, global = true, default_value = "serverless.yml")]
    pub config: PathBuf,

    /// Deployment stage (overrides provider.stage)
    #[clap(long, global = true, env = "SITE_SYNC_STAGE")]
    pub stage: Option<String>,

    /// AWS region (overrides provider.region)
    #[clap(long, global = true, env = "SITE_SYNC_REGION")]
    pub region: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploys the `s3LocalPath` directory to your bucket
    SyncToS3,
    /// Fetches and prints out the deployed bucket name
    BucketInfo,
    /// Fetches and prints out the deployed CloudFront domain name
    DomainInfo,
    /// Invalidates CloudFront cache
    InvalidateCloudFrontCache,
    /// Run the workflow bound to an orchestrator lifecycle hook
    Hook {
        /// Hook name, e.g. `aws:deploy:finalize:cleanup`
        event: LifecycleEvent,
    },
    /// List the commands exposed to the orchestrator
    Commands,
}

impl Commands {
    fn event(&self) -> Option<LifecycleEvent> {
        match self {
            Commands::SyncToS3 => Some(LifecycleEvent::SyncToS3),
            Commands::BucketInfo => Some(LifecycleEvent::BucketInfo),
            Commands::DomainInfo => Some(LifecycleEvent::DomainInfo),
            Commands::InvalidateCloudFrontCache => Some(LifecycleEvent::InvalidateCache),
            Commands::Hook { event } => Some(*event),
            Commands::Commands => None,
        }
    }
}

/// Async entrypoint shared by `main` and the integration tests.
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    let Some(event) = cli.command.event() else {
        for command in COMMANDS {
            println!(
                "{}\t{}\t[{}]",
                command.name,
                command.usage,
                command.lifecycle_events.join(", ")
            );
        }
        return Ok(());
    };

    let overrides = Overrides {
        stage: cli.stage,
        region: cli.region,
    };
    let settings = load_config(&cli.config, &overrides)?;

    let mut runner = AwsCliRunner::new(settings.aws_cli.clone());
    if let Some(timeout) = settings.command_timeout {
        runner = runner.with_timeout(timeout);
    }
    let provider = AwsCliProvider::new(runner.clone());
    let ctx = DeployContext::new(&provider, &runner, &settings);

    match dispatch(&ctx, event).await {
        Ok(outcome) => {
            if let Some(stderr) = outcome.failure() {
                tracing::error!(hook = %event, stderr, "Lifecycle hook command failed");
                anyhow::bail!("{event}: aws command failed: {stderr}");
            }
            tracing::info!(hook = %event, ?outcome, "Lifecycle hook complete");
            Ok(())
        }
        Err(e) => {
            tracing::error!(hook = %event, error = %e, "Lifecycle hook failed");
            Err(e.into())
        }
    }
}

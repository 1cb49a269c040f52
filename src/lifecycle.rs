//! Lifecycle hook routing.
//!
//! The orchestrator fires named hooks; each maps to exactly one workflow. The
//! dispatcher holds no state and makes no decisions beyond that table.

use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::context::DeployContext;
use crate::contract::{CloudProvider, CommandRunner};
use crate::error::DeployError;
use crate::info::{bucket_info, domain_info};
use crate::invalidate::{invalidate_cache, InvalidationOutcome};
use crate::synchronise::{deploy, empty_bucket, sync_directory, DeployReport, WorkflowOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Before the stack is torn down.
    BeforeRemove,
    /// After a deploy has finished.
    DeployFinalize,
    SyncToS3,
    BucketInfo,
    DomainInfo,
    InvalidateCache,
}

impl LifecycleEvent {
    pub const ALL: [LifecycleEvent; 6] = [
        LifecycleEvent::BeforeRemove,
        LifecycleEvent::DeployFinalize,
        LifecycleEvent::SyncToS3,
        LifecycleEvent::BucketInfo,
        LifecycleEvent::DomainInfo,
        LifecycleEvent::InvalidateCache,
    ];

    /// Hook name as the orchestrator spells it.
    pub fn hook(self) -> &'static str {
        match self {
            LifecycleEvent::BeforeRemove => "before:remove:remove",
            LifecycleEvent::DeployFinalize => "aws:deploy:finalize:cleanup",
            LifecycleEvent::SyncToS3 => "syncToS3:sync",
            LifecycleEvent::BucketInfo => "bucketInfo:bucketInfo",
            LifecycleEvent::DomainInfo => "domainInfo:domainInfo",
            LifecycleEvent::InvalidateCache => "invalidateCloudFrontCache:invalidateCache",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hook())
    }
}

impl FromStr for LifecycleEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LifecycleEvent::ALL
            .into_iter()
            .find(|event| event.hook() == s)
            .ok_or_else(|| format!("unknown lifecycle hook {s:?}"))
    }
}

/// A command exposed to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub lifecycle_events: &'static [&'static str],
}

pub const COMMANDS: [CommandSpec; 4] = [
    CommandSpec {
        name: "syncToS3",
        usage: "Deploys the `s3LocalPath` directory to your bucket",
        lifecycle_events: &["sync"],
    },
    CommandSpec {
        name: "bucketInfo",
        usage: "Fetches and prints out the deployed CloudFront bucket names",
        lifecycle_events: &["bucketInfo"],
    },
    CommandSpec {
        name: "domainInfo",
        usage: "Fetches and prints out the deployed CloudFront domain names",
        lifecycle_events: &["domainInfo"],
    },
    CommandSpec {
        name: "invalidateCloudFrontCache",
        usage: "Invalidates CloudFront cache",
        lifecycle_events: &["invalidateCache"],
    },
];

/// What a dispatched hook produced.
#[derive(Debug)]
pub enum HookOutcome {
    Emptied(WorkflowOutcome),
    Deployed(DeployReport),
    Synced(WorkflowOutcome),
    Bucket(Option<String>),
    Domain(Option<String>),
    Invalidated(InvalidationOutcome),
}

impl HookOutcome {
    /// The stderr of a bucket command that ran but was judged a failure.
    pub fn failure(&self) -> Option<&str> {
        let outcome = match self {
            HookOutcome::Emptied(outcome) | HookOutcome::Synced(outcome) => outcome,
            HookOutcome::Deployed(report) => &report.sync,
            _ => return None,
        };
        (!outcome.succeeded).then_some(outcome.result.stderr.trim())
    }
}

pub async fn dispatch<P, R>(
    ctx: &DeployContext<'_, P, R>,
    event: LifecycleEvent,
) -> Result<HookOutcome, DeployError>
where
    P: CloudProvider,
    R: CommandRunner,
{
    info!(hook = %event, stage = %ctx.settings.stage, "Dispatching lifecycle hook");
    let outcome = match event {
        LifecycleEvent::BeforeRemove => HookOutcome::Emptied(empty_bucket(ctx).await?),
        LifecycleEvent::DeployFinalize => HookOutcome::Deployed(deploy(ctx).await?),
        LifecycleEvent::SyncToS3 => HookOutcome::Synced(sync_directory(ctx).await?),
        LifecycleEvent::BucketInfo => HookOutcome::Bucket(bucket_info(ctx).await?),
        LifecycleEvent::DomainInfo => HookOutcome::Domain(domain_info(ctx).await?),
        LifecycleEvent::InvalidateCache => HookOutcome::Invalidated(invalidate_cache(ctx).await?),
    };
    Ok(outcome)
}

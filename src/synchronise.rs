//! Bucket workflows: mirror the local site into the bucket, empty it before
//! teardown, and the combined deploy (sync then cache invalidation).
//!
//! # Success convention
//! A command-level failure (judged by the configured
//! [`SuccessPolicy`](crate::command::SuccessPolicy)) is reported in the returned
//! [`WorkflowOutcome`], not as an error: the output is logged and the success line is
//! skipped. Errors are reserved for things that stop the workflow from running at all
//! (stack lookup, missing configuration, the tool failing to launch).
//!
//! Both sync and empty are destructive and have no dry-run mode.

use tracing::{error, info, warn};

use crate::command::display_args;
use crate::context::DeployContext;
use crate::contract::{CloudProvider, CommandResult, CommandRunner};
use crate::error::DeployError;
use crate::invalidate::{invalidate_cache, InvalidationOutcome};
use crate::resolve::require_output;

/// What a bucket command did.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowOutcome {
    pub bucket: String,
    pub args: Vec<String>,
    pub result: CommandResult,
    pub succeeded: bool,
}

/// Result of a deploy whose invalidation went through.
#[derive(Debug)]
pub struct DeployReport {
    pub sync: WorkflowOutcome,
    pub invalidation: InvalidationOutcome,
}

pub fn sync_args(local_path: &str, bucket: &str) -> Vec<String> {
    vec![
        "s3".to_string(),
        "sync".to_string(),
        local_path.to_string(),
        format!("s3://{bucket}/"),
        "--delete".to_string(),
    ]
}

pub fn empty_bucket_args(bucket: &str) -> Vec<String> {
    vec![
        "s3".to_string(),
        "rm".to_string(),
        format!("s3://{bucket}/"),
        "--recursive".to_string(),
    ]
}

/// Run `args`, logging the command and everything it printed.
pub(crate) async fn run_logged<R: CommandRunner>(
    runner: &R,
    args: &[String],
) -> Result<CommandResult, DeployError> {
    info!(command = %display_args(args), "Running aws command");
    let result = runner.run(args).await?;
    info!("{}", non_empty_or(&result.stdout, "stdout empty"));
    info!("{}", non_empty_or(&result.stderr, "stderr empty"));
    Ok(result)
}

fn non_empty_or<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

/// Mirror `custom.s3LocalPath` into the stack's bucket, deleting remote objects
/// that no longer exist locally.
pub async fn sync_directory<P, R>(ctx: &DeployContext<'_, P, R>) -> Result<WorkflowOutcome, DeployError>
where
    P: CloudProvider,
    R: CommandRunner,
{
    let bucket = require_output(ctx, &ctx.settings.bucket_output_key).await?;
    let local_path = ctx
        .settings
        .s3_local_path
        .as_ref()
        .ok_or(DeployError::MissingLocalPath)?;

    info!(bucket = %bucket, local_path = %local_path.display(), "[SYNC] Syncing directory to bucket");
    let args = sync_args(&local_path.to_string_lossy(), &bucket);
    let result = run_logged(ctx.runner, &args).await?;

    let succeeded = ctx.settings.success_policy.classify(&result);
    if succeeded {
        info!("Successfully synced to the S3 bucket");
    } else {
        error!(bucket = %bucket, "[SYNC][ERROR] Sync reported a failure");
    }
    Ok(WorkflowOutcome {
        bucket,
        args,
        result,
        succeeded,
    })
}

/// Delete every object in the stack's bucket so the bucket resource can be removed.
pub async fn empty_bucket<P, R>(ctx: &DeployContext<'_, P, R>) -> Result<WorkflowOutcome, DeployError>
where
    P: CloudProvider,
    R: CommandRunner,
{
    let bucket = require_output(ctx, &ctx.settings.bucket_output_key).await?;

    info!(bucket = %bucket, "[EMPTY] Removing all objects from bucket");
    let args = empty_bucket_args(&bucket);
    let result = run_logged(ctx.runner, &args).await?;

    let succeeded = ctx.settings.success_policy.classify(&result);
    if succeeded {
        info!("Successfully emptied the S3 bucket");
    } else {
        error!(bucket = %bucket, "[EMPTY][ERROR] Emptying the bucket reported a failure");
    }
    Ok(WorkflowOutcome {
        bucket,
        args,
        result,
        succeeded,
    })
}

/// Sync, then invalidate the CDN cache.
///
/// Invalidation runs whatever the sync outcome unless
/// `abort_deploy_on_sync_failure` is set. When sync errored but invalidation
/// succeeded, the sync error is still returned so the caller halts.
pub async fn deploy<P, R>(ctx: &DeployContext<'_, P, R>) -> Result<DeployReport, DeployError>
where
    P: CloudProvider,
    R: CommandRunner,
{
    let sync = sync_directory(ctx).await;

    if ctx.settings.abort_deploy_on_sync_failure {
        let outcome = sync?;
        if !outcome.succeeded {
            return Err(DeployError::SyncFailed {
                local_path: ctx.settings.s3_local_path.clone().unwrap_or_default(),
                bucket: outcome.bucket,
                stderr: outcome.result.stderr,
            });
        }
        let invalidation = invalidate_cache(ctx).await?;
        return Ok(DeployReport {
            sync: outcome,
            invalidation,
        });
    }

    if let Err(e) = &sync {
        warn!(error = %e, "[DEPLOY] Sync failed, invalidating the cache anyway");
    }
    let invalidation = invalidate_cache(ctx).await?;
    Ok(DeployReport {
        sync: sync?,
        invalidation,
    })
}

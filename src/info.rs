//! Read-only informational commands.

use tracing::info;

use crate::context::DeployContext;
use crate::contract::{CloudProvider, CommandRunner};
use crate::error::DeployError;
use crate::resolve::resolve_output;

const NOT_FOUND: &str = "Not Found";

pub fn bucket_line(bucket: Option<&str>) -> String {
    format!("Web App Bucket: {}", bucket.unwrap_or(NOT_FOUND))
}

pub fn domain_line(domain: Option<&str>) -> String {
    format!("Web App Domain: {}", domain.unwrap_or(NOT_FOUND))
}

/// Resolve the bucket name and log it. An absent output is shown as "Not Found".
pub async fn bucket_info<P, R>(ctx: &DeployContext<'_, P, R>) -> Result<Option<String>, DeployError>
where
    P: CloudProvider,
    R: CommandRunner,
{
    let bucket = resolve_output(ctx, &ctx.settings.bucket_output_key).await?;
    info!("{}", bucket_line(bucket.as_deref()));
    Ok(bucket)
}

/// Resolve the distribution domain and log it. Also the first step of invalidation.
pub async fn domain_info<P, R>(ctx: &DeployContext<'_, P, R>) -> Result<Option<String>, DeployError>
where
    P: CloudProvider,
    R: CommandRunner,
{
    let domain = resolve_output(ctx, &ctx.settings.domain_output_key).await?;
    info!("{}", domain_line(domain.as_deref()));
    Ok(domain)
}

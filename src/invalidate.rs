//! CloudFront cache invalidation.
//!
//! The distribution is found by matching the domain the stack exports against the
//! account's distribution listing. Only the first page of the listing is read, so
//! accounts with more distributions than one page holds may miss the match.

use tracing::{error, info};

use crate::context::DeployContext;
use crate::contract::{CloudProvider, CommandRunner, Distribution};
use crate::error::DeployError;
use crate::info::domain_info;
use crate::synchronise::run_logged;

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidationOutcome {
    pub domain: String,
    pub distribution_id: String,
    pub args: Vec<String>,
}

/// First distribution, in listing order, serving `domain`.
pub fn find_distribution<'a>(distributions: &'a [Distribution], domain: &str) -> Option<&'a Distribution> {
    distributions.iter().find(|entry| entry.domain_name == domain)
}

pub fn invalidation_args(distribution_id: &str) -> Vec<String> {
    vec![
        "cloudfront".to_string(),
        "create-invalidation".to_string(),
        "--distribution-id".to_string(),
        distribution_id.to_string(),
        "--paths".to_string(),
        "/*".to_string(),
    ]
}

/// Invalidate every path (`/*`) on the distribution serving the stack's domain.
pub async fn invalidate_cache<P, R>(
    ctx: &DeployContext<'_, P, R>,
) -> Result<InvalidationOutcome, DeployError>
where
    P: CloudProvider,
    R: CommandRunner,
{
    let settings = ctx.settings;
    let domain = domain_info(ctx)
        .await?
        .ok_or_else(|| DeployError::MissingOutput {
            stack_name: settings.stack_name.clone(),
            output_key: settings.domain_output_key.clone(),
        })?;

    let distributions = ctx
        .provider
        .list_distributions(&settings.stage, &settings.region)
        .await?;

    let Some(distribution) = find_distribution(&distributions, &domain) else {
        let err = DeployError::DistributionNotFound { domain };
        error!("{err}");
        return Err(err);
    };

    info!(
        "Invalidating CloudFront distribution with id: {}",
        distribution.id
    );
    let args = invalidation_args(&distribution.id);
    let result = run_logged(ctx.runner, &args).await?;

    if !settings.success_policy.classify(&result) {
        return Err(DeployError::InvalidationFailed {
            distribution_id: distribution.id.clone(),
            stderr: result.stderr.trim().to_string(),
        });
    }

    info!("Successfully invalidated CloudFront cache");
    Ok(InvalidationOutcome {
        domain,
        distribution_id: distribution.id.clone(),
        args,
    })
}

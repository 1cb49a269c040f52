//! Stack output resolution.
//!
//! Every call describes the stack afresh; nothing is cached between calls.

use tracing::{error, info};

use crate::context::DeployContext;
use crate::contract::{CloudProvider, CommandRunner, StackOutput};
use crate::error::DeployError;

/// First output whose key equals `output_key`.
pub fn find_output<'a>(outputs: &'a [StackOutput], output_key: &str) -> Option<&'a str> {
    outputs
        .iter()
        .find(|entry| entry.output_key == output_key)
        .map(|entry| entry.output_value.as_str())
}

/// Look up `output_key` on the current stage's stack.
///
/// `Ok(None)` means the stack exists but does not export that key.
pub async fn resolve_output<P, R>(
    ctx: &DeployContext<'_, P, R>,
    output_key: &str,
) -> Result<Option<String>, DeployError>
where
    P: CloudProvider,
    R: CommandRunner,
{
    let settings = ctx.settings;
    let outputs = ctx
        .provider
        .describe_stack_outputs(&settings.stack_name, &settings.stage, &settings.region)
        .await
        .map_err(|e| {
            error!(stack_name = %settings.stack_name, error = %e, "Failed to describe stack");
            e
        })?;

    let value = find_output(&outputs, output_key).map(str::to_owned);
    info!(
        stack_name = %settings.stack_name,
        output_key,
        found = value.is_some(),
        "Resolved stack output"
    );
    Ok(value)
}

/// Like [`resolve_output`], but an absent key is a configuration error.
pub async fn require_output<P, R>(
    ctx: &DeployContext<'_, P, R>,
    output_key: &str,
) -> Result<String, DeployError>
where
    P: CloudProvider,
    R: CommandRunner,
{
    resolve_output(ctx, output_key)
        .await?
        .ok_or_else(|| DeployError::MissingOutput {
            stack_name: ctx.settings.stack_name.clone(),
            output_key: output_key.to_string(),
        })
}

//! Error taxonomy for the deploy workflows.
//!
//! Every failure a workflow can hit is a distinct variant so callers (the CLI, the
//! lifecycle dispatcher, tests) can match on it instead of parsing messages.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The provider request itself failed (credentials, network, throttling).
    #[error("{operation} request failed: {message}")]
    Provider {
        operation: &'static str,
        message: String,
    },

    #[error("stack {stack_name} does not exist")]
    StackNotFound { stack_name: String },

    /// An output an action command needs is not exported by the stack.
    #[error("stack {stack_name} has no output named {output_key}; check the stack's Outputs section")]
    MissingOutput {
        stack_name: String,
        output_key: String,
    },

    #[error("custom.s3LocalPath is not set in the deployment configuration")]
    MissingLocalPath,

    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not finish within {limit:?}")]
    Timeout {
        program: String,
        limit: std::time::Duration,
    },

    #[error("could not decode {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not find distribution with domain {domain}")]
    DistributionNotFound { domain: String },

    #[error("Failed invalidating CloudFront cache for distribution {distribution_id}: {stderr}")]
    InvalidationFailed {
        distribution_id: String,
        stderr: String,
    },

    #[error("sync of {local_path} to s3://{bucket}/ failed: {stderr}")]
    SyncFailed {
        local_path: PathBuf,
        bucket: String,
        stderr: String,
    },
}

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::command::SuccessPolicy;

pub const DEFAULT_STAGE: &str = "dev";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_BUCKET_OUTPUT_KEY: &str = "WebAppS3BucketOutput";
pub const DEFAULT_DOMAIN_OUTPUT_KEY: &str = "WebAppCloudFrontDistributionOutput";
pub const DEFAULT_AWS_CLI: &str = "aws";

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploySettings {
    pub service: String,
    pub stage: String,
    pub region: String,
    pub stack_name: String,
    /// Local directory mirrored into the bucket. Only sync and deploy need it.
    pub s3_local_path: Option<PathBuf>,
    pub bucket_output_key: String,
    pub domain_output_key: String,
    pub aws_cli: String,
    pub command_timeout: Option<Duration>,
    pub success_policy: SuccessPolicy,
    pub abort_deploy_on_sync_failure: bool,
}

impl DeploySettings {
    /// Settings with every optional field at its default.
    pub fn new(service: impl Into<String>, stage: impl Into<String>, region: impl Into<String>) -> Self {
        let service = service.into();
        let stage = stage.into();
        Self {
            stack_name: stack_name_for(&service, &stage),
            service,
            stage,
            region: region.into(),
            s3_local_path: None,
            bucket_output_key: DEFAULT_BUCKET_OUTPUT_KEY.to_string(),
            domain_output_key: DEFAULT_DOMAIN_OUTPUT_KEY.to_string(),
            aws_cli: DEFAULT_AWS_CLI.to_string(),
            command_timeout: None,
            success_policy: SuccessPolicy::default(),
            abort_deploy_on_sync_failure: false,
        }
    }

    pub fn with_local_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.s3_local_path = Some(path.into());
        self
    }

    pub fn trace_loaded(&self) {
        info!(
            service = %self.service,
            stage = %self.stage,
            region = %self.region,
            stack_name = %self.stack_name,
            s3_local_path = ?self.s3_local_path,
            success_policy = ?self.success_policy,
            "Loaded deploy settings"
        );
        debug!(?self, "Deploy settings loaded (full debug)");
    }
}

/// Default stack naming convention: `<service>-<stage>`.
pub fn stack_name_for(service: &str, stage: &str) -> String {
    format!("{service}-{stage}")
}

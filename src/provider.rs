//! [`CloudProvider`] backed by the AWS command line tool.
//!
//! Stack outputs and distributions are fetched with `--output json` through the same
//! [`CommandRunner`] used for the sync/invalidation commands, and decoded here.
//! Unlike the workflow commands, these queries are judged by exit status: a query
//! that exits 0 produced JSON on stdout whatever else it printed.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info};

use crate::contract::{CloudProvider, CommandResult, CommandRunner, Distribution, StackOutput};
use crate::error::DeployError;

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeStacksResponse {
    #[serde(default)]
    stacks: Vec<StackDescription>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StackDescription {
    #[serde(default)]
    outputs: Vec<StackOutput>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListDistributionsResponse {
    #[serde(default)]
    distribution_list: Option<DistributionList>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DistributionList {
    #[serde(default)]
    items: Vec<Distribution>,
}

pub struct AwsCliProvider<R> {
    runner: R,
}

impl<R: CommandRunner> AwsCliProvider<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    async fn query(
        &self,
        operation: &'static str,
        args: Vec<String>,
    ) -> Result<CommandResult, DeployError> {
        let result = self.runner.run(&args).await?;
        if result.exit_code != Some(0) {
            error!(operation, stderr = %result.stderr.trim_end(), "Provider request failed");
            return Err(DeployError::Provider {
                operation,
                message: result.stderr.trim().to_string(),
            });
        }
        Ok(result)
    }
}

#[async_trait]
impl<R: CommandRunner> CloudProvider for AwsCliProvider<R> {
    async fn describe_stack_outputs(
        &self,
        stack_name: &str,
        stage: &str,
        region: &str,
    ) -> Result<Vec<StackOutput>, DeployError> {
        info!(stack_name, stage, region, "Describing stack");
        let args = vec![
            "cloudformation".to_string(),
            "describe-stacks".to_string(),
            "--stack-name".to_string(),
            stack_name.to_string(),
            "--region".to_string(),
            region.to_string(),
            "--output".to_string(),
            "json".to_string(),
        ];
        let result = match self.query("CloudFormation.describeStacks", args).await {
            Err(DeployError::Provider { message, .. }) if message.contains("does not exist") => {
                return Err(DeployError::StackNotFound {
                    stack_name: stack_name.to_string(),
                });
            }
            other => other?,
        };

        let response: DescribeStacksResponse =
            serde_json::from_str(&result.stdout).map_err(|source| DeployError::Decode {
                operation: "CloudFormation.describeStacks",
                source,
            })?;

        response
            .stacks
            .into_iter()
            .next()
            .map(|stack| stack.outputs)
            .ok_or_else(|| DeployError::StackNotFound {
                stack_name: stack_name.to_string(),
            })
    }

    async fn list_distributions(
        &self,
        stage: &str,
        region: &str,
    ) -> Result<Vec<Distribution>, DeployError> {
        info!(stage, region, "Listing CloudFront distributions");
        // A single page: no --starting-token handling.
        let args = vec![
            "cloudfront".to_string(),
            "list-distributions".to_string(),
            "--no-paginate".to_string(),
            "--region".to_string(),
            region.to_string(),
            "--output".to_string(),
            "json".to_string(),
        ];
        let result = self.query("CloudFront.listDistributions", args).await?;
        let response: ListDistributionsResponse =
            serde_json::from_str(&result.stdout).map_err(|source| DeployError::Decode {
                operation: "CloudFront.listDistributions",
                source,
            })?;
        Ok(response
            .distribution_list
            .map(|list| list.items)
            .unwrap_or_default())
    }
}

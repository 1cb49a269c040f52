//! # contract: data model and external seams
//!
//! The deploy workflows talk to exactly two collaborators:
//! - a [`CloudProvider`] that answers "what does stack X export" and "which CDN
//!   distributions exist", and
//! - a [`CommandRunner`] that executes the storage/CDN command line tool.
//!
//! Both are async traits annotated for `mockall`, so workflows can be exercised
//! end-to-end in tests without an AWS account. Generated mocks (`MockCloudProvider`,
//! `MockCommandRunner`) are exported under the `test-export-mocks` feature.

use async_trait::async_trait;
use serde::Deserialize;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::DeployError;

/// A key/value pair exported by a deployed stack.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackOutput {
    pub output_key: String,
    pub output_value: String,
}

impl StackOutput {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            output_key: key.into(),
            output_value: value.into(),
        }
    }
}

/// A CDN distribution as returned by the distribution listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Distribution {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "DomainName")]
    pub domain_name: String,
}

impl Distribution {
    pub fn new(id: impl Into<String>, domain_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            domain_name: domain_name.into(),
        }
    }
}

/// Captured outcome of one external command invocation.
///
/// Whether it counts as a success is decided by a
/// [`SuccessPolicy`](crate::command::SuccessPolicy), not by this type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CommandResult {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }
}

/// Read-only view of the orchestrator's cloud provider.
///
/// One request per call: no retries, no caching.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait CloudProvider: Send + Sync {
    /// Fetch the outputs of `stack_name`. Fails with [`DeployError::StackNotFound`]
    /// when the stack does not exist.
    async fn describe_stack_outputs(
        &self,
        stack_name: &str,
        stage: &str,
        region: &str,
    ) -> Result<Vec<StackOutput>, DeployError>;

    /// List the distributions visible to the account. Only the first page is read.
    async fn list_distributions(
        &self,
        stage: &str,
        region: &str,
    ) -> Result<Vec<Distribution>, DeployError>;
}

/// Executes the storage/CDN command line tool.
///
/// Implementors must not turn a non-zero exit code into an error; classification is
/// the caller's job.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, args: &[String]) -> Result<CommandResult, DeployError>;
}

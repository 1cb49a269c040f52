//! `load_config`: reads the service's deployment file and resolves it into [`DeploySettings`].
//!
//! The file is the orchestrator's service definition (`serverless.yml` by default).
//! Only the keys this tool needs are read; everything else is ignored.
//!
//! # Precedence
//! Explicit overrides (CLI flags, which clap also fills from `SITE_SYNC_STAGE` /
//! `SITE_SYNC_REGION`) win over `provider.stage` / `provider.region`, which win over
//! the built-in defaults.
//!
//! A relative `custom.s3LocalPath` is anchored to the directory holding the file.
//!
//! # Errors
//! All failures are `anyhow` errors mentioning the offending file or key.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};

use crate::command::SuccessPolicy;
use crate::config::{
    stack_name_for, DeploySettings, DEFAULT_AWS_CLI, DEFAULT_BUCKET_OUTPUT_KEY,
    DEFAULT_DOMAIN_OUTPUT_KEY, DEFAULT_REGION, DEFAULT_STAGE,
};

#[derive(Debug, Deserialize)]
struct ServiceFile {
    service: ServiceName,
    #[serde(default)]
    provider: ProviderSection,
    #[serde(default)]
    custom: CustomSection,
}

/// `service: my-site` or `service: { name: my-site }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ServiceName {
    Plain(String),
    Table { name: String },
}

impl ServiceName {
    fn into_name(self) -> String {
        match self {
            ServiceName::Plain(name) | ServiceName::Table { name } => name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderSection {
    stage: Option<String>,
    region: Option<String>,
    stack_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomSection {
    s3_local_path: Option<PathBuf>,
    bucket_output_key: Option<String>,
    domain_output_key: Option<String>,
    aws_cli: Option<String>,
    command_timeout_secs: Option<u64>,
    success_policy: Option<String>,
    #[serde(default)]
    abort_deploy_on_sync_failure: bool,
}

/// Values that take precedence over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub stage: Option<String>,
    pub region: Option<String>,
}

pub fn load_config<P: AsRef<Path>>(path: P, overrides: &Overrides) -> Result<DeploySettings> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading deployment configuration");

    let content = fs::read_to_string(path_ref).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
        anyhow::anyhow!("Failed to read config file {:?}: {}", path_ref, e)
    })?;

    let settings = parse_config(&content)
        .with_context(|| format!("Invalid deployment configuration in {}", path_ref.display()))?;
    let mut settings = apply_overrides(settings, overrides);

    // Relative paths are relative to the service file, not the caller's cwd.
    let service_dir = path_ref.parent().unwrap_or_else(|| Path::new(""));
    settings.s3_local_path = settings.s3_local_path.take().map(|local_path| {
        if local_path.is_relative() {
            service_dir.join(local_path)
        } else {
            local_path
        }
    });

    settings.trace_loaded();
    Ok(settings)
}

/// Parse a service file's contents. Stage and region fall back to the defaults.
pub fn parse_config(content: &str) -> Result<DeploySettings> {
    let raw: ServiceFile = serde_yaml::from_str(content).map_err(|e| {
        error!(error = ?e, "Failed to parse config YAML");
        anyhow::anyhow!("Failed to parse config YAML: {e}")
    })?;

    let service = raw.service.into_name();
    if service.trim().is_empty() {
        anyhow::bail!("`service` must not be empty");
    }

    let success_policy = match raw.custom.success_policy.as_deref() {
        Some(name) => name
            .parse::<SuccessPolicy>()
            .map_err(|e| anyhow::anyhow!("custom.successPolicy: {e}"))?,
        None => SuccessPolicy::default(),
    };

    if let Some(path) = &raw.custom.s3_local_path {
        if path.as_os_str().is_empty() {
            anyhow::bail!("custom.s3LocalPath must not be empty");
        }
    }

    let stage = raw.provider.stage.unwrap_or_else(|| DEFAULT_STAGE.to_string());
    Ok(DeploySettings {
        stack_name: raw
            .provider
            .stack_name
            .unwrap_or_else(|| stack_name_for(&service, &stage)),
        service,
        stage,
        region: raw.provider.region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
        s3_local_path: raw.custom.s3_local_path,
        bucket_output_key: raw
            .custom
            .bucket_output_key
            .unwrap_or_else(|| DEFAULT_BUCKET_OUTPUT_KEY.to_string()),
        domain_output_key: raw
            .custom
            .domain_output_key
            .unwrap_or_else(|| DEFAULT_DOMAIN_OUTPUT_KEY.to_string()),
        aws_cli: raw.custom.aws_cli.unwrap_or_else(|| DEFAULT_AWS_CLI.to_string()),
        command_timeout: raw.custom.command_timeout_secs.map(Duration::from_secs),
        success_policy,
        abort_deploy_on_sync_failure: raw.custom.abort_deploy_on_sync_failure,
    })
}

fn apply_overrides(mut settings: DeploySettings, overrides: &Overrides) -> DeploySettings {
    if let Some(stage) = &overrides.stage {
        // Only a derived stack name follows the stage; an explicit one is kept.
        if settings.stack_name == stack_name_for(&settings.service, &settings.stage) {
            settings.stack_name = stack_name_for(&settings.service, stage);
        }
        settings.stage = stage.clone();
    }
    if let Some(region) = &overrides.region {
        settings.region = region.clone();
    }
    settings
}

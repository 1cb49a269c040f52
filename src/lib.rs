#![doc = "site-sync: deploy a static site directory to S3 and invalidate its CloudFront cache."]

//! Workflows take an explicit [`context::DeployContext`] holding the cloud provider,
//! the command runner and the resolved settings. The provider and runner are traits
//! (see [`contract`]) so every workflow can run against mocks.

pub mod cli;
pub mod command;
pub mod config;
pub mod context;
pub mod contract;
pub mod error;
pub mod info;
pub mod invalidate;
pub mod lifecycle;
pub mod load_config;
pub mod provider;
pub mod resolve;
pub mod synchronise;

pub use cli::{run, Cli, Commands};
pub use error::DeployError;

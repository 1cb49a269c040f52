//! The explicit context every workflow receives.

use crate::config::DeploySettings;
use crate::contract::{CloudProvider, CommandRunner};

/// Provider, runner and settings for one invocation, borrowed for its duration.
pub struct DeployContext<'a, P, R> {
    pub provider: &'a P,
    pub runner: &'a R,
    pub settings: &'a DeploySettings,
}

impl<'a, P, R> DeployContext<'a, P, R>
where
    P: CloudProvider,
    R: CommandRunner,
{
    pub fn new(provider: &'a P, runner: &'a R, settings: &'a DeploySettings) -> Self {
        Self {
            provider,
            runner,
            settings,
        }
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use pat_config::RestConfig;
use pat_core::{
    Transport,
    scenario::{DynError, RunContext, Workload as ScenarioWorkload},
};

use super::RestStep;
use crate::rest::{AppPackage, PackageError, RestContext};

/// Runs the configured REST steps once per scenario run, each run on a
/// fresh [`RestContext`].
#[derive(Clone)]
pub struct Workload<T> {
    transport: T,
    config: Arc<RestConfig>,
    package: AppPackage,
    steps: Vec<RestStep>,
}

impl<T> Workload<T>
where
    T: Transport + Clone + 'static,
{
    #[must_use]
    pub fn new(transport: T, config: RestConfig, package: AppPackage, steps: Vec<RestStep>) -> Self {
        Self {
            transport,
            config: Arc::new(config),
            package,
            steps,
        }
    }

    /// Like [`Workload::new`], loading the package named by the config.
    pub fn from_config(
        transport: T,
        config: RestConfig,
        steps: Vec<RestStep>,
    ) -> Result<Self, PackageError> {
        let package = AppPackage::from_config(&config)?;
        Ok(Self::new(transport, config, package, steps))
    }

    #[must_use]
    pub fn steps(&self) -> &[RestStep] {
        &self.steps
    }

    #[must_use]
    pub fn config(&self) -> &RestConfig {
        &self.config
    }
}

#[async_trait]
impl<T> ScenarioWorkload for Workload<T>
where
    T: Transport + Clone + 'static,
{
    fn name(&self) -> &str {
        "rest"
    }

    async fn run(&self, ctx: &mut RunContext) -> Result<(), DynError> {
        let mut rest = RestContext::new(
            self.transport.clone(),
            Arc::clone(&self.config),
            self.package.clone(),
        );

        for step in &self.steps {
            match step {
                RestStep::Target => {
                    ctx.time_step(step.name(), rest.target(&self.config.target))
                        .await?;
                }
                RestStep::Login => {
                    ctx.time_step(step.name(), rest.login()).await?;
                }
                RestStep::Push => {
                    ctx.time_step(step.name(), rest.push()).await?;
                }
            }
        }

        tracing::debug!(run = ctx.index(), steps = self.steps.len(), "rest run complete");
        Ok(())
    }
}

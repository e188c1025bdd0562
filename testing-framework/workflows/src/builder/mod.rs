use pat_config::RestConfig;
use pat_core::{Transport, scenario::Builder as CoreScenarioBuilder};

use crate::{
    rest::{AppPackage, PackageError},
    workloads::rest::{self, RestStep},
};

#[derive(Debug, thiserror::Error)]
pub enum BuilderInputError {
    #[error("{field} must be non-zero")]
    ZeroValue { field: &'static str },
    #[error("rest workload needs at least one step")]
    NoSteps,
    #[error(transparent)]
    Package(#[from] PackageError),
}

/// Extension methods for attaching the REST workflow to a scenario.
pub trait ScenarioBuilderExt: Sized {
    /// Configure a REST workload.
    fn rest<T>(self, transport: T, config: RestConfig) -> RestFlowBuilder<T>
    where
        T: Transport + Clone + 'static;

    /// Configure a REST workload via closure.
    fn rest_with<T>(
        self,
        transport: T,
        config: RestConfig,
        f: impl FnOnce(RestFlowBuilder<T>) -> RestFlowBuilder<T>,
    ) -> Result<CoreScenarioBuilder, BuilderInputError>
    where
        T: Transport + Clone + 'static;
}

impl ScenarioBuilderExt for CoreScenarioBuilder {
    fn rest<T>(self, transport: T, config: RestConfig) -> RestFlowBuilder<T>
    where
        T: Transport + Clone + 'static,
    {
        RestFlowBuilder::new(self, transport, config)
    }

    fn rest_with<T>(
        self,
        transport: T,
        config: RestConfig,
        f: impl FnOnce(RestFlowBuilder<T>) -> RestFlowBuilder<T>,
    ) -> Result<CoreScenarioBuilder, BuilderInputError>
    where
        T: Transport + Clone + 'static,
    {
        f(self.rest(transport, config)).apply()
    }
}

/// Builder for REST workloads.
pub struct RestFlowBuilder<T> {
    builder: CoreScenarioBuilder,
    transport: T,
    config: RestConfig,
    steps: Vec<RestStep>,
    package: Option<AppPackage>,
    copies: usize,
}

impl<T> RestFlowBuilder<T>
where
    T: Transport + Clone + 'static,
{
    fn new(builder: CoreScenarioBuilder, transport: T, config: RestConfig) -> Self {
        Self {
            builder,
            transport,
            config,
            steps: RestStep::ALL.to_vec(),
            package: None,
            copies: 1,
        }
    }

    #[must_use]
    /// Steps executed by every run, in order. Defaults to target, login, push.
    pub fn steps(mut self, steps: impl IntoIterator<Item = RestStep>) -> Self {
        self.steps = steps.into_iter().collect();
        self
    }

    #[must_use]
    /// Upload this package instead of the one named by the config.
    pub fn package(mut self, package: AppPackage) -> Self {
        self.package = Some(package);
        self
    }

    #[must_use]
    /// Attach several identical workloads (ignores zero).
    pub fn copies(mut self, copies: usize) -> Self {
        if copies == 0 {
            tracing::warn!("rest workload copies must be non-zero; keeping previous value");
        } else {
            self.copies = copies;
        }
        self
    }

    /// Like `copies`, but returns an error instead of ignoring zero.
    pub fn try_copies(mut self, copies: usize) -> Result<Self, BuilderInputError> {
        if copies == 0 {
            return Err(BuilderInputError::ZeroValue {
                field: "rest_copies",
            });
        }
        self.copies = copies;
        Ok(self)
    }

    /// Attach the REST workload to the scenario.
    pub fn apply(self) -> Result<CoreScenarioBuilder, BuilderInputError> {
        if self.steps.is_empty() {
            return Err(BuilderInputError::NoSteps);
        }
        let package = match self.package {
            Some(package) => package,
            None => AppPackage::from_config(&self.config)?,
        };

        tracing::info!(
            api = %self.config.target,
            space = %self.config.space,
            steps = ?self.steps.iter().map(|s| s.name()).collect::<Vec<_>>(),
            copies = self.copies,
            "attaching rest workload"
        );

        let workload = rest::Workload::new(self.transport, self.config, package, self.steps);
        let mut builder = self.builder;
        for _ in 0..self.copies {
            builder = builder.with_workload(workload.clone());
        }
        Ok(builder)
    }
}

//! Sequential chain composition and execution

use async_trait::async_trait;
use research_core::{Chain, ChainValues, Error, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Receives progress notifications while a sequential chain runs
pub trait ChainObserver: Send + Sync {
    /// A step is about to run
    fn step_started(&self, _name: &str) {}

    /// A step finished successfully; `values` already holds its outputs
    fn step_finished(&self, _name: &str, _elapsed: Duration, _values: &ChainValues) {}
}

/// Chains that run one after another over a shared value store
///
/// Each step can read the initial input variables and anything an earlier
/// step produced. Key wiring is checked once, when the chain is built.
///
/// # Example
///
/// ```no_run
/// use research_chain::{LlmChain, SequentialChain};
/// use research_core::ChainValues;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # async fn example(fundamental: LlmChain, technical: LlmChain) -> research_core::Result<()> {
/// let pipeline = SequentialChain::builder("institutional")
///     .input_variables(["ticker", "info", "valuation_metrics"])
///     .step(Arc::new(fundamental))
///     .step(Arc::new(technical))
///     .output_variables(["fundamental_analysis", "technical_analysis"])
///     .build()?;
///
/// let outputs = pipeline
///     .run(ChainValues::new().with("ticker", json!("TSLA")), None)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct SequentialChain {
    name: String,
    steps: Vec<Arc<dyn Chain>>,
    input_variables: Vec<String>,
    output_variables: Vec<String>,
}

impl SequentialChain {
    /// Create a new sequential chain builder
    pub fn builder(name: impl Into<String>) -> SequentialChainBuilder {
        SequentialChainBuilder::new(name)
    }

    /// Names of the steps, in execution order
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Run every step and return only the declared output variables
    pub async fn run(
        &self,
        mut values: ChainValues,
        observer: Option<&dyn ChainObserver>,
    ) -> Result<ChainValues> {
        self.execute(&mut values, observer).await?;
        values.retain_keys(&self.output_variables);
        Ok(values)
    }

    async fn execute(
        &self,
        values: &mut ChainValues,
        observer: Option<&dyn ChainObserver>,
    ) -> Result<()> {
        if let Some(missing) = self
            .input_variables
            .iter()
            .find(|key| !values.contains_key(key))
        {
            return Err(Error::MissingVariable(missing.clone()));
        }

        for step in &self.steps {
            if let Some(observer) = observer {
                observer.step_started(step.name());
            }

            debug!(chain = %self.name, step = step.name(), "Running step");
            let started = Instant::now();
            step.call(values).await?;
            let elapsed = started.elapsed();
            info!(
                chain = %self.name,
                step = step.name(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Step finished"
            );

            if let Some(observer) = observer {
                observer.step_finished(step.name(), elapsed, values);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Chain for SequentialChain {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_keys(&self) -> Vec<String> {
        self.input_variables.clone()
    }

    fn output_keys(&self) -> Vec<String> {
        self.output_variables.clone()
    }

    async fn call(&self, values: &mut ChainValues) -> Result<()> {
        self.execute(values, None).await
    }
}

/// Builder for constructing sequential chains
pub struct SequentialChainBuilder {
    name: String,
    steps: Vec<Arc<dyn Chain>>,
    input_variables: Vec<String>,
    output_variables: Option<Vec<String>>,
}

impl SequentialChainBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            input_variables: Vec::new(),
            output_variables: None,
        }
    }

    /// Variables the caller provides before the first step
    pub fn input_variables<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_variables = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Append a step
    pub fn step(mut self, chain: Arc<dyn Chain>) -> Self {
        self.steps.push(chain);
        self
    }

    /// Variables returned by `run` (defaults to the last step's outputs)
    pub fn output_variables<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_variables = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Validate key wiring and build the chain
    pub fn build(self) -> Result<SequentialChain> {
        if self.steps.is_empty() {
            return Err(Error::InitializationFailed(format!(
                "{} has no steps",
                self.name
            )));
        }

        let mut available = self.input_variables.clone();
        for step in &self.steps {
            if let Some(missing) = step
                .input_keys()
                .into_iter()
                .find(|key| !available.contains(key))
            {
                return Err(Error::InitializationFailed(format!(
                    "step '{}' needs '{missing}', which is neither an input nor produced by an earlier step",
                    step.name()
                )));
            }
            available.extend(step.output_keys());
        }

        let output_variables = match self.output_variables {
            Some(keys) => keys,
            None => self
                .steps
                .last()
                .map(|step| step.output_keys())
                .unwrap_or_default(),
        };

        if let Some(unknown) = output_variables.iter().find(|key| !available.contains(key)) {
            return Err(Error::InitializationFailed(format!(
                "output '{unknown}' is never produced"
            )));
        }

        Ok(SequentialChain {
            name: self.name,
            steps: self.steps,
            input_variables: self.input_variables,
            output_variables,
        })
    }
}

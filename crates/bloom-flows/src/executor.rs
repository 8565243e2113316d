//! The flow executor.
//!
//! Each invocation walks a fresh, linear phase machine:
//! `Validating → Rendering → Invoking → ParsingOutput → Succeeded | Failed`.
//! Nothing is shared between invocations beyond the read-only registry and
//! the backend handle, so concurrent calls are fully independent. There is no
//! retry, no caching, no deduplication, and no partial result: a call either
//! yields a reply that satisfies the output schema, or an error naming the
//! phase that failed.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use bloom_types::{
    BloomDetection, BloomForecast, BloomQuery, BLOOM_DETECTION_FLOW, BLOOM_FORECAST_FLOW,
};

use crate::backend::GenerativeBackend;
use crate::error::{FlowError, FlowResult};
use crate::registry::FlowRegistry;

/// Phase of a single flow invocation, used for log attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    /// Nothing started yet.
    Idle,
    /// Checking input against the flow's input schema.
    Validating,
    /// Substituting validated input into the prompt template.
    Rendering,
    /// Waiting on the generative backend. Single attempt, no cancellation.
    Invoking,
    /// Checking the raw reply against the output schema.
    ParsingOutput,
    /// Terminal: a conforming output was returned.
    Succeeded,
    /// Terminal: the invocation produced an error.
    Failed,
}

impl FlowPhase {
    /// String form for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowPhase::Idle => "idle",
            FlowPhase::Validating => "validating",
            FlowPhase::Rendering => "rendering",
            FlowPhase::Invoking => "invoking",
            FlowPhase::ParsingOutput => "parsing_output",
            FlowPhase::Succeeded => "succeeded",
            FlowPhase::Failed => "failed",
        }
    }
}

/// Drives flow invocations against a generative backend.
///
/// Holds only immutable configuration; safe to share behind an `Arc` across
/// concurrent callers.
pub struct FlowExecutor {
    registry: FlowRegistry,
    backend: Arc<dyn GenerativeBackend>,
}

impl FlowExecutor {
    /// Create an executor over a registry and a backend.
    pub fn new(registry: FlowRegistry, backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { registry, backend }
    }

    /// Executor over the built-in flows.
    pub fn builtin(backend: Arc<dyn GenerativeBackend>) -> FlowResult<Self> {
        Ok(Self::new(FlowRegistry::builtin()?, backend))
    }

    /// The registry this executor serves.
    pub fn registry(&self) -> &FlowRegistry {
        &self.registry
    }

    /// Invoke a flow by name with an untyped input value.
    ///
    /// The returned value contains exactly the fields the flow's output
    /// schema declares; anything extra the model produced is dropped.
    #[instrument(skip(self, input), name = "flow.invoke", fields(flow = %flow_name))]
    pub async fn invoke_flow(&self, flow_name: &str, input: &Value) -> FlowResult<Value> {
        let flow = self
            .registry
            .get(flow_name)
            .ok_or_else(|| FlowError::UnknownFlow(flow_name.to_string()))?;

        let mut phase = FlowPhase::Validating;
        debug!(phase = phase.as_str(), "checking input schema");
        if let Err(violations) = flow.input_schema.validate(input) {
            warn!(
                phase = FlowPhase::Failed.as_str(),
                %violations,
                "rejected before reaching the backend"
            );
            return Err(FlowError::Validation(violations));
        }

        phase = FlowPhase::Rendering;
        debug!(phase = phase.as_str(), "rendering prompt");
        let prompt = self.registry.render(flow_name, input)?;

        phase = FlowPhase::Invoking;
        debug!(
            phase = phase.as_str(),
            prompt_bytes = prompt.len(),
            "invoking generative backend"
        );
        let raw_reply = match self
            .backend
            .generate(&prompt, &flow.output_schema.descriptor())
            .await
        {
            Ok(reply) => reply,
            Err(cause) => {
                warn!(
                    phase = FlowPhase::Failed.as_str(),
                    error = %cause,
                    "generative backend failed"
                );
                return Err(FlowError::backend(cause));
            }
        };

        phase = FlowPhase::ParsingOutput;
        debug!(phase = phase.as_str(), "checking reply against output schema");
        if let Err(violations) = flow.output_schema.validate(&raw_reply) {
            warn!(
                phase = FlowPhase::Failed.as_str(),
                %violations,
                "backend reply does not satisfy the output schema"
            );
            return Err(FlowError::OutputValidation(violations));
        }

        info!(phase = FlowPhase::Succeeded.as_str(), "flow completed");
        Ok(flow.output_schema.project(&raw_reply))
    }

    /// Run the `bloom-detection` flow with a typed query.
    pub async fn detect_and_monitor_blooms(&self, query: &BloomQuery) -> FlowResult<BloomDetection> {
        let input = serde_json::to_value(query)?;
        let output = self.invoke_flow(BLOOM_DETECTION_FLOW, &input).await?;
        Ok(serde_json::from_value(output)?)
    }

    /// Run the `bloom-forecast` flow with a typed query.
    pub async fn generate_bloom_forecast(&self, query: &BloomQuery) -> FlowResult<BloomForecast> {
        let input = serde_json::to_value(query)?;
        let output = self.invoke_flow(BLOOM_FORECAST_FLOW, &input).await?;
        Ok(serde_json::from_value(output)?)
    }
}

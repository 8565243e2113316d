//! Flow definitions and the process-wide registry.
//!
//! A [`FlowDefinition`] pairs an input schema, an output schema, and a prompt
//! template under a unique name. Definitions are immutable: the registry is
//! built once at process start and shared read-only across all invocations.
//! No per-call state lives here.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::error::{FlowError, FlowResult};
use crate::renderer::PromptRenderer;
use crate::schema::{Constraint, FieldSpec, Schema};

use bloom_types::{BLOOM_DETECTION_FLOW, BLOOM_FORECAST_FLOW};

/// Instruction template for the detection/monitoring flow.
///
/// The wording steers the model; edit with the same care as the field
/// descriptions in the schemas below.
const DETECTION_TEMPLATE: &str = "\
You are an AI expert in analyzing Earth observation data to detect and monitor plant blooming events.

Analyze satellite data and vegetation indices for the specified location and time period to determine the bloom status.
Return the bloom status, confidence level, and the satellite data sources used.

Location: {{location}}
Start Date: {{startDate}}
End Date: {{endDate}}

Consider factors like vegetation indices, soil moisture, and climate patterns to provide an accurate bloom status.
Ensure the confidence level reflects the reliability of the bloom detection based on available data.
Identify the specific satellite data sources (e.g., MODIS, Landsat) that contributed to the analysis.
";

/// Instruction template for the forecast flow.
const FORECAST_TEMPLATE: &str = "\
You are an expert in predicting plant blooming events.

Based on historical climate data, current conditions, and satellite data, generate a forecast for bloom events in the specified location and time period. Use all the information at your disposal to generate the most accurate forecast.

Location: {{location}}
Start Date: {{startDate}}
End Date: {{endDate}}
";

/// A named, stateless request/response contract: input schema, prompt
/// template, output schema.
#[derive(Debug, Clone)]
pub struct FlowDefinition {
    /// Unique flow name.
    pub name: String,
    /// Schema the input must satisfy before rendering is attempted.
    pub input_schema: Schema,
    /// Schema the backend's reply must satisfy to count as a result.
    pub output_schema: Schema,
    /// Prompt template with named placeholders for the input fields.
    pub template: String,
}

/// Read-only collection of flow definitions with their compiled templates.
pub struct FlowRegistry {
    flows: HashMap<String, FlowDefinition>,
    renderer: PromptRenderer,
}

impl FlowRegistry {
    /// Build a registry from explicit definitions, compiling each template.
    pub fn new(definitions: Vec<FlowDefinition>) -> FlowResult<Self> {
        let mut renderer = PromptRenderer::new();
        let mut flows = HashMap::new();
        for definition in definitions {
            renderer.register(&definition.name, &definition.template)?;
            debug!(flow = %definition.name, "registered flow");
            flows.insert(definition.name.clone(), definition);
        }
        Ok(Self { flows, renderer })
    }

    /// Build the registry with the two built-in flows.
    pub fn builtin() -> FlowResult<Self> {
        Self::new(vec![detection_flow(), forecast_flow()])
    }

    /// Look up a flow by name.
    pub fn get(&self, name: &str) -> Option<&FlowDefinition> {
        self.flows.get(name)
    }

    /// Names of all registered flows.
    pub fn flow_names(&self) -> Vec<&str> {
        self.flows.keys().map(String::as_str).collect()
    }

    /// Render the named flow's prompt with already-validated input.
    pub fn render(&self, name: &str, input: &Value) -> FlowResult<String> {
        if !self.flows.contains_key(name) {
            return Err(FlowError::UnknownFlow(name.to_string()));
        }
        self.renderer.render(name, input)
    }
}

/// Shared input schema for both built-in flows.
fn query_schema() -> Schema {
    Schema::new(vec![
        FieldSpec::text(
            "location",
            "The geographic location for the query (e.g., 'California, USA'). \
             Specify as City, State, Country.",
        )
        .with_constraint(Constraint::NonEmpty),
        FieldSpec::text("startDate", "The start date for the period. Specify as YYYY-MM-DD.")
            .with_constraint(Constraint::IsoDate),
        FieldSpec::text("endDate", "The end date for the period. Specify as YYYY-MM-DD.")
            .with_constraint(Constraint::IsoDate),
    ])
}

/// The `bloom-detection` flow configuration.
pub fn detection_flow() -> FlowDefinition {
    FlowDefinition {
        name: BLOOM_DETECTION_FLOW.to_string(),
        input_schema: query_schema(),
        output_schema: Schema::new(vec![
            FieldSpec::text(
                "bloomStatus",
                "The current bloom status for the specified location and time period.",
            ),
            FieldSpec::number(
                "confidenceLevel",
                "The confidence level of the bloom detection (0-1).",
            ),
            FieldSpec::text_list(
                "satelliteDataUsed",
                "List of satellite data sources used (e.g., MODIS, Landsat).",
            ),
        ]),
        template: DETECTION_TEMPLATE.to_string(),
    }
}

/// The `bloom-forecast` flow configuration.
pub fn forecast_flow() -> FlowDefinition {
    FlowDefinition {
        name: BLOOM_FORECAST_FLOW.to_string(),
        input_schema: query_schema(),
        output_schema: Schema::new(vec![FieldSpec::text(
            "forecast",
            "A description of the predicted bloom events.",
        )]),
        template: FORECAST_TEMPLATE.to_string(),
    }
}

//! Prompt rendering for flows.
//!
//! Rendering is pure substitution of validated input fields into a
//! flow-specific template: no conditionals, no helpers, no HTML escaping.
//! Strict mode turns a missing placeholder into an error instead of silent
//! empty output, which keeps the "cannot fail after validation" guarantee
//! checkable rather than assumed.

use handlebars::Handlebars;
use serde_json::Value;
use tracing::trace;

use crate::error::{FlowError, FlowResult};

/// Compiles prompt templates once and renders them deterministically:
/// identical input always produces byte-identical text.
#[derive(Debug)]
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl PromptRenderer {
    /// Create an empty renderer.
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Compile and register a template under a flow name.
    pub fn register(&mut self, name: &str, template: &str) -> FlowResult<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| FlowError::Template(Box::new(e)))?;
        trace!(template = name, "registered prompt template");
        Ok(())
    }

    /// Render the named template with already-validated input data.
    pub fn render(&self, name: &str, data: &Value) -> FlowResult<String> {
        let rendered = self.handlebars.render(name, data)?;
        trace!(template = name, bytes = rendered.len(), "rendered prompt");
        Ok(rendered)
    }
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

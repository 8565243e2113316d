//! Errors that can occur during flow execution.

use std::fmt;

use thiserror::Error;

/// A single violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Name of the offending field.
    pub field: String,
    /// What the field failed to satisfy.
    pub message: String,
}

impl Violation {
    /// Create a new violation.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A schema check failure listing every violated field constraint, not just
/// the first one found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    /// Create a validation error from the collected violations.
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// The violated constraints, in schema field order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Whether a specific field is among the violations.
    pub fn mentions(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field(s) failed validation: ", self.violations.len())?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Errors surfaced by the flow executor.
///
/// `Validation` is recoverable caller error and is raised before any backend
/// call. `Backend` and `OutputValidation` both mean "no result" to callers
/// but are kept distinguishable for diagnosis.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Input failed the flow's input schema.
    #[error("input validation failed: {0}")]
    Validation(ValidationError),

    /// The generative backend failed outright.
    #[error("backend error: {0}")]
    Backend(String),

    /// The backend replied, but the reply does not satisfy the output schema.
    #[error("output validation failed: {0}")]
    OutputValidation(ValidationError),

    /// No flow is registered under the requested name.
    #[error("unknown flow: {0}")]
    UnknownFlow(String),

    /// A prompt template failed to compile at registry construction.
    #[error("template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    /// Rendering failed. Unreachable once input validation has passed, kept
    /// so the renderer propagates with `?` instead of panicking.
    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// Serialization error at the typed boundary.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FlowError {
    /// Create a backend error from any displayable cause.
    pub fn backend(cause: impl fmt::Display) -> Self {
        Self::Backend(cause.to_string())
    }
}

/// Result type for flow operations.
pub type FlowResult<T> = Result<T, FlowError>;

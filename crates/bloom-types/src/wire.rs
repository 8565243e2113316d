//! Wire types exchanged with the generative backend service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for a single generation call.
///
/// `output_shape` is the schema descriptor of the expected reply, including
/// the per-field descriptions that steer the model. The backend makes no
/// guarantee that its reply actually conforms; conformance is checked by the
/// flow executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The rendered instruction text.
    pub prompt: String,
    /// Descriptor of the expected reply shape.
    pub output_shape: Value,
}

/// Top-level response structure from the generative backend service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReply {
    /// The model's best-effort structured answer, still untyped.
    pub result: Value,
}

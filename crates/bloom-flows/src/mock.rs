//! Mock generative backend for tests and offline runs.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::backend::GenerativeBackend;

enum MockBehavior {
    /// Always return a clone of this reply.
    Reply(Value),
    /// Always fail with this message.
    Fail(String),
    /// Return a deterministic schema-conformant reply derived from the
    /// requested output shape.
    Canned,
}

/// A backend double that records how many times it was invoked.
///
/// The call counter is what lets tests assert the core property that invalid
/// input never reaches the backend.
pub struct MockBackend {
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockBackend {
    /// A mock that always returns the given reply.
    pub fn replying(reply: Value) -> Self {
        Self {
            behavior: MockBehavior::Reply(reply),
            calls: AtomicUsize::new(0),
        }
    }

    /// A mock that always fails.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            behavior: MockBehavior::Fail(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A mock that answers with [`canned_reply`] for any prompt.
    pub fn canned() -> Self {
        Self {
            behavior: MockBehavior::Canned,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `generate` has been invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn generate(&self, _prompt: &str, output_shape: &Value) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::Reply(reply) => Ok(reply.clone()),
            MockBehavior::Fail(message) => anyhow::bail!("{message}"),
            MockBehavior::Canned => Ok(canned_reply(output_shape)),
        }
    }
}

/// Deterministic reply conforming to the requested output shape.
///
/// Picks the forecast reply when the shape requires a `forecast` field,
/// otherwise answers as the detection flow. Shared with the `bloom-agent`
/// dev server so offline runs and the local stub agree byte for byte.
pub fn canned_reply(output_shape: &Value) -> Value {
    let wants_forecast = output_shape["required"]
        .as_array()
        .is_some_and(|required| required.iter().any(|f| f == "forecast"));

    if wants_forecast {
        json!({
            "forecast": "Mild temperatures and adequate soil moisture point to a \
                         moderate bloom developing through the requested period, \
                         peaking in its final week.",
        })
    } else {
        json!({
            "bloomStatus": "Active Bloom",
            "confidenceLevel": 0.87,
            "satelliteDataUsed": ["MODIS", "Landsat"],
        })
    }
}

//! BloomWatch structured generation flows.
//!
//! A flow pairs a validated input shape, a prompt template, and a validated
//! output shape under a unique name. The executor drives each invocation
//! through validate → render → invoke → parse, returning a typed result or a
//! distinguishing error. Flow definitions are built once at startup and
//! shared read-only; every invocation is independent and stateless.

pub mod backend;
pub mod error;
pub mod executor;
pub mod mock;
pub mod registry;
pub mod renderer;
pub mod schema;

pub use backend::{GenerativeBackend, HttpBackend};
pub use error::{FlowError, FlowResult, ValidationError, Violation};
pub use executor::{FlowExecutor, FlowPhase};
pub use mock::MockBackend;
pub use registry::{FlowDefinition, FlowRegistry};
pub use schema::{Constraint, FieldKind, FieldSpec, Schema};

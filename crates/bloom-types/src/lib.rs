//! Shared types for BloomWatch structured generation flows.
//!
//! This crate contains the typed input/output contracts for the two built-in
//! flows, the wire types exchanged with the generative backend, and the
//! presentation-layer `Marker` type derived from flow outputs.

pub mod flow;
pub mod marker;
pub mod wire;

pub use flow::*;
pub use marker::*;
pub use wire::*;

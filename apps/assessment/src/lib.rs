//! Waypoint assessment core — recovers schema-conformant JSON from raw
//! generative-model output.
//!
//! Request handlers hand this crate the raw text of a generative call plus
//! the schema descriptor for their endpoint, and get back either a fully
//! normalized value or a typed failure (`NoJsonFound` / `MalformedJson`).
//! The recovery pipeline is pure, synchronous, and stateless; only
//! `llm_client` touches the network.

pub mod config;
pub mod extract;
pub mod llm_client;
pub mod normalize;
pub mod pipeline;
pub mod shapes;

pub use extract::{extract, extract_with, parse, BracketPreference, ExtractError};
pub use normalize::{ArrayPolicy, FieldKind, FieldSpec, SchemaDescriptor, Shape};
pub use pipeline::{recover, recover_observed, DumpToDir, FailureObserver};

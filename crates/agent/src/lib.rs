//! Query pipeline orchestration
//!
//! `SearchService` wires the analyzer, the retrieval stack and the answer
//! synthesizer behind one constructor-injected object; there is no ambient
//! global state. The lifecycle module owns one-time training and artifact
//! persistence, with model handles re-attached via the factory on load.

pub mod lifecycle;
pub mod service;

pub use lifecycle::{load_index, train_index, ModelHandles};
pub use service::{SearchService, ServiceAnswer};

//! Backend provider implementations
//!
//! Concrete implementations of [`SummaryGenerator`](crate::SummaryGenerator)
//! and [`DocumentSource`](crate::DocumentSource).

pub mod backend;

pub use backend::{ArkivaBackend, BackendConfig};

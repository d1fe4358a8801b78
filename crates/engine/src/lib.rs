//! `engine` crate — target model, registry, and the execution engine.

pub mod models;
pub mod error;
pub mod registry;
pub mod executor;

pub use models::{Condition, Target};
pub use error::EngineError;
pub use registry::TargetRegistry;
pub use executor::{RunReport, Runner, TargetOutcome};

// Re-exported so embedders can build configurations without depending on
// the targets crate directly.
pub use targets::RunConfig;

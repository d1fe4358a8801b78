//! `targets` crate — the `TargetBody` trait and the run-time context handed
//! to target bodies.
//!
//! Every body — shell glue, publishing steps, test doubles — implements
//! [`TargetBody`]. The engine crate dispatches execution through this trait
//! object and never learns what a body actually does.

pub mod config;
pub mod error;
pub mod traits;
pub mod mock;

pub use config::RunConfig;
pub use error::BodyError;
pub use traits::{FnBody, TargetBody, TargetContext};

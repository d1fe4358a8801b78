//! The `TargetBody` trait — the contract every target body must fulfil.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{BodyError, RunConfig};

/// Context handed to a body when its target executes.
///
/// Bodies get read access to the run's configuration and nothing else; all
/// external I/O (processes, files, network) happens behind this boundary and
/// is opaque to the engine.
#[derive(Debug, Clone)]
pub struct TargetContext {
    /// ID of the current run.
    pub run_id: Uuid,
    /// Name of the target being executed.
    pub target: String,
    /// Parameters supplied when the run started.
    pub config: RunConfig,
}

/// The core body trait.
///
/// A body either resolves or fails; the engine awaits it to completion
/// before moving to the next target, so execution stays strictly sequential
/// even when the body itself suspends on external work.
#[async_trait]
pub trait TargetBody: Send + Sync {
    async fn run(&self, ctx: &TargetContext) -> Result<(), BodyError>;
}

/// Adapter for synchronous closure bodies.
///
/// Most build steps in an embedding application are plain synchronous calls
/// into glue code; this wraps them so the engine only ever sees the async
/// contract.
pub struct FnBody<F>(pub F);

#[async_trait]
impl<F> TargetBody for FnBody<F>
where
    F: Fn(&TargetContext) -> Result<(), BodyError> + Send + Sync,
{
    async fn run(&self, ctx: &TargetContext) -> Result<(), BodyError> {
        (self.0)(ctx)
    }
}

//! Core domain model: the build target.
//!
//! A [`Target`] is a named unit of work with declared dependencies, an
//! optional runtime condition, required-parameter checks, and a body. The
//! registry keys the dependency graph on target names, so names must be
//! unique (case-sensitive).

use std::fmt;
use std::sync::Arc;

use targets::{BodyError, FnBody, RunConfig, TargetBody, TargetContext};

/// Runtime condition predicate.
///
/// Evaluated freshly at the moment the target would run, never at
/// registration time, against the run's configuration snapshot.
pub type Condition = Arc<dyn Fn(&RunConfig) -> bool + Send + Sync>;

/// A single declared build step.
pub struct Target {
    /// Unique identifier, referenced by other targets' dependency lists.
    pub name: String,
    /// Targets that must complete before this one, in declared order.
    /// The declared order is also the traversal tie-break, so runs are
    /// reproducible.
    pub dependencies: Vec<String>,
    /// Absent condition means the target always runs.
    pub condition: Option<Condition>,
    /// Configuration keys that must be set before the body runs.
    pub requirements: Vec<String>,
    /// The side-effecting work itself.
    pub body: Arc<dyn TargetBody>,
}

/// Placeholder body for aggregate targets that only exist to pull in their
/// dependencies.
struct NoopBody;

#[async_trait::async_trait]
impl TargetBody for NoopBody {
    async fn run(&self, _ctx: &TargetContext) -> Result<(), BodyError> {
        Ok(())
    }
}

impl Target {
    /// Create a target with no dependencies, no condition, no requirements,
    /// and a no-op body. Chain the builder methods to fill it in.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            condition: None,
            requirements: Vec::new(),
            body: Arc::new(NoopBody),
        }
    }

    /// Declare that `dep` must complete before this target runs.
    pub fn depends_on(mut self, dep: impl Into<String>) -> Self {
        self.dependencies.push(dep.into());
        self
    }

    /// Require the configuration key `parameter` to be set (non-null,
    /// non-empty) before this target's body may run.
    pub fn requires(mut self, parameter: impl Into<String>) -> Self {
        self.requirements.push(parameter.into());
        self
    }

    /// Gate the body behind a predicate evaluated at execution time.
    /// A false condition skips the body but still marks the target complete.
    pub fn only_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&RunConfig) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(predicate));
        self
    }

    /// Attach the body.
    pub fn executes(mut self, body: impl TargetBody + 'static) -> Self {
        self.body = Arc::new(body);
        self
    }

    /// Attach a synchronous closure body.
    pub fn executes_fn<F>(self, f: F) -> Self
    where
        F: Fn(&TargetContext) -> Result<(), BodyError> + Send + Sync + 'static,
    {
        self.executes(FnBody(f))
    }
}

// Bodies and conditions are trait objects, so Debug is spelled out by hand.
impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("requirements", &self.requirements)
            .field("conditional", &self.condition.is_some())
            .finish()
    }
}

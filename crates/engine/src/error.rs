//! Engine-level error types.

use targets::BodyError;
use thiserror::Error;

/// Errors produced by the build engine (registration + resolution + execution).
#[derive(Debug, Error)]
pub enum EngineError {
    // ------ Registration / resolution errors ------

    /// Two targets share the same name.
    #[error("duplicate target: '{0}'")]
    DuplicateTarget(String),

    /// A run request or a declared dependency names a target that was never
    /// registered.
    #[error("unknown target: '{0}'")]
    UnknownTarget(String),

    /// The dependency graph contains a cycle reachable from the requested
    /// target; `path` lists the cycle's members, first node repeated at the
    /// end.
    #[error("dependency cycle: {}", .path.join(" -> "))]
    DependencyCycle { path: Vec<String> },

    // ------ Execution errors ------

    /// A target's required parameter is absent from the run configuration.
    /// Earlier plan entries have already executed; nothing after runs.
    #[error("target '{target}' requires parameter '{parameter}', which is not set")]
    MissingParameter { target: String, parameter: String },

    /// A target body failed; the rest of the plan never runs.
    #[error("target '{target}' failed")]
    TargetFailed {
        target: String,
        #[source]
        source: BodyError,
    },
}

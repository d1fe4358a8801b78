//! Build manifest — the JSON file an embedding project uses to declare its
//! targets to the `buildgraph` binary.
//!
//! Each entry maps onto one engine [`Target`]: dependencies, required
//! parameters, an optional `when` flag gating the body on a configuration
//! parameter, and an optional shell command body. Entries without a command
//! are aggregate targets that only pull in their dependencies.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use engine::{EngineError, Target, TargetRegistry};
use targets::{BodyError, TargetBody, TargetContext};

/// Top-level manifest file.
#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub targets: Vec<TargetSpec>,
}

/// One declared target.
#[derive(Debug, Deserialize)]
pub struct TargetSpec {
    pub name: String,
    #[serde(default)]
    pub deps: Vec<String>,
    /// Configuration keys that must be set (via `--param`) before this
    /// target may run.
    #[serde(default)]
    pub requires: Vec<String>,
    /// Optional configuration key; the body only runs when the parameter
    /// reads as truthy at execution time.
    #[serde(default)]
    pub when: Option<String>,
    /// Shell command to execute; omitted for aggregate targets.
    #[serde(default)]
    pub command: Option<String>,
}

impl Manifest {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Build a validated registry out of the manifest.
    pub fn into_registry(self) -> Result<TargetRegistry, EngineError> {
        let mut registry = TargetRegistry::new();

        for spec in self.targets {
            let mut target = Target::new(spec.name);
            for dep in spec.deps {
                target = target.depends_on(dep);
            }
            for parameter in spec.requires {
                target = target.requires(parameter);
            }
            if let Some(flag) = spec.when {
                target = target.only_when(move |cfg| cfg.truthy(&flag));
            }
            if let Some(command) = spec.command {
                target = target.executes(ShellBody { command });
            }
            registry.register(target)?;
        }

        // Catch dangling dependency names at load time rather than mid-run.
        registry.validate()?;
        Ok(registry)
    }
}

/// Body that runs a shell command to completion.
///
/// This is embedding glue, not engine territory: the engine only sees an
/// opaque body that resolves or fails.
pub struct ShellBody {
    pub command: String,
}

#[async_trait]
impl TargetBody for ShellBody {
    async fn run(&self, ctx: &TargetContext) -> Result<(), BodyError> {
        info!("target '{}': $ {}", ctx.target, self.command);

        let status = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(BodyError::Failed(format!(
                "command exited with {status}"
            )))
        }
    }
}

//! Build execution engine.
//!
//! `Runner` is the central orchestrator:
//! 1. Resolves the requested target's dependency closure into a plan.
//! 2. Walks the plan strictly in order, one target at a time.
//! 3. Validates required parameters immediately before each target.
//! 4. Evaluates runtime conditions lazily, right before the body would run.
//! 5. Memoizes completed targets so shared dependencies execute once.
//! 6. Halts on the first failure; earlier work is never rolled back.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use targets::{RunConfig, TargetContext};

use crate::{EngineError, TargetRegistry};

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// What happened to one plan entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOutcome {
    /// The body ran to completion.
    Executed,
    /// The runtime condition was false; the body never ran, but the target
    /// counts as complete for its dependents.
    SkippedCondition,
    /// Already completed earlier in this run (two requested targets sharing
    /// a dependency).
    SkippedMemoized,
}

/// The result of a successful run.
///
/// `outcomes` lists every plan entry in the order it was visited, which for
/// shared dependencies is the position fixed by their first occurrence.
#[derive(Debug)]
pub struct RunReport {
    /// ID of this run, also visible to bodies through [`TargetContext`].
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Per-target outcome in plan order.
    pub outcomes: Vec<(String, TargetOutcome)>,
}

impl RunReport {
    /// Names of targets whose bodies actually ran, in execution order.
    pub fn executed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == TargetOutcome::Executed)
            .map(|(n, _)| n.as_str())
            .collect()
    }

    /// Names of targets skipped by their condition, in plan order.
    pub fn skipped(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == TargetOutcome::SkippedCondition)
            .map(|(n, _)| n.as_str())
            .collect()
    }

    fn record(&mut self, name: &str, outcome: TargetOutcome) {
        self.outcomes.push((name.to_owned(), outcome));
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Stateless orchestrator for build runs.
///
/// Borrows the registry read-only, so one registry can back any number of
/// sequential runs; all per-run bookkeeping lives on the stack of `run` and
/// is discarded when it returns.
pub struct Runner<'r> {
    registry: &'r TargetRegistry,
}

impl<'r> Runner<'r> {
    pub fn new(registry: &'r TargetRegistry) -> Self {
        Self { registry }
    }

    /// Run one target and everything it depends on.
    ///
    /// # Errors
    /// Returns `EngineError` for resolution failures (before any body has
    /// run), missing required parameters, or a failed body. On error the
    /// remainder of the plan is abandoned; completed targets stay completed.
    #[instrument(skip(self, config))]
    pub async fn run(&self, target: &str, config: &RunConfig) -> Result<RunReport, EngineError> {
        self.run_all(&[target], config).await
    }

    /// Run several requested targets in one session, sharing a single
    /// memoization set: a dependency pulled in by two requests executes
    /// once, at its first plan position.
    #[instrument(skip(self, config))]
    pub async fn run_all(
        &self,
        requested: &[&str],
        config: &RunConfig,
    ) -> Result<RunReport, EngineError> {
        // ------------------------------------------------------------------
        // Resolve every plan up front. Any unknown target or cycle aborts
        // here, before a single body has run.
        // ------------------------------------------------------------------
        let mut plan: Vec<String> = Vec::new();
        for name in requested {
            plan.extend(self.registry.resolve_closure(name)?);
        }

        info!(
            "plan resolved — {} entries in order: {:?}",
            plan.len(),
            plan
        );

        let mut report = RunReport {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            outcomes: Vec::with_capacity(plan.len()),
        };
        let mut completed: HashSet<String> = HashSet::new();

        // ------------------------------------------------------------------
        // Walk the plan sequentially.
        // ------------------------------------------------------------------
        for name in &plan {
            if completed.contains(name) {
                info!("target '{name}' already completed this run, skipping");
                report.record(name, TargetOutcome::SkippedMemoized);
                continue;
            }

            // Resolution guarantees the lookup succeeds; the error arm keeps
            // the invariant explicit instead of panicking.
            let target = self
                .registry
                .get(name)
                .ok_or_else(|| EngineError::UnknownTarget(name.clone()))?;

            // Required parameters are checked at the target's plan position:
            // everything before it has already run and is not undone.
            for parameter in &target.requirements {
                if !config.is_set(parameter) {
                    warn!("target '{name}' halting run: parameter '{parameter}' is not set");
                    return Err(EngineError::MissingParameter {
                        target: name.clone(),
                        parameter: parameter.clone(),
                    });
                }
            }

            // Conditions are evaluated here and nowhere earlier, so they see
            // the state of the world at the moment the target would run.
            if let Some(condition) = &target.condition {
                if !condition(config) {
                    info!("target '{name}' condition is false, skipping body");
                    completed.insert(name.clone());
                    report.record(name, TargetOutcome::SkippedCondition);
                    continue;
                }
            }

            let ctx = TargetContext {
                run_id: report.run_id,
                target: name.clone(),
                config: config.clone(),
            };

            // Await the body to completion before touching the next entry;
            // two targets never overlap in time.
            match target.body.run(&ctx).await {
                Ok(()) => {
                    info!("target '{name}' succeeded");
                    completed.insert(name.clone());
                    report.record(name, TargetOutcome::Executed);
                }
                Err(cause) => {
                    error!("target '{name}' failed: {cause}");
                    return Err(EngineError::TargetFailed {
                        target: name.clone(),
                        source: cause,
                    });
                }
            }
        }

        report.finished_at = Utc::now();
        info!(
            "run {} finished: {} executed, {} skipped",
            report.run_id,
            report.executed().len(),
            report.skipped().len()
        );

        Ok(report)
    }
}

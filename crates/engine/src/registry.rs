//! Target registry — declaration storage and dependency-closure resolution.
//!
//! Rules enforced when resolving a closure:
//! 1. Every reachable dependency name must be registered.
//! 2. The reachable graph must be acyclic (self-loops included).
//! 3. Each target appears exactly once, after all of its dependencies.
//!
//! Resolution is a depth-first post-order walk from the requested target.
//! A target's declared dependency order is the traversal tie-break, so the
//! resulting plan is reproducible run to run.

use std::collections::{hash_map::Entry, HashMap, HashSet};

use crate::{EngineError, Target};

/// Owns the full name → [`Target`] mapping.
///
/// Built once during setup and treated as read-only for the duration of any
/// run; the executor only ever borrows it, so one registry can back any
/// number of runs.
#[derive(Debug, Default)]
pub struct TargetRegistry {
    targets: HashMap<String, Target>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target declaration.
    ///
    /// # Errors
    /// [`EngineError::DuplicateTarget`] if a target with the same name is
    /// already registered.
    pub fn register(&mut self, target: Target) -> Result<(), EngineError> {
        match self.targets.entry(target.name.clone()) {
            Entry::Occupied(e) => Err(EngineError::DuplicateTarget(e.key().clone())),
            Entry::Vacant(v) => {
                v.insert(target);
                Ok(())
            }
        }
    }

    /// Look up a registered target.
    pub fn get(&self, name: &str) -> Option<&Target> {
        self.targets.get(name)
    }

    /// Number of registered targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Check that every declared dependency of every target is registered.
    ///
    /// Run-time resolution reports the same problem lazily for the reachable
    /// part of the graph; this is the setup-time whole-registry check.
    ///
    /// # Errors
    /// [`EngineError::UnknownTarget`] naming the first dangling dependency.
    pub fn validate(&self) -> Result<(), EngineError> {
        for target in self.targets.values() {
            for dep in &target.dependencies {
                if !self.targets.contains_key(dep) {
                    return Err(EngineError::UnknownTarget(dep.clone()));
                }
            }
        }
        Ok(())
    }

    /// Resolve the execution plan for `name`: the ordered, deduplicated list
    /// of target names that must run, ending with `name` itself, with every
    /// dependency strictly before its dependents.
    ///
    /// # Errors
    /// - [`EngineError::UnknownTarget`] if `name` or a reachable dependency
    ///   is not registered.
    /// - [`EngineError::DependencyCycle`] if a cycle is reachable from
    ///   `name`; never returns a partial plan.
    pub fn resolve_closure(&self, name: &str) -> Result<Vec<String>, EngineError> {
        let mut order = Vec::new();
        let mut done = HashSet::new();
        let mut stack = Vec::new();
        self.visit(name, &mut stack, &mut done, &mut order)?;
        Ok(order)
    }

    // Depth-first post-order. `stack` doubles as the "visiting" marker set
    // and the path used to report a cycle; `done` dedupes diamond
    // dependencies at the position fixed by the first traversal path that
    // completes them.
    fn visit(
        &self,
        name: &str,
        stack: &mut Vec<String>,
        done: &mut HashSet<String>,
        order: &mut Vec<String>,
    ) -> Result<(), EngineError> {
        if done.contains(name) {
            return Ok(());
        }

        if let Some(pos) = stack.iter().position(|n| n == name) {
            let mut path: Vec<String> = stack[pos..].to_vec();
            path.push(name.to_owned());
            return Err(EngineError::DependencyCycle { path });
        }

        let target = self
            .targets
            .get(name)
            .ok_or_else(|| EngineError::UnknownTarget(name.to_owned()))?;

        stack.push(name.to_owned());
        for dep in &target.dependencies {
            self.visit(dep, stack, done, order)?;
        }
        stack.pop();

        done.insert(name.to_owned());
        order.push(name.to_owned());
        Ok(())
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn registry_of(decls: Vec<Target>) -> TargetRegistry {
        let mut registry = TargetRegistry::new();
        for t in decls {
            registry.register(t).expect("unique names in fixture");
        }
        registry
    }

    #[test]
    fn linear_chain_resolves_in_dependency_order() {
        // c depends on b depends on a
        let registry = registry_of(vec![
            Target::new("a"),
            Target::new("b").depends_on("a"),
            Target::new("c").depends_on("b"),
        ]);

        let plan = registry.resolve_closure("c").expect("acyclic");
        assert_eq!(plan, vec!["a", "b", "c"]);
    }

    #[test]
    fn diamond_dependency_appears_exactly_once() {
        //   d
        //  / \
        // b   c
        //  \ /
        //   a (requested)
        let registry = registry_of(vec![
            Target::new("a").depends_on("b").depends_on("c"),
            Target::new("b").depends_on("d"),
            Target::new("c").depends_on("d"),
            Target::new("d"),
        ]);

        let plan = registry.resolve_closure("a").expect("acyclic");
        assert_eq!(plan, vec!["d", "b", "c", "a"]);
        assert_eq!(plan.iter().filter(|n| *n == "d").count(), 1);
    }

    #[test]
    fn tie_break_follows_declared_dependency_order() {
        let registry = registry_of(vec![
            Target::new("all").depends_on("test").depends_on("lint").depends_on("docs"),
            Target::new("test"),
            Target::new("lint"),
            Target::new("docs"),
        ]);

        // Independent siblings come out in declaration order, not hash order.
        let plan = registry.resolve_closure("all").expect("acyclic");
        assert_eq!(plan, vec!["test", "lint", "docs", "all"]);
    }

    #[test]
    fn cycle_is_reported_with_its_members() {
        // a -> b -> c -> a
        let registry = registry_of(vec![
            Target::new("a").depends_on("b"),
            Target::new("b").depends_on("c"),
            Target::new("c").depends_on("a"),
        ]);

        match registry.resolve_closure("a") {
            Err(EngineError::DependencyCycle { path }) => {
                assert_eq!(path, vec!["a", "b", "c", "a"]);
            }
            other => panic!("expected DependencyCycle, got {other:?}"),
        }
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let registry = registry_of(vec![Target::new("a").depends_on("a")]);

        assert!(matches!(
            registry.resolve_closure("a"),
            Err(EngineError::DependencyCycle { path }) if path == vec!["a", "a"]
        ));
    }

    #[test]
    fn cycle_off_the_requested_root_still_fails() {
        // root -> x -> y -> x
        let registry = registry_of(vec![
            Target::new("root").depends_on("x"),
            Target::new("x").depends_on("y"),
            Target::new("y").depends_on("x"),
        ]);

        assert!(matches!(
            registry.resolve_closure("root"),
            Err(EngineError::DependencyCycle { .. })
        ));
    }

    #[test]
    fn unknown_request_is_rejected() {
        let registry = registry_of(vec![Target::new("a")]);

        assert!(matches!(
            registry.resolve_closure("ghost"),
            Err(EngineError::UnknownTarget(name)) if name == "ghost"
        ));
    }

    #[test]
    fn dangling_dependency_is_rejected_at_resolution() {
        let registry = registry_of(vec![Target::new("a").depends_on("ghost")]);

        assert!(matches!(
            registry.resolve_closure("a"),
            Err(EngineError::UnknownTarget(name)) if name == "ghost"
        ));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = TargetRegistry::new();
        registry.register(Target::new("a")).expect("first is fine");

        assert!(matches!(
            registry.register(Target::new("a")),
            Err(EngineError::DuplicateTarget(name)) if name == "a"
        ));
    }

    #[test]
    fn validate_catches_dangling_references_anywhere() {
        let registry = registry_of(vec![
            Target::new("a"),
            Target::new("b").depends_on("missing"),
        ]);

        assert!(matches!(
            registry.validate(),
            Err(EngineError::UnknownTarget(name)) if name == "missing"
        ));

        let ok = registry_of(vec![Target::new("a"), Target::new("b").depends_on("a")]);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn single_target_no_dependencies_is_valid() {
        let registry = registry_of(vec![Target::new("solo")]);
        let plan = registry.resolve_closure("solo").expect("valid");
        assert_eq!(plan, vec!["solo"]);
    }
}

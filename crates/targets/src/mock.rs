//! `MockBody` — a test double for `TargetBody`.
//!
//! Used throughout the engine tests to assert how often (and whether) a
//! target's body was actually invoked.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{BodyError, TargetBody, TargetContext};

/// Behaviour injected into `MockBody` at construction time.
pub enum MockBehaviour {
    /// Resolve successfully.
    Succeed,
    /// Fail with the given message.
    Fail(String),
}

/// A mock body that records every invocation and returns a
/// programmer-specified result.
pub struct MockBody {
    /// Label used in test assertions.
    pub name: String,
    /// What the body will do when `run` is called.
    pub behaviour: MockBehaviour,
    /// Target names this body was invoked for (in call order).
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockBody {
    /// Create a mock that always succeeds.
    pub fn succeeding(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behaviour: MockBehaviour::Succeed,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that always fails with the given message.
    pub fn failing(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behaviour: MockBehaviour::Fail(msg.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of times this body has been executed.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Shared handle to the call log, for asserting after the body has been
    /// moved into a target.
    pub fn call_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl TargetBody for MockBody {
    async fn run(&self, ctx: &TargetContext) -> Result<(), BodyError> {
        self.calls.lock().unwrap().push(ctx.target.clone());

        match &self.behaviour {
            MockBehaviour::Succeed => Ok(()),
            MockBehaviour::Fail(msg) => Err(BodyError::Failed(msg.clone())),
        }
    }
}

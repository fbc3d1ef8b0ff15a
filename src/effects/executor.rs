use std::collections::BTreeSet;

use crate::effects::dispatch::EffectExecutor;
use crate::effects::effect::SideEffect;
use crate::foundation::error::{ReelError, ReelResult};

/// Executor that records every executed effect, for tests and trace replay.
///
/// Namespaces registered with [`RecordingExecutor::fail_namespace`] fail with
/// [`ReelError::EffectExecution`], standing in for a collaborator that throws.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    log: Vec<SideEffect>,
    failing: BTreeSet<String>,
}

impl RecordingExecutor {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every effect in `namespace` fail.
    pub fn fail_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.failing.insert(namespace.into());
        self
    }

    /// Effects executed successfully, in execution order.
    pub fn log(&self) -> &[SideEffect] {
        &self.log
    }

    /// Tokens executed successfully, in execution order.
    pub fn tokens(&self) -> Vec<&str> {
        self.log.iter().map(SideEffect::token).collect()
    }

    /// Number of successful executions of `token`.
    pub fn count(&self, token: &str) -> usize {
        self.log.iter().filter(|e| e.token() == token).count()
    }

    /// Drop everything recorded so far.
    pub fn clear(&mut self) {
        self.log.clear();
    }
}

impl EffectExecutor for RecordingExecutor {
    fn execute(&mut self, effect: &SideEffect) -> ReelResult<()> {
        if self.failing.contains(effect.namespace()) {
            return Err(ReelError::effect(effect.token(), "namespace configured to fail"));
        }
        self.log.push(effect.clone());
        Ok(())
    }
}

/// Executor that only emits a `tracing` event per effect.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingExecutor;

impl EffectExecutor for TracingExecutor {
    fn execute(&mut self, effect: &SideEffect) -> ReelResult<()> {
        tracing::info!(namespace = effect.namespace(), action = ?effect.action(), "side effect");
        Ok(())
    }
}

use std::collections::HashMap;

use crate::effects::effect::SideEffect;
use crate::foundation::core::Direction;
use crate::foundation::error::ReelResult;

/// Performs the actual mutation behind a [`SideEffect`] (image src swap, text update, ...).
///
/// The engine only decides *when* an effect runs; implementations decide *how*.
pub trait EffectExecutor {
    /// Execute one effect. Errors are logged by the dispatcher and never abort a batch.
    fn execute(&mut self, effect: &SideEffect) -> ReelResult<()>;
}

impl<E: EffectExecutor + ?Sized> EffectExecutor for Box<E> {
    fn execute(&mut self, effect: &SideEffect) -> ReelResult<()> {
        (**self).execute(effect)
    }
}

/// Identity of a forward/backward effect pair.
///
/// Both directions of one threshold share a latch, so a backward firing re-arms the forward
/// action and vice versa.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum LatchId {
    /// Effects declared on the cue with this declaration index.
    Cue(usize),
    /// Scene hooks fired when crossing the start of the scene with this index.
    Boundary(usize),
}

/// Result of a single [`SideEffectDispatcher::fire`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireOutcome {
    /// The executor ran and succeeded.
    Executed,
    /// Same direction as the latch's last firing; nothing ran.
    Suppressed,
    /// The executor ran and failed; the failure was logged.
    Failed,
}

/// Counters for everything dispatched during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct DispatchReport {
    /// Effects the executor completed.
    pub executed: u32,
    /// Effects skipped by the per-direction latch.
    pub suppressed: u32,
    /// Effects whose execution failed.
    pub failed: u32,
}

impl DispatchReport {
    fn record(&mut self, outcome: FireOutcome) {
        match outcome {
            FireOutcome::Executed => self.executed += 1,
            FireOutcome::Suppressed => self.suppressed += 1,
            FireOutcome::Failed => self.failed += 1,
        }
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: DispatchReport) {
        self.executed += other.executed;
        self.suppressed += other.suppressed;
        self.failed += other.failed;
    }
}

/// Runs side effects at most once per direction between opposite-direction firings.
pub struct SideEffectDispatcher<E> {
    executor: E,
    latches: HashMap<LatchId, Direction>,
}

impl<E: EffectExecutor> SideEffectDispatcher<E> {
    /// Wrap an executor. All latches start unarmed in both directions.
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            latches: HashMap::new(),
        }
    }

    /// Fire one effect under `latch` in `direction`.
    ///
    /// The latch records the direction even when the executor fails: the crossing happened and
    /// the opposite action must stay armed.
    pub fn fire(
        &mut self,
        latch: LatchId,
        effect: &SideEffect,
        direction: Direction,
    ) -> FireOutcome {
        if !self.arm(latch, direction) {
            tracing::trace!(?latch, %effect, ?direction, "effect suppressed");
            return FireOutcome::Suppressed;
        }
        self.run(latch, effect, direction)
    }

    /// Fire a batch of effects that share one latch, in order.
    ///
    /// A failing effect is logged and skipped; the rest of the batch still runs. An empty batch
    /// runs nothing but still records the direction, so crossing a threshold that has effects
    /// only the other way re-arms them.
    pub fn fire_all(
        &mut self,
        latch: LatchId,
        effects: &[SideEffect],
        direction: Direction,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        if !self.arm(latch, direction) {
            tracing::trace!(?latch, ?direction, count = effects.len(), "batch suppressed");
            report.suppressed = u32::try_from(effects.len()).unwrap_or(u32::MAX);
            return report;
        }
        for effect in effects {
            report.record(self.run(latch, effect, direction));
        }
        report
    }

    /// Last direction dispatched under `latch`, if any.
    pub fn last_direction(&self, latch: LatchId) -> Option<Direction> {
        self.latches.get(&latch).copied()
    }

    /// Forget every latch (used when a script is reloaded).
    pub fn reset(&mut self) {
        self.latches.clear();
    }

    /// Borrow the executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Mutably borrow the executor.
    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    fn arm(&mut self, latch: LatchId, direction: Direction) -> bool {
        if self.latches.get(&latch) == Some(&direction) {
            return false;
        }
        self.latches.insert(latch, direction);
        true
    }

    fn run(&mut self, latch: LatchId, effect: &SideEffect, direction: Direction) -> FireOutcome {
        match self.executor.execute(effect) {
            Ok(()) => {
                tracing::debug!(?latch, %effect, ?direction, "effect executed");
                FireOutcome::Executed
            }
            Err(err) => {
                tracing::warn!(?latch, %effect, ?direction, error = %err, "effect skipped");
                FireOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/dispatch.rs"]
mod tests;

use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::core::{PropertyKey, PropertyName, TargetId};
use crate::foundation::error::{ReelError, ReelResult};

/// Write-only destination for resolved property values.
///
/// Implementations apply values to whatever presents the scenes (DOM nodes, a canvas, a test
/// log). A target that no longer exists should fail with [`ReelError::MissingRenderTarget`];
/// the engine logs it and carries on with the rest of the frame.
pub trait RenderSink {
    /// Apply one resolved value.
    fn set_property(
        &mut self,
        target: &TargetId,
        property: &PropertyName,
        value: f64,
    ) -> ReelResult<()>;
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    fn set_property(
        &mut self,
        target: &TargetId,
        property: &PropertyName,
        value: f64,
    ) -> ReelResult<()> {
        (**self).set_property(target, property, value)
    }
}

/// In-memory sink for tests and trace replay.
///
/// Keeps the last value written per key. When built with [`RecordingSink::with_targets`],
/// writes to unknown targets fail like a vanished DOM node would.
#[derive(Debug, Default)]
pub struct RecordingSink {
    known: Option<BTreeSet<TargetId>>,
    values: BTreeMap<PropertyKey, f64>,
    writes: u64,
}

impl RecordingSink {
    /// Sink that accepts any target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that only accepts the listed targets.
    pub fn with_targets<I, T>(targets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            known: Some(targets.into_iter().map(TargetId::new).collect()),
            ..Self::default()
        }
    }

    /// Remove a target, as if its element was unmounted.
    pub fn remove_target(&mut self, target: &str) {
        let id = TargetId::new(target);
        match &mut self.known {
            Some(known) => {
                known.remove(&id);
            }
            None => {
                let mut known: BTreeSet<TargetId> =
                    self.values.keys().map(|k| k.target.clone()).collect();
                known.remove(&id);
                self.known = Some(known);
            }
        }
    }

    /// Last value written to `target.property`.
    pub fn get(&self, target: &str, property: &str) -> Option<f64> {
        self.values.get(&PropertyKey::new(target, property)).copied()
    }

    /// Every key's last written value.
    pub fn values(&self) -> &BTreeMap<PropertyKey, f64> {
        &self.values
    }

    /// Total successful writes.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl RenderSink for RecordingSink {
    fn set_property(
        &mut self,
        target: &TargetId,
        property: &PropertyName,
        value: f64,
    ) -> ReelResult<()> {
        if self.known.as_ref().is_some_and(|k| !k.contains(target)) {
            return Err(ReelError::missing_target(target.as_str()));
        }
        self.values.insert(
            PropertyKey {
                target: target.clone(),
                property: property.clone(),
            },
            value,
        );
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sink.rs"]
mod tests;

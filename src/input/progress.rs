use crate::{
    foundation::core::Progress,
    foundation::error::{ReelError, ReelResult},
};

/// Scalar position on the virtual scroll axis, fed by already-smoothed deltas.
///
/// Progress is always finite and clamped to `[0, extent]`; a non-finite input is dropped and
/// the previous value is kept.
#[derive(Clone, Debug)]
pub struct ProgressSource {
    extent: f64,
    current: Progress,
}

impl ProgressSource {
    /// Start at 0 on an axis of length `extent`.
    pub fn new(extent: f64) -> ReelResult<Self> {
        if !extent.is_finite() || extent <= 0.0 {
            return Err(ReelError::validation(format!(
                "progress extent must be finite and > 0, got {extent}"
            )));
        }
        Ok(Self {
            extent,
            current: Progress::ZERO,
        })
    }

    /// Apply one frame's smoothed delta.
    pub fn advance(&mut self, raw_delta: f64) -> Progress {
        if !raw_delta.is_finite() {
            let err = ReelError::NonFiniteProgress(raw_delta);
            tracing::warn!(error = %err, progress = self.current.0, "delta dropped");
            return self.current;
        }
        self.current = Progress(self.current.0 + raw_delta).clamp_to(self.extent);
        self.current
    }

    /// Jump to an absolute position.
    pub fn seek(&mut self, absolute: f64) -> Progress {
        if !absolute.is_finite() {
            let err = ReelError::NonFiniteProgress(absolute);
            tracing::warn!(error = %err, progress = self.current.0, "seek dropped");
            return self.current;
        }
        self.current = Progress(absolute).clamp_to(self.extent);
        self.current
    }

    /// Current progress.
    pub fn get(&self) -> Progress {
        self.current
    }

    /// Current progress mapped to `[0, 1]`.
    pub fn normalized(&self) -> f64 {
        self.current.0 / self.extent
    }

    /// Axis length `L`.
    pub fn extent(&self) -> f64 {
        self.extent
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/progress.rs"]
mod tests;

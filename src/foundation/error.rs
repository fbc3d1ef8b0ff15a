/// Convenience result alias used throughout the crate.
pub type ReelResult<T> = Result<T, ReelError>;

/// Error taxonomy for script construction and per-frame runtime failures.
///
/// Construction variants (`InvalidCueDefinition`, `InvalidScene`, `Validation`, `Serde`) are
/// fatal to startup. Runtime variants (`MissingRenderTarget`, `NonFiniteProgress`,
/// `EffectExecution`) are contained to a single write, frame, or effect.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Malformed or overlapping cue intervals.
    #[error("invalid cue definition: {0}")]
    InvalidCueDefinition(String),

    /// Scene ranges that do not partition the progress axis.
    #[error("invalid scene definition: {0}")]
    InvalidScene(String),

    /// Any other static validation failure (extent, geometry, builder input).
    #[error("validation error: {0}")]
    Validation(String),

    /// A render target referenced by a cue no longer exists.
    #[error("missing render target '{target}'")]
    MissingRenderTarget {
        /// Identifier of the vanished target.
        target: String,
    },

    /// Upstream delivered a NaN or infinite progress input.
    #[error("non-finite progress input: {0}")]
    NonFiniteProgress(f64),

    /// The side-effect executor failed for one effect.
    #[error("effect '{effect}' failed: {reason}")]
    EffectExecution {
        /// Token of the failing effect.
        effect: String,
        /// Executor-provided reason.
        reason: String,
    },

    /// Script (de)serialization error.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Opaque error from an embedding collaborator.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build an [`ReelError::InvalidCueDefinition`].
    pub fn invalid_cue(msg: impl Into<String>) -> Self {
        Self::InvalidCueDefinition(msg.into())
    }

    /// Build an [`ReelError::InvalidScene`].
    pub fn invalid_scene(msg: impl Into<String>) -> Self {
        Self::InvalidScene(msg.into())
    }

    /// Build a [`ReelError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::MissingRenderTarget`].
    pub fn missing_target(target: impl Into<String>) -> Self {
        Self::MissingRenderTarget {
            target: target.into(),
        }
    }

    /// Build a [`ReelError::EffectExecution`].
    pub fn effect(effect: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EffectExecution {
            effect: effect.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`ReelError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for errors that are contained to one frame and must never stop the loop.
    pub fn is_runtime(&self) -> bool {
        matches!(
            self,
            Self::MissingRenderTarget { .. }
                | Self::NonFiniteProgress(_)
                | Self::EffectExecution { .. }
        )
    }
}

impl From<serde_json::Error> for ReelError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

use crate::foundation::error::{ReelError, ReelResult};

/// Position on the shared virtual scroll axis, in script units.
///
/// Always finite. Values handed out by the engine are clamped to `[0, L]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Progress(pub f64);

impl Progress {
    /// The origin of the axis.
    pub const ZERO: Self = Self(0.0);

    /// Raw scalar value.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Clamp into `[0, extent]`.
    pub fn clamp_to(self, extent: f64) -> Self {
        Self(self.0.clamp(0.0, extent))
    }
}

impl From<f64> for Progress {
    fn from(v: f64) -> Self {
        Self(v)
    }
}

/// Direction of travel along the progress axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    /// Increasing progress (scrolling down the page).
    Forward,
    /// Decreasing progress (scrolling back up).
    Backward,
}

impl Direction {
    /// Direction implied by moving from `prev` to `next`, or `None` when stationary.
    pub fn of_travel(prev: Progress, next: Progress) -> Option<Self> {
        if next.0 > prev.0 {
            Some(Self::Forward)
        } else if next.0 < prev.0 {
            Some(Self::Backward)
        } else {
            None
        }
    }

    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Identifier of a render target (a DOM hook such as `#popup-3`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub String);

impl TargetId {
    /// Create a target id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Name of an animated property on a target (`opacity`, `y`, `scale`, ...).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PropertyName(pub String);

impl PropertyName {
    /// Create a property name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow as `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `(target, property)` pair that a resolved value is written to.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct PropertyKey {
    /// Render target.
    pub target: TargetId,
    /// Property on that target.
    pub property: PropertyName,
}

impl PropertyKey {
    /// Build a key from string-likes.
    pub fn new(target: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            target: TargetId::new(target),
            property: PropertyName::new(property),
        }
    }
}

impl std::fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.target.0, self.property.0)
    }
}

/// Half-open progress range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProgressRange {
    /// Inclusive start.
    pub start: Progress,
    /// Exclusive end.
    pub end: Progress,
}

impl ProgressRange {
    /// Create a validated, non-empty, finite range.
    pub fn new(start: f64, end: f64) -> ReelResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ReelError::validation("ProgressRange bounds must be finite"));
        }
        if start >= end {
            return Err(ReelError::validation("ProgressRange start must be < end"));
        }
        Ok(Self {
            start: Progress(start),
            end: Progress(end),
        })
    }

    /// Length of the range.
    pub fn len(self) -> f64 {
        self.end.0 - self.start.0
    }

    /// Return `true` when `p` is inside `[start, end)`.
    pub fn contains(self, p: Progress) -> bool {
        self.start.0 <= p.0 && p.0 < self.end.0
    }

    /// Position of `p` inside the range mapped to `[0, 1]`, clamped.
    pub fn local(self, p: Progress) -> f64 {
        ((p.0 - self.start.0) / self.len()).clamp(0.0, 1.0)
    }

    /// Point at normalized fraction `t` of the range.
    pub fn at(self, t: f64) -> f64 {
        self.start.0 + self.len() * t
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

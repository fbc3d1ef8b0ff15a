use crate::{
    animation::ease::{Ease, lerp},
    effects::effect::SideEffect,
    foundation::core::{Progress, PropertyKey, PropertyName, TargetId},
    foundation::error::{ReelError, ReelResult},
};

/// Declarative rule mapping a progress interval to an interpolated value on one target property.
///
/// Inside the closed interval `[start, end]` the value is `lerp(from, to, ease(t))`; before
/// `start` it holds `from`, after `end` it holds `to`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Cue {
    /// Interval start on the global progress axis.
    pub start: Progress,
    /// Interval end; must be strictly greater than `start`.
    pub end: Progress,
    /// Render target written by this cue.
    pub target: TargetId,
    /// Property on `target`.
    pub property: PropertyName,
    /// Value at and before `start`.
    pub from: f64,
    /// Value at and after `end`.
    pub to: f64,
    /// Easing applied to the normalized interval position.
    #[serde(default)]
    pub ease: Ease,
    /// Fired once when progress passes `end` moving forward.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_forward: Option<SideEffect>,
    /// Fired once when progress passes back below `start`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_backward: Option<SideEffect>,
    /// Allows this cue to overlap earlier cues on the same key (it wins inside the overlap).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub layered: bool,
}

impl Cue {
    /// Linear cue with no side effects.
    pub fn new(
        target: impl Into<String>,
        property: impl Into<String>,
        start: f64,
        end: f64,
        from: f64,
        to: f64,
    ) -> Self {
        Self {
            start: Progress(start),
            end: Progress(end),
            target: TargetId::new(target),
            property: PropertyName::new(property),
            from,
            to,
            ease: Ease::Linear,
            on_forward: None,
            on_backward: None,
            layered: false,
        }
    }

    /// Set the easing function.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Attach the effect fired when the cue completes moving forward.
    pub fn on_forward(mut self, effect: impl Into<String>) -> Self {
        self.on_forward = Some(SideEffect::new(effect));
        self
    }

    /// Attach the effect fired when the cue reverse-completes moving backward.
    pub fn on_backward(mut self, effect: impl Into<String>) -> Self {
        self.on_backward = Some(SideEffect::new(effect));
        self
    }

    /// Mark as deliberately layered over earlier cues on the same key.
    pub fn layered(mut self) -> Self {
        self.layered = true;
        self
    }

    /// The `(target, property)` this cue writes.
    pub fn key(&self) -> PropertyKey {
        PropertyKey {
            target: self.target.clone(),
            property: self.property.clone(),
        }
    }

    /// Closed-interval membership.
    pub fn contains(&self, p: Progress) -> bool {
        self.start.0 <= p.0 && p.0 <= self.end.0
    }

    /// `true` when the open interiors of `self` and `other` intersect.
    ///
    /// Touching intervals (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &Cue) -> bool {
        self.start.0.max(other.start.0) < self.end.0.min(other.end.0)
    }

    /// Value emitted at progress `p`. Exact `from` at `start` and exact `to` at `end`.
    pub fn sample(&self, p: Progress) -> f64 {
        if p.0 <= self.start.0 {
            return self.from;
        }
        if p.0 >= self.end.0 {
            return self.to;
        }
        let t = (p.0 - self.start.0) / (self.end.0 - self.start.0);
        lerp(self.from, self.to, self.ease.apply(t))
    }

    /// Check static invariants of this cue in isolation.
    pub fn validate(&self) -> ReelResult<()> {
        if self.target.0.trim().is_empty() {
            return Err(ReelError::invalid_cue("cue target must be non-empty"));
        }
        if self.property.0.trim().is_empty() {
            return Err(ReelError::invalid_cue(format!(
                "cue on '{}' has an empty property name",
                self.target.0
            )));
        }
        if !self.start.0.is_finite() || !self.end.0.is_finite() {
            return Err(ReelError::invalid_cue(format!(
                "cue '{}' has non-finite bounds",
                self.key()
            )));
        }
        if self.start.0 >= self.end.0 {
            return Err(ReelError::invalid_cue(format!(
                "cue '{}' must have start < end (got [{}, {}])",
                self.key(),
                self.start.0,
                self.end.0
            )));
        }
        if !self.from.is_finite() || !self.to.is_finite() {
            return Err(ReelError::invalid_cue(format!(
                "cue '{}' has non-finite from/to values",
                self.key()
            )));
        }
        for effect in [&self.on_forward, &self.on_backward].into_iter().flatten() {
            if effect.token().trim().is_empty() {
                return Err(ReelError::invalid_cue(format!(
                    "cue '{}' declares an empty side effect",
                    self.key()
                )));
            }
        }
        Ok(())
    }
}

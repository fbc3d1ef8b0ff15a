use std::collections::BTreeMap;

use crate::{
    animation::ease::Ease,
    effects::effect::SideEffect,
    foundation::core::{Progress, PropertyKey, PropertyName, TargetId},
    foundation::error::{ReelError, ReelResult},
    timeline::{cue::Cue, cue_timeline::CueTimeline},
};

/// Placement of a tween relative to what the builder has laid out so far.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    /// Start where the timeline currently ends.
    Append,
    /// Start `gap` units after the current end (negative values overlap backwards).
    AfterGap(f64),
    /// Start together with the previously added tween.
    WithPrevious,
    /// Start at an absolute builder-local time.
    At(f64),
}

/// One `to` tween: animate a property from its current value to `to`.
#[derive(Clone, Debug)]
pub struct Tween {
    target: String,
    property: String,
    to: f64,
    duration: f64,
    position: Position,
    ease: Ease,
    on_forward: Option<SideEffect>,
    on_backward: Option<SideEffect>,
}

impl Tween {
    /// Appended linear tween of `duration` builder units.
    pub fn new(
        target: impl Into<String>,
        property: impl Into<String>,
        to: f64,
        duration: f64,
    ) -> Self {
        Self {
            target: target.into(),
            property: property.into(),
            to,
            duration,
            position: Position::Append,
            ease: Ease::Linear,
            on_forward: None,
            on_backward: None,
        }
    }

    /// Place the tween.
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Set the easing function.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Effect fired when the tween completes moving forward.
    pub fn on_forward(mut self, effect: impl Into<String>) -> Self {
        self.on_forward = Some(SideEffect::new(effect));
        self
    }

    /// Effect fired when the tween reverse-completes moving backward.
    pub fn on_backward(mut self, effect: impl Into<String>) -> Self {
        self.on_backward = Some(SideEffect::new(effect));
        self
    }
}

/// Lays out relatively positioned tweens as explicit cue intervals.
///
/// Relative placement is resolved once, here; the resulting cues carry absolute bounds on the
/// shared progress axis and never depend on call order at runtime. Builder-local time `t` maps
/// to progress `origin + t * unit`.
pub struct TimelineBuilder {
    origin: f64,
    unit: f64,
    cursor: f64,
    prev_start: f64,
    current: BTreeMap<PropertyKey, f64>,
    cues: Vec<Cue>,
    error: Option<ReelError>,
}

impl TimelineBuilder {
    /// Start a builder whose local time 0 sits at progress `origin`.
    pub fn new(origin: f64, unit: f64) -> Self {
        let error = if !origin.is_finite() || !unit.is_finite() || unit <= 0.0 {
            Some(ReelError::validation(
                "timeline builder needs a finite origin and a finite unit > 0",
            ))
        } else {
            None
        };
        Self {
            origin,
            unit,
            cursor: 0.0,
            prev_start: 0.0,
            current: BTreeMap::new(),
            cues: Vec::new(),
            error,
        }
    }

    /// Declare the resting value of a property before any tween touches it.
    pub fn initial(
        mut self,
        target: impl Into<String>,
        property: impl Into<String>,
        value: f64,
    ) -> Self {
        self.current.insert(PropertyKey::new(target, property), value);
        self
    }

    /// Shorthand for an appended linear tween.
    pub fn to(
        self,
        target: impl Into<String>,
        property: impl Into<String>,
        to: f64,
        duration: f64,
    ) -> Self {
        self.tween(Tween::new(target, property, to, duration))
    }

    /// Add a tween.
    pub fn tween(mut self, tween: Tween) -> Self {
        if self.error.is_some() {
            return self;
        }
        match self.place(tween) {
            Ok(cue) => self.cues.push(cue),
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// Builder-local length laid out so far.
    pub fn duration(&self) -> f64 {
        self.cursor
    }

    /// Progress at which the laid-out tweens end.
    pub fn end(&self) -> f64 {
        self.origin + self.cursor * self.unit
    }

    /// Finish, returning cues in declaration order.
    ///
    /// Reports the first placement error, or any overlap the cue timeline would reject.
    pub fn build(self) -> ReelResult<Vec<Cue>> {
        if let Some(e) = self.error {
            return Err(e);
        }
        CueTimeline::new(self.cues.clone())?;
        Ok(self.cues)
    }

    fn place(&mut self, tween: Tween) -> ReelResult<Cue> {
        if !tween.duration.is_finite() || tween.duration <= 0.0 {
            return Err(ReelError::validation(format!(
                "tween on '{}.{}' needs a finite duration > 0",
                tween.target, tween.property
            )));
        }
        let start = match tween.position {
            Position::Append => self.cursor,
            Position::AfterGap(gap) => self.cursor + gap,
            Position::WithPrevious => self.prev_start,
            Position::At(t) => t,
        };
        if !start.is_finite() || start < 0.0 {
            return Err(ReelError::validation(format!(
                "tween on '{}.{}' would start before the builder origin",
                tween.target, tween.property
            )));
        }

        let key = PropertyKey::new(tween.target.clone(), tween.property.clone());
        let Some(&from) = self.current.get(&key) else {
            return Err(ReelError::validation(format!(
                "tween on '{key}' has no initial value; declare one with `initial`"
            )));
        };

        let end = start + tween.duration;
        self.prev_start = start;
        self.cursor = self.cursor.max(end);
        self.current.insert(key, tween.to);

        Ok(Cue {
            start: Progress(self.origin + start * self.unit),
            end: Progress(self.origin + end * self.unit),
            target: TargetId::new(tween.target),
            property: PropertyName::new(tween.property),
            from,
            to: tween.to,
            ease: tween.ease,
            on_forward: tween.on_forward,
            on_backward: tween.on_backward,
            layered: false,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/builder.rs"]
mod tests;

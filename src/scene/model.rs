use crate::{
    effects::effect::SideEffect,
    foundation::core::{Direction, ProgressRange},
    foundation::error::{ReelError, ReelResult},
};

/// Direction-aware effect lists attached to a scene's entry and exit.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneHooks {
    /// Run when the scene is entered moving forward.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enter_forward: Vec<SideEffect>,
    /// Run when the scene is re-entered moving backward.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enter_backward: Vec<SideEffect>,
    /// Run when the scene is left moving forward.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exit_forward: Vec<SideEffect>,
    /// Run when the scene is left moving backward.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exit_backward: Vec<SideEffect>,
}

impl SceneHooks {
    /// Entry effects for `direction`.
    pub fn on_enter(&self, direction: Direction) -> &[SideEffect] {
        match direction {
            Direction::Forward => &self.enter_forward,
            Direction::Backward => &self.enter_backward,
        }
    }

    /// Exit effects for `direction`.
    pub fn on_exit(&self, direction: Direction) -> &[SideEffect] {
        match direction {
            Direction::Forward => &self.exit_forward,
            Direction::Backward => &self.exit_backward,
        }
    }

    fn all(&self) -> impl Iterator<Item = &SideEffect> {
        self.enter_forward
            .iter()
            .chain(&self.enter_backward)
            .chain(&self.exit_forward)
            .chain(&self.exit_backward)
    }
}

/// Serializable scene declaration; ranges are laid out consecutively from 0.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneDef {
    /// Human-readable scene name (`beach`, `turtle`, ...).
    pub name: String,
    /// Length of the scene's progress range.
    pub length: f64,
    /// Trailing part of the range spent sliding to the next scene.
    #[serde(default)]
    pub transition_len: f64,
    /// Entry/exit effects.
    #[serde(default)]
    pub hooks: SceneHooks,
}

impl SceneDef {
    /// Scene without hooks or a transition window.
    pub fn new(name: impl Into<String>, length: f64) -> Self {
        Self {
            name: name.into(),
            length,
            transition_len: 0.0,
            hooks: SceneHooks::default(),
        }
    }

    /// Set the trailing transition window.
    pub fn transition(mut self, len: f64) -> Self {
        self.transition_len = len;
        self
    }

    /// Replace the hooks.
    pub fn hooks(mut self, hooks: SceneHooks) -> Self {
        self.hooks = hooks;
        self
    }
}

/// One full-viewport narrative segment placed on the progress axis.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Scene {
    /// Position in the scene chain.
    pub index: usize,
    /// Scene name.
    pub name: String,
    /// Half-open progress range `[start, end)`.
    pub range: ProgressRange,
    /// Fixed z-order, `N - index`.
    pub stack_order: usize,
    /// Trailing transition window length, `0 <= transition_len <= range.len()`.
    pub transition_len: f64,
    /// Entry/exit effects.
    pub hooks: SceneHooks,
}

impl Scene {
    /// Progress at which the transition to the next scene begins.
    pub fn transition_start(&self) -> f64 {
        self.range.end.0 - self.transition_len
    }

    /// Check this scene's own invariants.
    pub fn validate(&self) -> ReelResult<()> {
        if self.name.trim().is_empty() {
            return Err(ReelError::invalid_scene(format!(
                "scene #{} must have a name",
                self.index
            )));
        }
        if !self.transition_len.is_finite()
            || self.transition_len < 0.0
            || self.transition_len > self.range.len()
        {
            return Err(ReelError::invalid_scene(format!(
                "scene '{}' transition_len must be within [0, {}]",
                self.name,
                self.range.len()
            )));
        }
        if self.hooks.all().any(|e| e.token().trim().is_empty()) {
            return Err(ReelError::invalid_scene(format!(
                "scene '{}' declares an empty hook effect",
                self.name
            )));
        }
        Ok(())
    }
}

/// Lay `defs` out back to back from progress 0.
pub fn layout_scenes(defs: &[SceneDef]) -> ReelResult<Vec<Scene>> {
    let n = defs.len();
    let mut cursor = 0.0;
    let mut out = Vec::with_capacity(n);
    for (index, def) in defs.iter().enumerate() {
        if !def.length.is_finite() || def.length <= 0.0 {
            return Err(ReelError::invalid_scene(format!(
                "scene '{}' length must be finite and > 0",
                def.name
            )));
        }
        let range = ProgressRange::new(cursor, cursor + def.length)
            .map_err(|e| ReelError::invalid_scene(format!("scene '{}': {e}", def.name)))?;
        cursor = range.end.0;
        out.push(Scene {
            index,
            name: def.name.clone(),
            range,
            stack_order: n - index,
            transition_len: def.transition_len,
            hooks: def.hooks.clone(),
        });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;

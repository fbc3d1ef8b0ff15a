use std::time::Duration;

use crate::{
    foundation::error::{ReelError, ReelResult},
    input::resize::DEFAULT_RESIZE_DEBOUNCE,
    scene::machine::SceneStateMachine,
    scene::model::{SceneDef, layout_scenes},
    timeline::{cue::Cue, cue_timeline::CueTimeline},
};

fn default_resize_debounce_ms() -> u64 {
    DEFAULT_RESIZE_DEBOUNCE.as_millis() as u64
}

/// Serializable description of one scroll story: scenes, cues and resize behavior.
///
/// The progress axis length is the sum of scene lengths; `extent` may be given explicitly and
/// must then agree with it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Script {
    /// Explicit axis length `L`; derived from the scenes when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<f64>,
    /// Scenes in chain order.
    pub scenes: Vec<SceneDef>,
    /// Cues in declaration order.
    #[serde(default)]
    pub cues: Vec<Cue>,
    /// Quiet period before a resize burst triggers a geometry recompute.
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
}

/// A validated script, indexed for per-frame evaluation.
#[derive(Clone, Debug)]
pub struct CompiledScript {
    /// Scene chain at rest in scene 0.
    pub machine: SceneStateMachine,
    /// Indexed cues.
    pub timeline: CueTimeline,
    /// Axis length `L`.
    pub extent: f64,
    /// Resize debounce window.
    pub resize_debounce: Duration,
}

impl Script {
    /// Script with the default resize debounce.
    pub fn new(scenes: Vec<SceneDef>, cues: Vec<Cue>) -> Self {
        Self {
            extent: None,
            scenes,
            cues,
            resize_debounce_ms: default_resize_debounce_ms(),
        }
    }

    /// Axis length implied by the scene lengths.
    pub fn scene_extent(&self) -> f64 {
        self.scenes.iter().map(|s| s.length).sum()
    }

    /// Validate everything and build the runtime structures.
    pub fn compile(&self) -> ReelResult<CompiledScript> {
        let scenes = layout_scenes(&self.scenes)?;
        let machine = SceneStateMachine::new(scenes)?;
        let extent = machine.extent();

        if let Some(declared) = self.extent {
            let tolerance = 1e-9 * extent.max(1.0);
            if !declared.is_finite() || (declared - extent).abs() > tolerance {
                return Err(ReelError::invalid_scene(format!(
                    "declared extent {declared} does not match the scene total {extent}"
                )));
            }
        }

        for (i, cue) in self.cues.iter().enumerate() {
            if cue.start.0 < 0.0 || cue.end.0 > extent {
                return Err(ReelError::invalid_cue(format!(
                    "cue #{i} on '{}' [{}, {}] leaves the progress axis [0, {extent}]",
                    cue.key(),
                    cue.start.0,
                    cue.end.0
                )));
            }
        }
        let timeline = CueTimeline::new(self.cues.clone())?;

        Ok(CompiledScript {
            machine,
            timeline,
            extent,
            resize_debounce: Duration::from_millis(self.resize_debounce_ms),
        })
    }

    /// Fail fast on any construction error.
    pub fn validate(&self) -> ReelResult<()> {
        self.compile().map(|_| ())
    }

    /// Parse a script from JSON. Does not validate.
    pub fn from_json(s: &str) -> ReelResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parse a script from a reader. Does not validate.
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        Ok(serde_json::from_reader(r)?)
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> ReelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/model.rs"]
mod tests;

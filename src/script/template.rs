use crate::{
    animation::ease::Ease,
    effects::effect::SideEffect,
    foundation::error::{ReelError, ReelResult},
    scene::model::{SceneDef, SceneHooks},
    timeline::cue::Cue,
};

/// Share of the content block used by each element, as `(start, end)` fractions.
const OVERLAY_SPAN: (f64, f64) = (0.0, 0.3);
const POPUP_SPAN: (f64, f64) = (0.2, 0.6);
const CAPTION_SPAN: (f64, f64) = (0.4, 1.0);

/// Popup slide distance in pixels.
const POPUP_OFFSET_PX: f64 = 40.0;

/// One parameterized scene block: background swap, overlay fade-in, popup slide, typewriter
/// caption and bottle phase.
///
/// The content block runs from `lead` into the scene up to the start of its transition window.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneTemplate {
    name: String,
    asset: String,
    length: f64,
    transition_len: f64,
    lead: f64,
    caption_chars: Option<u32>,
    caption_reset: Option<SideEffect>,
    bottle: Option<SideEffect>,
}

impl SceneTemplate {
    pub fn new(name: impl Into<String>, asset: impl Into<String>, length: f64) -> Self {
        Self {
            name: name.into(),
            asset: asset.into(),
            length,
            transition_len: 0.0,
            lead: 0.0,
            caption_chars: None,
            caption_reset: None,
            bottle: None,
        }
    }

    /// Trailing window spent sliding into the next scene.
    pub fn transition(mut self, len: f64) -> Self {
        self.transition_len = len;
        self
    }

    /// Delay before the content block starts, for scenes that open with something else.
    pub fn lead(mut self, lead: f64) -> Self {
        self.lead = lead;
        self
    }

    /// Reveal a caption of `chars` characters.
    pub fn caption(mut self, chars: u32) -> Self {
        self.caption_chars = Some(chars);
        self
    }

    /// Effect fired when the caption reveal is rewound past its start.
    pub fn on_caption_reset(mut self, effect: impl Into<String>) -> Self {
        self.caption_reset = Some(SideEffect::new(effect));
        self
    }

    /// Bottle phase effect run on entry from either direction.
    pub fn bottle(mut self, effect: SideEffect) -> Self {
        self.bottle = Some(effect);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Produce the scene declaration and its cues for chain position `index` starting at
    /// progress `origin`.
    pub fn instantiate(&self, index: usize, origin: f64) -> ReelResult<(SceneDef, Vec<Cue>)> {
        let block_start = origin + self.lead;
        let block_len = self.length - self.lead - self.transition_len;
        if !block_len.is_finite() || block_len <= 0.0 || self.lead < 0.0 {
            return Err(ReelError::invalid_scene(format!(
                "scene '{}' leaves no room for its content block",
                self.name
            )));
        }
        let at = |(a, b): (f64, f64)| (block_start + a * block_len, block_start + b * block_len);

        let mut enter = vec![SideEffect::new(format!("scene:bg={}", self.asset))];
        enter.extend(self.bottle.clone());
        enter.push(SideEffect::new(format!("popup:show={index}")));
        let hooks = SceneHooks {
            enter_forward: enter.clone(),
            enter_backward: enter,
            exit_forward: Vec::new(),
            exit_backward: vec![SideEffect::new(format!("popup:hide={index}"))],
        };
        let def = SceneDef::new(self.name.clone(), self.length)
            .transition(self.transition_len)
            .hooks(hooks);

        let (s, e) = at(OVERLAY_SPAN);
        let mut cues = vec![
            Cue::new(format!("#overlay-{}", self.name), "opacity", s, e, 0.0, 1.0)
                .ease(Ease::OutQuad),
        ];
        let (s, e) = at(POPUP_SPAN);
        cues.push(
            Cue::new(format!("#popup-{index}"), "y", s, e, POPUP_OFFSET_PX, 0.0)
                .ease(Ease::OutCubic),
        );
        cues.push(Cue::new(format!("#popup-{index}"), "opacity", s, e, 0.0, 1.0));
        if let Some(chars) = self.caption_chars {
            let (s, e) = at(CAPTION_SPAN);
            let mut cue = Cue::new(
                format!("#caption-{}", self.name),
                "chars",
                s,
                e,
                0.0,
                f64::from(chars),
            );
            cue.on_backward = self.caption_reset.clone();
            cues.push(cue);
        }
        Ok((def, cues))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/template.rs"]
mod tests;

//! The built-in ocean story: a soda bottle drifting from the beach to the open sea.

use crate::{
    animation::ease::Ease,
    effects::effect::SideEffect,
    foundation::error::ReelResult,
    script::{model::Script, template::SceneTemplate},
    timeline::builder::{Position, TimelineBuilder, Tween},
};

/// Scene names and background assets, in chain order.
pub const SCENES: [(&str, &str); 11] = [
    ("beach", "beach.jpg"),
    ("trash", "trash.jpg"),
    ("turtle", "turtle.jpg"),
    ("crab", "crab.jpg"),
    ("jellyfish", "jellyfish.jpg"),
    ("shark", "shark.jpg"),
    ("fishes", "fishes.jpg"),
    ("coral", "coral.jpg"),
    ("blank", "blank.jpg"),
    ("finale", "finale.jpg"),
    ("blue", "blue.jpg"),
];

/// Scenes from this index on show no bottle at all.
pub const BOTTLE_CLEAR_FROM: usize = 9;

const INTRO_LEN: f64 = 3.0;
const INTRO_LOCAL_LEN: f64 = 8.5;
const BEACH_LEN: f64 = 4.0;
const SCENE_LEN: f64 = 1.0;
const TRANSITION_LEN: f64 = 0.35;
const CAPTION_CHARS: u32 = 64;

/// Bottle phase for a scene: the first two share phase 0, later ones step one phase per
/// scene, and the closing scenes clear the bottle.
pub fn bottle_phase(scene: usize) -> SideEffect {
    if scene >= BOTTLE_CLEAR_FROM {
        return SideEffect::new("soda:clear");
    }
    let phase = scene.saturating_sub(1);
    SideEffect::new(format!("soda:phase={phase}"))
}

/// Title sequence pinned over the start of the beach scene: three words fade in and out, the
/// last one zooms to 8x while the intro overlay fades away.
pub fn intro_builder() -> TimelineBuilder {
    TimelineBuilder::new(0.0, INTRO_LEN / INTRO_LOCAL_LEN)
        .initial(".w1", "opacity", 0.0)
        .initial(".w2", "opacity", 0.0)
        .initial(".w3", "opacity", 0.0)
        .initial(".w3", "scale", 1.0)
        .initial(".intro-overlay", "opacity", 1.0)
        .to(".w1", "opacity", 1.0, 1.0)
        .tween(Tween::new(".w1", "opacity", 0.0, 1.0).at(Position::AfterGap(0.5)))
        .to(".w2", "opacity", 1.0, 1.0)
        .tween(Tween::new(".w2", "opacity", 0.0, 1.0).at(Position::AfterGap(0.5)))
        .to(".w3", "opacity", 1.0, 1.0)
        .tween(
            Tween::new(".w3", "scale", 8.0, 2.0)
                .at(Position::AfterGap(0.5))
                .ease(Ease::InQuad),
        )
        .tween(Tween::new(".w3", "opacity", 0.0, 2.0).at(Position::WithPrevious))
        .tween(Tween::new(".intro-overlay", "opacity", 0.0, 2.0).at(Position::WithPrevious))
}

/// One template per scene, in chain order.
pub fn templates() -> Vec<SceneTemplate> {
    SCENES
        .iter()
        .enumerate()
        .map(|(index, &(name, asset))| {
            let last = index + 1 == SCENES.len();
            let length = if index == 0 { BEACH_LEN } else { SCENE_LEN };
            let mut t = SceneTemplate::new(name, asset, length)
                .bottle(bottle_phase(index))
                .caption(CAPTION_CHARS);
            if index == 0 {
                t = t.lead(INTRO_LEN);
            }
            if !last {
                t = t.transition(TRANSITION_LEN);
            }
            if name == "finale" {
                t = t.on_caption_reset("finale:clear-text");
            }
            t
        })
        .collect()
}

/// The complete 11-scene ocean script.
pub fn ocean_script() -> ReelResult<Script> {
    let mut cues = intro_builder().build()?;
    let mut scenes = Vec::with_capacity(SCENES.len());
    let mut origin = 0.0;
    for (index, template) in templates().iter().enumerate() {
        let (def, scene_cues) = template.instantiate(index, origin)?;
        origin += def.length;
        scenes.push(def);
        cues.extend(scene_cues);
    }
    Ok(Script::new(scenes, cues))
}

#[cfg(test)]
#[path = "../../tests/unit/script/narrative.rs"]
mod tests;

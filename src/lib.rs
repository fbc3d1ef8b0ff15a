//! Scrollreel is a scroll-driven sequencing engine for scrollytelling pages.
//!
//! A single progress value on a virtual scroll axis drives everything:
//!
//! - Declarative [`Cue`]s resolve to property values through a [`CueTimeline`]
//! - A [`SceneStateMachine`] walks a linear chain of full-viewport scenes
//! - A [`SideEffectDispatcher`] fires discrete, direction-aware actions exactly once per
//!   crossing
//!
//! [`ScrollEngine`] owns one of each and runs them in a fixed per-frame order against injected
//! [`RenderSink`], [`EffectExecutor`] and [`GeometryProvider`] collaborators.
#![forbid(unsafe_code)]

pub(crate) mod animation;
pub(crate) mod effects;
pub(crate) mod foundation;
pub(crate) mod input;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod script;
pub(crate) mod session;
pub(crate) mod timeline;

pub use crate::foundation::core::{
    Direction, Progress, ProgressRange, PropertyKey, PropertyName, TargetId,
};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::animation::ease::{Ease, lerp};
pub use crate::effects::dispatch::{
    DispatchReport, EffectExecutor, FireOutcome, LatchId, SideEffectDispatcher,
};
pub use crate::effects::effect::SideEffect;
pub use crate::effects::executor::{RecordingExecutor, TracingExecutor};
pub use crate::input::progress::ProgressSource;
pub use crate::input::resize::{DEFAULT_RESIZE_DEBOUNCE, ResizeDebouncer};
pub use crate::render::geometry::{FixedGeometry, GeometryProvider, PixelMap, ScrollGeometry};
pub use crate::render::sink::{RecordingSink, RenderSink};
pub use crate::scene::machine::{
    BoundaryCrossing, SceneStateMachine, SceneStep, SceneTransitionState,
};
pub use crate::scene::model::{Scene, SceneDef, SceneHooks, layout_scenes};
pub use crate::script::model::{CompiledScript, Script};
pub use crate::script::template::SceneTemplate;
pub use crate::session::engine::{SCENE_OFFSET_PROPERTY, ScrollEngine, scene_target};
pub use crate::session::report::{CrossingKind, FrameCrossing, FrameReport};
pub use crate::timeline::builder::{Position, TimelineBuilder, Tween};
pub use crate::timeline::cue::Cue;
pub use crate::timeline::cue_timeline::{CueCrossing, CueTimeline, ResolvedValues};
pub use crate::timeline::fingerprint::{ValuesFingerprint, fingerprint_values};

/// The built-in ocean story.
pub mod narrative {
    pub use crate::script::narrative::{
        BOTTLE_CLEAR_FROM, SCENES, bottle_phase, intro_builder, ocean_script, templates,
    };
}

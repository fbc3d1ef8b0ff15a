use std::time::Duration;

use crate::{
    effects::dispatch::{DispatchReport, EffectExecutor, LatchId, SideEffectDispatcher},
    effects::effect::SideEffect,
    foundation::core::{Direction, Progress, PropertyName, TargetId},
    foundation::error::{ReelError, ReelResult},
    input::{progress::ProgressSource, resize::ResizeDebouncer},
    render::geometry::{GeometryProvider, PixelMap},
    render::sink::RenderSink,
    scene::machine::{BoundaryCrossing, SceneStateMachine, SceneTransitionState},
    script::model::Script,
    session::report::{CrossingKind, FrameCrossing, FrameReport},
    timeline::cue_timeline::{CueCrossing, CueTimeline},
    timeline::fingerprint::fingerprint_values,
};

/// Property written on every scene target with its stacking offset in pixels.
pub const SCENE_OFFSET_PROPERTY: &str = "y";

/// Render target carrying a scene's stacking offset.
pub fn scene_target(name: &str) -> TargetId {
    TargetId::new(format!("#scene-{name}"))
}

enum Pending<'a> {
    Boundary(&'a BoundaryCrossing),
    Cue(&'a CueCrossing),
}

impl Pending<'_> {
    fn at(&self) -> f64 {
        match self {
            Self::Boundary(b) => b.at.0,
            Self::Cue(c) => c.at.0,
        }
    }
}

#[derive(Default)]
struct WriteTally {
    writes: u32,
    missing: u32,
    failed: u32,
}

impl WriteTally {
    fn record(&mut self, target: &TargetId, property: &PropertyName, result: ReelResult<()>) {
        match result {
            Ok(()) => self.writes += 1,
            Err(err @ ReelError::MissingRenderTarget { .. }) => {
                tracing::warn!(
                    render_target = target.as_str(),
                    property = property.as_str(),
                    error = %err,
                    "write skipped"
                );
                self.missing += 1;
            }
            Err(err) => {
                tracing::warn!(
                    render_target = target.as_str(),
                    property = property.as_str(),
                    error = %err,
                    "write failed"
                );
                self.failed += 1;
            }
        }
    }
}

/// Frame-driven sequencing engine for one script.
///
/// Each frame runs, in order: progress update, cue resolution, sink writes, scene step,
/// side-effect dispatch in progress order, then the debounced resize check. Runtime failures
/// are logged and counted in the [`FrameReport`]; they never abort a frame.
pub struct ScrollEngine<S, E, G> {
    timeline: CueTimeline,
    machine: SceneStateMachine,
    progress: ProgressSource,
    dispatcher: SideEffectDispatcher<E>,
    sink: S,
    geometry: G,
    pixels: PixelMap,
    resize: ResizeDebouncer,
    scene_targets: Vec<TargetId>,
    frame: u64,
}

impl<S, E, G> ScrollEngine<S, E, G>
where
    S: RenderSink,
    E: EffectExecutor,
    G: GeometryProvider,
{
    /// Validate `script`, query the initial geometry and rest at progress 0.
    pub fn new(script: &Script, sink: S, executor: E, mut geometry: G) -> ReelResult<Self> {
        let compiled = script.compile()?;
        let pixels = PixelMap::new(geometry.geometry()?, compiled.machine.len())?;
        let scene_targets = compiled
            .machine
            .scenes()
            .iter()
            .map(|s| scene_target(&s.name))
            .collect();
        tracing::debug!(
            extent = compiled.extent,
            scenes = compiled.machine.len(),
            cues = compiled.timeline.len(),
            "engine ready"
        );
        Ok(Self {
            progress: ProgressSource::new(compiled.extent)?,
            timeline: compiled.timeline,
            machine: compiled.machine,
            dispatcher: SideEffectDispatcher::new(executor),
            sink,
            geometry,
            pixels,
            resize: ResizeDebouncer::new(compiled.resize_debounce),
            scene_targets,
            frame: 0,
        })
    }

    /// Render the resting frame and run the first scene's forward entry hooks.
    ///
    /// Entry hooks share the latch of boundary 0, so calling this twice runs them once.
    pub fn start(&mut self, now: Duration) -> FrameReport {
        let at = self.progress.get();
        let mut report = self.render(at, at, now);
        let first = self.machine.scenes()[0].hooks.enter_forward.clone();
        report.effects.merge(
            self.dispatcher
                .fire_all(LatchId::Boundary(0), &first, Direction::Forward),
        );
        report
    }

    /// Advance by one frame's smoothed delta.
    #[tracing::instrument(level = "debug", skip(self), fields(frame = self.frame))]
    pub fn tick(&mut self, raw_delta: f64, now: Duration) -> FrameReport {
        let prev = self.progress.get();
        let next = self.progress.advance(raw_delta);
        self.render(prev, next, now)
    }

    /// Jump to an absolute progress value; crossings in between still fire in order.
    #[tracing::instrument(level = "debug", skip(self), fields(frame = self.frame))]
    pub fn seek(&mut self, progress: f64, now: Duration) -> FrameReport {
        let prev = self.progress.get();
        let next = self.progress.seek(progress);
        self.render(prev, next, now)
    }

    /// Record a viewport resize; the geometry is re-queried once the burst settles.
    pub fn notify_resize(&mut self, now: Duration) {
        self.resize.notify(now);
    }

    /// Current progress.
    pub fn progress(&self) -> Progress {
        self.progress.get()
    }

    /// Current scene state.
    pub fn state(&self) -> SceneTransitionState {
        self.machine.state()
    }

    /// Scene chain.
    pub fn machine(&self) -> &SceneStateMachine {
        &self.machine
    }

    /// Cue timeline.
    pub fn timeline(&self) -> &CueTimeline {
        &self.timeline
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn executor(&self) -> &E {
        self.dispatcher.executor()
    }

    pub fn executor_mut(&mut self) -> &mut E {
        self.dispatcher.executor_mut()
    }

    pub fn geometry_provider_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    /// Page scroll offset in pixels for the current progress.
    pub fn scroll_offset_px(&self) -> f64 {
        let p = self.progress.get();
        let scene = self.machine.scene_at(p);
        let local = self.machine.scenes()[scene].range.local(p);
        self.pixels.scroll_offset(scene, local)
    }

    /// Stacking offset of every scene in pixels.
    pub fn stack_offsets_px(&self) -> Vec<f64> {
        self.machine
            .stack_offsets()
            .into_iter()
            .map(|v| self.pixels.stack_offset_px(v))
            .collect()
    }

    fn render(&mut self, prev: Progress, next: Progress, now: Duration) -> FrameReport {
        let values = self.timeline.resolve(next);
        let mut tally = WriteTally::default();
        for (key, value) in &values {
            let result = self.sink.set_property(&key.target, &key.property, *value);
            tally.record(&key.target, &key.property, result);
        }

        let step = self.machine.step(next);
        let offset_property = PropertyName::new(SCENE_OFFSET_PROPERTY);
        for (target, units) in self.scene_targets.iter().zip(self.machine.stack_offsets()) {
            let px = self.pixels.stack_offset_px(units);
            let result = self.sink.set_property(target, &offset_property, px);
            tally.record(target, &offset_property, result);
        }

        let cue_crossings = self.timeline.crossings(prev, next);
        let (crossings, effects) = match Direction::of_travel(prev, next) {
            Some(direction) => self.dispatch(direction, &step.crossings, &cue_crossings),
            None => (Vec::new(), DispatchReport::default()),
        };

        let resized = self.poll_resize(now);

        let report = FrameReport {
            frame: self.frame,
            progress: next,
            normalized: self.progress.normalized(),
            state: step.state,
            crossings,
            effects,
            writes: tally.writes,
            missing_targets: tally.missing,
            failed_writes: tally.failed,
            resized,
            fingerprint: fingerprint_values(&values),
        };
        self.frame += 1;
        report
    }

    /// Merge scene and cue crossings in travel order and fire them.
    ///
    /// Both inputs are already sorted in travel order. On equal positions scene hooks go
    /// first; cues keep declaration order among themselves.
    fn dispatch(
        &mut self,
        direction: Direction,
        scenes: &[BoundaryCrossing],
        cues: &[CueCrossing],
    ) -> (Vec<FrameCrossing>, DispatchReport) {
        let mut pending = Vec::with_capacity(scenes.len() + cues.len());
        let (mut si, mut ci) = (0, 0);
        while si < scenes.len() || ci < cues.len() {
            let take_scene = match (scenes.get(si), cues.get(ci)) {
                (Some(s), Some(c)) => match direction {
                    Direction::Forward => s.at.0 <= c.at.0,
                    Direction::Backward => s.at.0 >= c.at.0,
                },
                (Some(_), None) => true,
                _ => false,
            };
            if take_scene {
                pending.push(Pending::Boundary(&scenes[si]));
                si += 1;
            } else {
                pending.push(Pending::Cue(&cues[ci]));
                ci += 1;
            }
        }

        let mut report = DispatchReport::default();
        let mut crossings = Vec::with_capacity(pending.len());
        for item in pending {
            let at = Progress(item.at());
            match item {
                Pending::Boundary(b) => {
                    tracing::debug!(
                        from = b.from,
                        to = b.to,
                        at = b.at.0,
                        ?direction,
                        "scene boundary"
                    );
                    let effects = self.boundary_effects(b);
                    let latch = LatchId::Boundary(b.boundary());
                    report.merge(self.dispatcher.fire_all(latch, &effects, direction));
                    crossings.push(FrameCrossing {
                        at,
                        direction,
                        kind: CrossingKind::Scene {
                            from: b.from,
                            to: b.to,
                        },
                    });
                }
                Pending::Cue(c) => {
                    tracing::debug!(cue = c.cue, at = c.at.0, ?direction, "cue threshold");
                    let effects = c.effect.as_slice();
                    report.merge(self.dispatcher.fire_all(c.latch, effects, direction));
                    crossings.push(FrameCrossing {
                        at,
                        direction,
                        kind: CrossingKind::Cue { index: c.cue },
                    });
                }
            }
        }
        (crossings, report)
    }

    /// Exit hooks of the scene left, then entry hooks of the scene entered.
    fn boundary_effects(&self, crossing: &BoundaryCrossing) -> Vec<SideEffect> {
        let scenes = self.machine.scenes();
        let left = scenes[crossing.from].hooks.on_exit(crossing.direction);
        let entered = scenes[crossing.to].hooks.on_enter(crossing.direction);
        left.iter().chain(entered).cloned().collect()
    }

    fn poll_resize(&mut self, now: Duration) -> bool {
        if !self.resize.poll(now) {
            return false;
        }
        let recomputed = self
            .geometry
            .geometry()
            .and_then(|g| PixelMap::new(g, self.machine.len()));
        match recomputed {
            Ok(pixels) => {
                tracing::debug!(
                    viewport_height = pixels.geometry().viewport_height,
                    "geometry recomputed"
                );
                self.pixels = pixels;
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "resize ignored; keeping previous geometry");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;

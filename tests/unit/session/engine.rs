use super::*;
use crate::{
    effects::executor::RecordingExecutor,
    render::geometry::{FixedGeometry, ScrollGeometry},
    render::sink::RecordingSink,
    scene::model::{SceneDef, SceneHooks},
    timeline::cue::Cue,
};

type TestEngine = ScrollEngine<RecordingSink, RecordingExecutor, FixedGeometry>;

fn fx(tokens: &[&str]) -> Vec<SideEffect> {
    tokens.iter().map(|t| SideEffect::new(*t)).collect()
}

fn script() -> Script {
    let a = SceneDef::new("a", 100.0).transition(20.0).hooks(SceneHooks {
        enter_forward: fx(&["a:enter-f"]),
        enter_backward: fx(&["a:enter-b"]),
        exit_forward: fx(&["a:exit-f"]),
        exit_backward: Vec::new(),
    });
    let b = SceneDef::new("b", 100.0).transition(20.0).hooks(SceneHooks {
        enter_forward: fx(&["b:enter-f"]),
        enter_backward: fx(&["b:enter-b"]),
        exit_forward: fx(&["b:exit-f"]),
        exit_backward: fx(&["b:exit-b"]),
    });
    let c = SceneDef::new("c", 100.0).hooks(SceneHooks {
        enter_forward: fx(&["c:enter-f"]),
        exit_backward: fx(&["c:exit-b"]),
        ..SceneHooks::default()
    });
    let cues = vec![
        Cue::new("#x", "opacity", 40.0, 60.0, 0.0, 1.0)
            .on_forward("x:done")
            .on_backward("x:undone"),
    ];
    Script::new(vec![a, b, c], cues)
}

fn engine_with(script: &Script, sink: RecordingSink, exec: RecordingExecutor) -> TestEngine {
    let geometry = FixedGeometry::new(ScrollGeometry::uniform(script.scenes.len(), 800.0));
    ScrollEngine::new(script, sink, exec, geometry).unwrap()
}

fn engine() -> TestEngine {
    engine_with(&script(), RecordingSink::new(), RecordingExecutor::new())
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn sweep(engine: &mut TestEngine, delta: f64, frames: usize) {
    for _ in 0..frames {
        engine.tick(delta, Duration::ZERO);
    }
}

#[test]
fn start_runs_first_entry_hooks_once() {
    let mut e = engine();
    let report = e.start(Duration::ZERO);
    assert_eq!(report.effects.executed, 1);
    e.start(Duration::ZERO);
    assert_eq!(e.executor().tokens(), vec!["a:enter-f"]);
    assert_eq!(e.state(), SceneTransitionState::Resting(0));
}

#[test]
fn forward_then_backward_sweep_fires_each_pair_once() {
    let mut e = engine();
    sweep(&mut e, 7.0, 60);
    assert_eq!(e.progress(), Progress(300.0));
    assert_eq!(
        e.executor().tokens(),
        vec!["x:done", "a:exit-f", "b:enter-f", "b:exit-f", "c:enter-f"]
    );

    e.executor_mut().clear();
    sweep(&mut e, -7.0, 60);
    assert_eq!(e.progress(), Progress::ZERO);
    assert_eq!(
        e.executor().tokens(),
        vec!["c:exit-b", "b:enter-b", "b:exit-b", "a:enter-b", "x:undone"]
    );

    // Reversing again re-arms every forward action.
    e.executor_mut().clear();
    sweep(&mut e, 13.0, 30);
    assert_eq!(e.executor().count("x:done"), 1);
    assert_eq!(e.executor().count("c:enter-f"), 1);
}

#[test]
fn stationary_frames_fire_nothing() {
    let mut e = engine();
    e.seek(150.0, Duration::ZERO);
    let before = e.executor().log().len();
    let report = e.tick(0.0, Duration::ZERO);
    assert!(report.crossings.is_empty());
    assert_eq!(e.executor().log().len(), before);
}

#[test]
fn seek_walks_every_crossing_in_order() {
    let mut e = engine();
    let report = e.seek(250.0, Duration::ZERO);
    let kinds: Vec<CrossingKind> = report.crossings.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            CrossingKind::Cue { index: 0 },
            CrossingKind::Scene { from: 0, to: 1 },
            CrossingKind::Scene { from: 1, to: 2 },
        ]
    );
    assert_eq!(report.state, SceneTransitionState::Resting(2));
    assert_eq!(report.effects.executed, 5);
}

#[test]
fn scene_hooks_precede_cues_at_the_same_position() {
    let mut s = script();
    s.cues.push(
        Cue::new("#y", "y", 100.0, 140.0, 0.0, 1.0)
            .on_backward("y:rewound")
            .on_forward("y:done"),
    );
    s.cues.push(Cue::new("#z", "y", 80.0, 100.0, 0.0, 1.0).on_forward("z:done"));
    let mut e = engine_with(&s, RecordingSink::new(), RecordingExecutor::new());

    e.seek(90.0, Duration::ZERO);
    e.executor_mut().clear();
    e.seek(110.0, Duration::ZERO);
    assert_eq!(e.executor().tokens(), vec!["a:exit-f", "b:enter-f", "z:done"]);

    e.executor_mut().clear();
    e.seek(95.0, Duration::ZERO);
    assert_eq!(e.executor().tokens(), vec!["b:exit-b", "a:enter-b", "y:rewound"]);
}

#[test]
fn resize_during_transition_keeps_logical_state() {
    let mut e = engine();
    e.seek(90.0, Duration::ZERO);
    let state = e.state();
    assert!(matches!(state, SceneTransitionState::Transitioning { from: 0, to: 1, .. }));

    e.notify_resize(ms(1_000));
    e.geometry_provider_mut().set(ScrollGeometry::uniform(3, 400.0));
    assert!(!e.tick(0.0, ms(1_100)).resized);
    e.notify_resize(ms(1_120));
    assert!(!e.tick(0.0, ms(1_200)).resized);

    let report = e.tick(0.0, ms(1_300));
    assert!(report.resized);
    assert_eq!(report.progress, Progress(90.0));
    assert_eq!(report.state, state);
    assert_eq!(e.stack_offsets_px(), vec![-200.0, 200.0, 400.0]);
    assert_eq!(e.scroll_offset_px(), 360.0);
}

#[test]
fn scene_offsets_are_written_in_pixels() {
    let mut e = engine();
    e.seek(150.0, Duration::ZERO);
    assert_eq!(e.sink().get("#scene-a", "y"), Some(-800.0));
    assert_eq!(e.sink().get("#scene-b", "y"), Some(0.0));
    assert_eq!(e.sink().get("#scene-c", "y"), Some(800.0));
    assert_eq!(e.sink().get("#x", "opacity"), Some(1.0));
}

#[test]
fn missing_targets_are_skipped_and_counted() {
    let sink = RecordingSink::with_targets(["#scene-a", "#scene-b", "#scene-c"]);
    let mut e = engine_with(&script(), sink, RecordingExecutor::new());
    let report = e.seek(70.0, Duration::ZERO);
    assert_eq!(report.missing_targets, 1);
    assert_eq!(report.writes, 3);
    assert_eq!(e.executor().tokens(), vec!["x:done"]);
}

#[test]
fn failing_effects_do_not_stop_the_frame() {
    let exec = RecordingExecutor::new().fail_namespace("a");
    let mut e = engine_with(&script(), RecordingSink::new(), exec);
    let report = e.seek(150.0, Duration::ZERO);
    assert_eq!(report.effects.failed, 1);
    assert_eq!(report.effects.executed, 2);
    assert_eq!(e.executor().tokens(), vec!["x:done", "b:enter-f"]);
    // The failed crossing still latched; the opposite direction stays armed.
    e.seek(50.0, Duration::ZERO);
    assert_eq!(e.executor().count("b:exit-b"), 1);
}

#[test]
fn non_finite_delta_keeps_progress() {
    let mut e = engine();
    e.seek(30.0, Duration::ZERO);
    let report = e.tick(f64::NAN, Duration::ZERO);
    assert_eq!(report.progress, Progress(30.0));
    assert!(report.crossings.is_empty());
}

#[test]
fn resolution_does_not_depend_on_path() {
    let mut stepped = engine();
    sweep(&mut stepped, 3.5, 20);
    let mut jumped = engine();
    jumped.seek(250.0, Duration::ZERO);
    let a = stepped.tick(0.0, Duration::ZERO);
    let b = jumped.seek(70.0, Duration::ZERO);
    assert_eq!(a.progress, b.progress);
    assert_eq!(a.fingerprint, b.fingerprint);
    assert_eq!(a.state, b.state);
}

#[test]
fn one_sided_cue_effects_fire_on_every_pass() {
    let s = Script::new(
        vec![SceneDef::new("only", 100.0)],
        vec![
            Cue::new("#bottle", "swap", 10.0, 20.0, 0.0, 1.0).on_forward("soda:phase=3"),
            Cue::new("#caption", "chars", 30.0, 40.0, 0.0, 1.0).on_backward("soda:phase=0"),
        ],
    );
    let mut e = engine_with(&s, RecordingSink::new(), RecordingExecutor::new());
    for target in [50.0, 0.0, 50.0, 0.0] {
        e.seek(target, Duration::ZERO);
    }
    assert_eq!(
        e.executor().tokens(),
        vec!["soda:phase=3", "soda:phase=0", "soda:phase=3", "soda:phase=0"]
    );
}

#[test]
fn one_sided_scene_hooks_rearm_on_the_way_back() {
    let a = SceneDef::new("a", 10.0);
    let b = SceneDef::new("b", 10.0).hooks(SceneHooks {
        enter_forward: fx(&["b:enter-f"]),
        ..SceneHooks::default()
    });
    let s = Script::new(vec![a, b], Vec::new());
    let mut e = engine_with(&s, RecordingSink::new(), RecordingExecutor::new());
    for target in [15.0, 5.0, 15.0, 5.0, 15.0] {
        e.seek(target, Duration::ZERO);
    }
    assert_eq!(e.executor().count("b:enter-f"), 3);
}

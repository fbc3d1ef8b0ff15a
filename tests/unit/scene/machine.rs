use super::*;
use crate::scene::model::{SceneDef, layout_scenes};

fn chain(lengths: &[f64], transition: f64) -> SceneStateMachine {
    let defs: Vec<SceneDef> = lengths
        .iter()
        .enumerate()
        .map(|(i, l)| SceneDef::new(format!("s{i}"), *l).transition(transition))
        .collect();
    SceneStateMachine::new(layout_scenes(&defs).unwrap()).unwrap()
}

fn p(v: f64) -> Progress {
    Progress(v)
}

#[test]
fn starts_resting_in_first_scene() {
    let m = chain(&[100.0, 100.0, 100.0], 0.0);
    assert_eq!(m.state(), SceneTransitionState::Resting(0));
    assert_eq!(m.current(), 0);
    assert_eq!(m.extent(), 300.0);
}

#[test]
fn scene_at_uses_half_open_ranges() {
    let m = chain(&[100.0, 100.0, 100.0], 0.0);
    assert_eq!(m.scene_at(p(0.0)), 0);
    assert_eq!(m.scene_at(p(99.999)), 0);
    assert_eq!(m.scene_at(p(100.0)), 1);
    assert_eq!(m.scene_at(p(299.0)), 2);
    assert_eq!(m.scene_at(p(300.0)), 2);
}

#[test]
fn jump_over_two_boundaries_emits_both_in_order() {
    let mut m = chain(&[100.0, 100.0, 100.0], 0.0);
    m.step(p(50.0));
    let step = m.step(p(250.0));
    let at: Vec<f64> = step.crossings.iter().map(|c| c.at.0).collect();
    assert_eq!(at, vec![100.0, 200.0]);
    assert!(step.crossings.iter().all(|c| c.direction == Direction::Forward));
    assert_eq!(step.state, SceneTransitionState::Resting(2));
}

#[test]
fn long_backward_skip_walks_every_scene() {
    let mut m = chain(&[1.0; 8], 0.0);
    m.step(p(6.5));
    assert_eq!(m.current(), 6);
    let step = m.step(p(2.5));
    let pairs: Vec<(usize, usize)> = step.crossings.iter().map(|c| (c.from, c.to)).collect();
    assert_eq!(pairs, vec![(6, 5), (5, 4), (4, 3), (3, 2)]);
    assert_eq!(
        step.crossings.iter().map(|c| c.boundary()).collect::<Vec<_>>(),
        vec![6, 5, 4, 3]
    );
    assert!(step.crossings.iter().all(|c| c.direction == Direction::Backward));
}

#[test]
fn forward_skip_from_two_to_six() {
    let mut m = chain(&[1.0; 8], 0.0);
    m.step(p(2.2));
    let step = m.step(p(6.1));
    assert_eq!(
        step.crossings.iter().map(|c| c.to).collect::<Vec<_>>(),
        vec![3, 4, 5, 6]
    );
}

#[test]
fn crossings_are_always_adjacent() {
    let mut m = chain(&[1.0, 2.0, 0.5, 3.0, 1.0], 0.1);
    for target in [7.4, 0.0, 3.2, 3.1, 6.9, 1.5, 7.5, 0.2] {
        for c in m.step(p(target)).crossings {
            assert_eq!(c.from.abs_diff(c.to), 1);
        }
        assert_eq!(m.current(), m.scene_at(p(target)));
    }
}

#[test]
fn transition_window_covers_scene_tail() {
    let m = chain(&[1.0, 1.0], 0.4);
    assert_eq!(m.state_at(p(0.5)), SceneTransitionState::Resting(0));
    match m.state_at(p(0.8)) {
        SceneTransitionState::Transitioning { from, to, local } => {
            assert_eq!((from, to), (0, 1));
            assert!((local - 0.5).abs() < 1e-9);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(m.state_at(p(1.0)), SceneTransitionState::Resting(1));
    // The last scene has no successor to slide to.
    assert_eq!(m.state_at(p(1.9)), SceneTransitionState::Resting(1));
}

#[test]
fn stack_offsets_resting_and_transitioning() {
    let mut m = chain(&[1.0, 1.0, 1.0], 0.5);
    m.step(p(1.2));
    assert_eq!(m.stack_offsets(), vec![-1.0, 0.0, 1.0]);
    assert_eq!(m.active_scenes().as_slice(), &[1]);

    m.step(p(1.75));
    assert_eq!(m.stack_offsets(), vec![-1.0, -0.5, 0.5]);
    assert_eq!(m.active_scenes().as_slice(), &[1, 2]);
}

#[test]
fn rejects_gapped_or_misindexed_chains() {
    let mut scenes = layout_scenes(&[SceneDef::new("a", 1.0), SceneDef::new("b", 1.0)]).unwrap();
    scenes[1].range = crate::foundation::core::ProgressRange::new(1.5, 2.0).unwrap();
    assert!(SceneStateMachine::new(scenes).is_err());

    let mut scenes = layout_scenes(&[SceneDef::new("a", 1.0), SceneDef::new("b", 1.0)]).unwrap();
    scenes.swap(0, 1);
    assert!(SceneStateMachine::new(scenes).is_err());

    assert!(SceneStateMachine::new(Vec::new()).is_err());
}

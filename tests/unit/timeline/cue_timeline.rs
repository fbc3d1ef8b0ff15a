use super::*;
use crate::animation::ease::Ease;

fn key() -> PropertyKey {
    PropertyKey::new("#bottle", "opacity")
}

fn at(tl: &CueTimeline, p: f64) -> f64 {
    tl.resolve_key(&key(), Progress(p)).unwrap()
}

#[test]
fn later_declaration_owns_shared_boundary() {
    let tl = CueTimeline::new(vec![
        Cue::new("#bottle", "opacity", 0.0, 10.0, 0.0, 1.0),
        Cue::new("#bottle", "opacity", 10.0, 20.0, 1.0, 0.0),
    ])
    .unwrap();
    assert_eq!(at(&tl, 10.0), 1.0);
    assert_eq!(at(&tl, 25.0), 0.0);
    assert_eq!(at(&tl, 5.0), 0.5);
    assert_eq!(at(&tl, 15.0), 0.5);
}

#[test]
fn tie_break_follows_declaration_order_not_position() {
    let a = Cue::new("#bottle", "opacity", 0.0, 10.0, 0.0, 1.0);
    let b = Cue::new("#bottle", "opacity", 10.0, 20.0, 5.0, 9.0);

    let ab = CueTimeline::new(vec![a.clone(), b.clone()]).unwrap();
    assert_eq!(at(&ab, 10.0), 5.0, "b declared later owns 10");

    let ba = CueTimeline::new(vec![b, a]).unwrap();
    assert_eq!(at(&ba, 10.0), 1.0, "a declared later owns 10");
}

#[test]
fn gaps_hold_the_most_recent_end_value() {
    let tl = CueTimeline::new(vec![
        Cue::new("#bottle", "opacity", 0.0, 10.0, 0.0, 1.0),
        Cue::new("#bottle", "opacity", 20.0, 30.0, 4.0, 8.0),
    ])
    .unwrap();
    assert_eq!(at(&tl, 15.0), 1.0);
    assert_eq!(at(&tl, 19.999), 1.0);
    assert_eq!(at(&tl, 20.0), 4.0);
    assert_eq!(at(&tl, 30.0), 8.0);
    assert_eq!(at(&tl, 1000.0), 8.0);
}

#[test]
fn before_every_cue_holds_first_from() {
    let tl = CueTimeline::new(vec![
        Cue::new("#bottle", "opacity", 50.0, 60.0, 3.0, 1.0),
        Cue::new("#bottle", "opacity", 5.0, 10.0, 0.25, 0.5),
    ])
    .unwrap();
    assert_eq!(at(&tl, 0.0), 0.25);
    assert_eq!(at(&tl, 30.0), 0.5);
    assert_eq!(at(&tl, 49.0), 0.5);
    assert_eq!(at(&tl, 50.0), 3.0);
}

#[test]
fn overlapping_cues_are_rejected_at_construction() {
    let err = CueTimeline::new(vec![
        Cue::new("#bottle", "opacity", 0.0, 10.0, 0.0, 1.0),
        Cue::new("#bottle", "opacity", 5.0, 15.0, 1.0, 0.0),
    ])
    .unwrap_err();
    assert!(matches!(err, ReelError::InvalidCueDefinition(_)));
    assert!(err.to_string().contains("#bottle.opacity"));
}

#[test]
fn overlap_on_different_keys_is_fine() {
    CueTimeline::new(vec![
        Cue::new("#bottle", "opacity", 0.0, 10.0, 0.0, 1.0),
        Cue::new("#bottle", "scale", 5.0, 15.0, 1.0, 2.0),
        Cue::new("#popup-1", "opacity", 5.0, 15.0, 1.0, 2.0),
    ])
    .unwrap();
}

#[test]
fn layered_cue_wins_inside_the_overlap() {
    let tl = CueTimeline::new(vec![
        Cue::new("#bottle", "opacity", 0.0, 10.0, 0.0, 1.0),
        Cue::new("#bottle", "opacity", 4.0, 6.0, 7.0, 9.0).layered(),
    ])
    .unwrap();
    assert_eq!(at(&tl, 2.0), 0.2);
    assert_eq!(at(&tl, 5.0), 8.0);
    assert_eq!(at(&tl, 6.0), 9.0);
    assert!((at(&tl, 8.0) - 0.8).abs() < 1e-12);
    assert_eq!(at(&tl, 12.0), 1.0);
}

#[test]
fn malformed_cues_fail_fast() {
    for cue in [
        Cue::new("#a", "opacity", 5.0, 5.0, 0.0, 1.0),
        Cue::new("#a", "opacity", 6.0, 5.0, 0.0, 1.0),
        Cue::new("#a", "opacity", f64::NAN, 5.0, 0.0, 1.0),
        Cue::new("#a", "opacity", 0.0, 5.0, f64::INFINITY, 1.0),
        Cue::new("", "opacity", 0.0, 5.0, 0.0, 1.0),
        Cue::new("#a", " ", 0.0, 5.0, 0.0, 1.0),
        Cue::new("#a", "opacity", 0.0, 5.0, 0.0, 1.0).on_forward(""),
    ] {
        let err = CueTimeline::new(vec![cue]).unwrap_err();
        assert!(matches!(err, ReelError::InvalidCueDefinition(_)), "{err}");
    }
}

#[test]
fn boundaries_are_exact_for_every_ease() {
    let cues: Vec<Cue> = Ease::ALL
        .iter()
        .enumerate()
        .map(|(i, &ease)| Cue::new(format!("#t{i}"), "y", 0.1, 0.7, 0.3, -12.9).ease(ease))
        .collect();
    let tl = CueTimeline::new(cues.clone()).unwrap();
    for cue in &cues {
        let k = cue.key();
        assert_eq!(tl.resolve_key(&k, cue.start), Some(cue.from));
        assert_eq!(tl.resolve_key(&k, cue.end), Some(cue.to));
    }
}

#[test]
fn resolve_is_pure_regardless_of_history() {
    let tl = CueTimeline::new(vec![
        Cue::new("#bottle", "opacity", 0.0, 10.0, 0.0, 1.0).ease(Ease::InOutCubic),
        Cue::new("#bottle", "opacity", 10.0, 20.0, 1.0, 0.0),
        Cue::new("#popup-2", "y", 3.0, 17.0, 40.0, 0.0).ease(Ease::OutQuad),
    ])
    .unwrap();
    let sample_at = Progress(13.7);
    let first = tl.resolve(sample_at);
    for p in [19.0, 0.0, 20.0, 2.5, 100.0, 13.6] {
        let _ = tl.resolve(Progress(p));
    }
    assert_eq!(tl.resolve(sample_at), first);
    assert_eq!(first.len(), 2);
}

#[test]
fn keys_and_span() {
    let tl = CueTimeline::new(vec![
        Cue::new("#b", "y", 0.0, 4.0, 0.0, 1.0),
        Cue::new("#a", "y", 2.0, 9.0, 0.0, 1.0),
    ])
    .unwrap();
    let keys: Vec<String> = tl.keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["#a.y", "#b.y"]);
    assert_eq!(tl.span_end(), 9.0);
    assert_eq!(tl.len(), 2);
    assert!(tl.resolve_key(&PropertyKey::new("#c", "y"), Progress(1.0)).is_none());
}

#[test]
fn forward_crossings_are_ordered_by_position() {
    let tl = CueTimeline::new(vec![
        Cue::new("#bottle", "swap", 20.0, 30.0, 0.0, 1.0).on_forward("soda:phase=3"),
        Cue::new("#bottle", "swap", 0.0, 10.0, 0.0, 1.0).on_forward("soda:phase=2"),
        Cue::new("#caption", "reveal", 0.0, 10.0, 0.0, 1.0).on_forward("caption:done"),
    ])
    .unwrap();
    let hits = tl.crossings(Progress(0.0), Progress(30.0));
    let tokens: Vec<&str> = hits.iter().filter_map(CueCrossing::token).collect();
    assert_eq!(tokens, vec!["soda:phase=2", "caption:done", "soda:phase=3"]);
    assert!(hits.iter().all(|c| c.direction == Direction::Forward));
    assert_eq!(hits[0].latch, LatchId::Cue(1));

    // `prev` is exclusive, `next` inclusive.
    assert!(tl.crossings(Progress(10.0), Progress(19.0)).is_empty());
    assert_eq!(tl.crossings(Progress(9.0), Progress(10.0)).len(), 2);
}

#[test]
fn backward_crossings_descend_and_keep_declaration_order_on_ties() {
    let tl = CueTimeline::new(vec![
        Cue::new("#a", "x", 5.0, 10.0, 0.0, 1.0).on_backward("a:undo"),
        Cue::new("#b", "x", 15.0, 20.0, 0.0, 1.0).on_backward("b:undo"),
        Cue::new("#c", "x", 5.0, 8.0, 0.0, 1.0).on_backward("c:undo"),
    ])
    .unwrap();
    let hits = tl.crossings(Progress(30.0), Progress(0.0));
    let tokens: Vec<&str> = hits.iter().filter_map(CueCrossing::token).collect();
    assert_eq!(tokens, vec!["b:undo", "a:undo", "c:undo"]);
    assert!(hits.iter().all(|c| c.direction == Direction::Backward));

    // Landing exactly on a start does not cross it yet.
    assert_eq!(tl.crossings(Progress(16.0), Progress(15.0)).len(), 0);
    assert_eq!(tl.crossings(Progress(15.0), Progress(14.0)).len(), 1);
}

#[test]
fn stationary_progress_crosses_nothing() {
    let tl = CueTimeline::new(vec![
        Cue::new("#a", "x", 5.0, 10.0, 0.0, 1.0)
            .on_forward("a:do")
            .on_backward("a:undo"),
    ])
    .unwrap();
    assert!(tl.crossings(Progress(10.0), Progress(10.0)).is_empty());
}

#[test]
fn one_sided_cues_report_a_silent_opposite_crossing() {
    let tl = CueTimeline::new(vec![
        Cue::new("#bottle", "swap", 10.0, 20.0, 0.0, 1.0).on_forward("soda:phase=3"),
        Cue::new("#caption", "chars", 30.0, 40.0, 0.0, 1.0).on_backward("caption:clear"),
    ])
    .unwrap();

    let back = tl.crossings(Progress(50.0), Progress(0.0));
    let at: Vec<(f64, Option<&str>)> = back.iter().map(|c| (c.at.0, c.token())).collect();
    assert_eq!(at, vec![(30.0, Some("caption:clear")), (20.0, None)]);

    let fwd = tl.crossings(Progress(0.0), Progress(50.0));
    let at: Vec<(f64, Option<&str>)> = fwd.iter().map(|c| (c.at.0, c.token())).collect();
    assert_eq!(at, vec![(20.0, Some("soda:phase=3")), (30.0, None)]);
    assert_eq!(fwd[1].latch, LatchId::Cue(1));
}

#[test]
fn cues_without_effects_have_no_thresholds() {
    let tl = CueTimeline::new(vec![Cue::new("#a", "x", 0.0, 10.0, 0.0, 1.0)]).unwrap();
    assert!(tl.crossings(Progress(0.0), Progress(10.0)).is_empty());
    assert!(tl.crossings(Progress(10.0), Progress(0.0)).is_empty());
}

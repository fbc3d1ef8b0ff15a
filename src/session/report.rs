use crate::{
    effects::dispatch::DispatchReport,
    foundation::core::{Direction, Progress},
    scene::machine::SceneTransitionState,
    timeline::fingerprint::ValuesFingerprint,
};

/// What was crossed during a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CrossingKind {
    /// Boundary between two adjacent scenes.
    Scene {
        /// Scene left.
        from: usize,
        /// Scene entered.
        to: usize,
    },
    /// Side-effect threshold of the cue with this declaration index.
    Cue {
        /// Declaration index.
        index: usize,
    },
}

/// One crossing, in the order it was dispatched.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameCrossing {
    /// Position crossed.
    pub at: Progress,
    /// Direction of travel.
    pub direction: Direction,
    /// What was crossed.
    #[serde(flatten)]
    pub kind: CrossingKind,
}

/// Summary of one engine frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameReport {
    /// Frame counter, starting at 0 for the first processed frame.
    pub frame: u64,
    /// Progress after this frame.
    pub progress: Progress,
    /// Progress mapped to `[0, 1]`.
    pub normalized: f64,
    /// Scene state after this frame.
    pub state: SceneTransitionState,
    /// Crossings in dispatch order.
    pub crossings: Vec<FrameCrossing>,
    /// Effect counters.
    pub effects: DispatchReport,
    /// Successful property writes.
    pub writes: u32,
    /// Writes skipped because the target was gone.
    pub missing_targets: u32,
    /// Writes that failed for any other reason.
    pub failed_writes: u32,
    /// `true` when a debounced resize recomputed the geometry this frame.
    pub resized: bool,
    /// Fingerprint of the resolved cue values.
    pub fingerprint: ValuesFingerprint,
}

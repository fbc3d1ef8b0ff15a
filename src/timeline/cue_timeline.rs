use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::{
    effects::{dispatch::LatchId, effect::SideEffect},
    foundation::core::{Direction, Progress, PropertyKey},
    foundation::error::{ReelError, ReelResult},
    timeline::cue::Cue,
};

/// Resolved value for every `(target, property)` the timeline drives.
pub type ResolvedValues = BTreeMap<PropertyKey, f64>;

/// A cue side-effect threshold passed between two progress values.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CueCrossing {
    /// Threshold position (`end` for forward effects, `start` for backward ones).
    ///
    /// A one-sided cue also reports the opposite-direction crossing of its only threshold,
    /// with no effect, so the latch re-arms.
    pub at: Progress,
    /// Direction of travel that crossed it.
    pub direction: Direction,
    /// Declaration index of the owning cue.
    pub cue: usize,
    /// Latch shared by the cue's forward/backward pair.
    pub latch: LatchId,
    /// Effect to dispatch; `None` when the crossing only re-arms the latch.
    pub effect: Option<SideEffect>,
}

impl CueCrossing {
    /// Token of the effect to dispatch, if any.
    pub fn token(&self) -> Option<&str> {
        self.effect.as_ref().map(SideEffect::token)
    }
}

#[derive(Clone, Debug)]
struct Threshold {
    at: f64,
    cue: usize,
    effect: Option<SideEffect>,
}

impl Threshold {
    fn crossing(&self, direction: Direction) -> CueCrossing {
        CueCrossing {
            at: Progress(self.at),
            direction,
            cue: self.cue,
            latch: LatchId::Cue(self.cue),
            effect: self.effect.clone(),
        }
    }
}

/// Cues of one key, sorted by `(start, declaration index)`.
#[derive(Clone, Debug)]
struct Partition {
    order: Vec<usize>,
    starts: Vec<f64>,
    // Prefix maximum of `end` over `order[..=j]`.
    reach: Vec<f64>,
    // Prefix arg-max of `(end, declaration index)` over `order[..=j]`.
    settled: Vec<usize>,
}

/// Ordered cue set sharing one progress axis.
///
/// Resolution is a pure function of absolute progress: it never depends on which progress
/// values were visited before, so seeking and fast scrubbing give the same output as playing
/// through frame by frame.
///
/// Tie-break: declaration order is the only tie-break. Among cues whose closed interval
/// contains `p`, the latest-declared wins, so the shared point of two touching cues belongs to
/// the later-declared one.
#[derive(Clone, Debug)]
pub struct CueTimeline {
    cues: Vec<Cue>,
    partitions: BTreeMap<PropertyKey, Partition>,
    forward: Vec<Threshold>,
    backward: Vec<Threshold>,
}

impl CueTimeline {
    /// Validate and index `cues` (declaration order is the slice order).
    ///
    /// Fails with [`ReelError::InvalidCueDefinition`] on malformed cues or on overlapping
    /// intervals for one key where the later cue is not marked `layered`.
    pub fn new(cues: Vec<Cue>) -> ReelResult<Self> {
        let mut by_key: BTreeMap<PropertyKey, Vec<usize>> = BTreeMap::new();
        for (i, cue) in cues.iter().enumerate() {
            cue.validate()?;
            by_key.entry(cue.key()).or_default().push(i);
        }

        for (key, members) in &by_key {
            for (n, &later) in members.iter().enumerate() {
                if cues[later].layered {
                    continue;
                }
                if let Some(&earlier) = members[..n]
                    .iter()
                    .find(|&&earlier| cues[earlier].overlaps(&cues[later]))
                {
                    return Err(ReelError::invalid_cue(format!(
                        "cues #{earlier} [{}, {}] and #{later} [{}, {}] overlap on '{key}'; mark the later cue as layered to allow it",
                        cues[earlier].start.0,
                        cues[earlier].end.0,
                        cues[later].start.0,
                        cues[later].end.0,
                    )));
                }
            }
        }

        let partitions = by_key
            .into_iter()
            .map(|(key, mut order)| {
                order.sort_by(|&a, &b| {
                    cues[a]
                        .start
                        .0
                        .total_cmp(&cues[b].start.0)
                        .then(a.cmp(&b))
                });
                (key, Partition::build(&cues, order))
            })
            .collect();

        let mut forward = Vec::new();
        let mut backward = Vec::new();
        for (i, cue) in cues.iter().enumerate() {
            let (fwd_at, back_at) = match (&cue.on_forward, &cue.on_backward) {
                (None, None) => continue,
                (Some(_), Some(_)) => (cue.end.0, cue.start.0),
                // One-sided: both directions share the declared threshold.
                (Some(_), None) => (cue.end.0, cue.end.0),
                (None, Some(_)) => (cue.start.0, cue.start.0),
            };
            forward.push(Threshold {
                at: fwd_at,
                cue: i,
                effect: cue.on_forward.clone(),
            });
            backward.push(Threshold {
                at: back_at,
                cue: i,
                effect: cue.on_backward.clone(),
            });
        }
        forward.sort_by(|a, b| a.at.total_cmp(&b.at).then(a.cue.cmp(&b.cue)));
        backward.sort_by(|a, b| a.at.total_cmp(&b.at).then(a.cue.cmp(&b.cue)));

        Ok(Self {
            cues,
            partitions,
            forward,
            backward,
        })
    }

    /// All cues in declaration order.
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Number of cues.
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// `true` when no cue is declared.
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Every key driven by at least one cue, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &PropertyKey> {
        self.partitions.keys()
    }

    /// Largest cue `end`, or `0` for an empty timeline.
    pub fn span_end(&self) -> f64 {
        self.cues.iter().map(|c| c.end.0).fold(0.0, f64::max)
    }

    /// Resolve every key at `progress`.
    pub fn resolve(&self, progress: Progress) -> ResolvedValues {
        self.partitions
            .iter()
            .map(|(key, part)| (key.clone(), self.resolve_in(part, progress.0)))
            .collect()
    }

    /// Resolve a single key, or `None` if no cue drives it.
    pub fn resolve_key(&self, key: &PropertyKey, progress: Progress) -> Option<f64> {
        self.partitions
            .get(key)
            .map(|part| self.resolve_in(part, progress.0))
    }

    /// Side-effect thresholds crossed moving from `prev` to `next`, in travel order.
    ///
    /// Forward crossing of `t`: `prev < t <= next`. Backward crossing: `next < t <= prev`.
    /// Thresholds at the same position keep cue declaration order.
    pub fn crossings(&self, prev: Progress, next: Progress) -> SmallVec<[CueCrossing; 4]> {
        let mut out = SmallVec::new();
        match Direction::of_travel(prev, next) {
            None => {}
            Some(Direction::Forward) => {
                let lo = self.forward.partition_point(|t| t.at <= prev.0);
                let hi = self.forward.partition_point(|t| t.at <= next.0);
                for th in &self.forward[lo..hi] {
                    out.push(th.crossing(Direction::Forward));
                }
            }
            Some(Direction::Backward) => {
                let lo = self.backward.partition_point(|t| t.at <= next.0);
                let hi = self.backward.partition_point(|t| t.at <= prev.0);
                // Descending position, declaration order within equal positions.
                for group in self.backward[lo..hi].chunk_by(|a, b| a.at == b.at).rev() {
                    for th in group {
                        out.push(th.crossing(Direction::Backward));
                    }
                }
            }
        }
        out
    }

    fn resolve_in(&self, part: &Partition, p: f64) -> f64 {
        let idx = part.starts.partition_point(|&s| s <= p);
        if idx == 0 {
            return self.cues[part.order[0]].from;
        }

        let mut winner: Option<usize> = None;
        let mut j = idx;
        while j > 0 {
            j -= 1;
            if part.reach[j] < p {
                break;
            }
            let ci = part.order[j];
            if self.cues[ci].end.0 >= p && winner.is_none_or(|w| ci > w) {
                winner = Some(ci);
            }
        }

        match winner {
            Some(ci) => self.cues[ci].sample(Progress(p)),
            None => self.cues[part.settled[idx - 1]].to,
        }
    }
}

impl Partition {
    fn build(cues: &[Cue], order: Vec<usize>) -> Self {
        let mut starts = Vec::with_capacity(order.len());
        let mut reach = Vec::with_capacity(order.len());
        let mut settled = Vec::with_capacity(order.len());
        let mut max_end = f64::NEG_INFINITY;
        let mut best: Option<usize> = None;
        for &ci in &order {
            let cue = &cues[ci];
            starts.push(cue.start.0);
            max_end = max_end.max(cue.end.0);
            reach.push(max_end);
            let better = match best {
                None => true,
                Some(b) => {
                    cue.end.0 > cues[b].end.0 || (cue.end.0 == cues[b].end.0 && ci > b)
                }
            };
            if better {
                best = Some(ci);
            }
            settled.push(best.unwrap_or(ci));
        }
        Self {
            order,
            starts,
            reach,
            settled,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/cue_timeline.rs"]
mod tests;

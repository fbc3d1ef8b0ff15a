use smallvec::SmallVec;

use crate::{
    foundation::core::{Direction, Progress},
    foundation::error::{ReelError, ReelResult},
    scene::model::Scene,
};

/// Derived scene state for one progress value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub enum SceneTransitionState {
    /// The scene is fully settled in the viewport.
    Resting(usize),
    /// Sliding from `from` to its successor `to`, `local` in `[0, 1)`.
    Transitioning {
        /// Outgoing scene.
        from: usize,
        /// Incoming scene, always `from + 1`.
        to: usize,
        /// Position inside the transition window.
        local: f64,
    },
}

impl SceneTransitionState {
    /// Scene whose range contains the progress value.
    pub fn primary(self) -> usize {
        match self {
            Self::Resting(i) => i,
            Self::Transitioning { from, .. } => from,
        }
    }
}

/// Passing the start of scene `max(from, to)` in either direction.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct BoundaryCrossing {
    /// Scene being left.
    pub from: usize,
    /// Adjacent scene being entered.
    pub to: usize,
    /// Boundary position.
    pub at: Progress,
    /// Direction of travel.
    pub direction: Direction,
}

impl BoundaryCrossing {
    /// Index of the scene whose start this boundary is.
    pub fn boundary(&self) -> usize {
        self.from.max(self.to)
    }
}

/// Outcome of one [`SceneStateMachine::step`].
#[derive(Clone, Debug, PartialEq)]
pub struct SceneStep {
    /// Boundaries crossed, one adjacent pair at a time, in progress order.
    pub crossings: SmallVec<[BoundaryCrossing; 2]>,
    /// State after the step.
    pub state: SceneTransitionState,
}

/// Linear chain of scenes driven by the shared progress axis.
///
/// Scenes only ever move to an adjacent neighbor: a multi-boundary jump is walked one boundary
/// at a time so every skipped scene still gets its exit/enter crossing, in order.
#[derive(Clone, Debug)]
pub struct SceneStateMachine {
    scenes: Vec<Scene>,
    starts: Vec<f64>,
    extent: f64,
    current: usize,
    state: SceneTransitionState,
}

impl SceneStateMachine {
    /// Validate that `scenes` partition `[0, extent)` and start resting in scene 0.
    pub fn new(scenes: Vec<Scene>) -> ReelResult<Self> {
        let Some(last) = scenes.last() else {
            return Err(ReelError::invalid_scene("at least one scene is required"));
        };
        let extent = last.range.end.0;
        let n = scenes.len();

        for (i, scene) in scenes.iter().enumerate() {
            if scene.index != i {
                return Err(ReelError::invalid_scene(format!(
                    "scene '{}' has index {} but sits at position {i}",
                    scene.name, scene.index
                )));
            }
            if scene.stack_order != n - i {
                return Err(ReelError::invalid_scene(format!(
                    "scene '{}' must have stack_order {}",
                    scene.name,
                    n - i
                )));
            }
            scene.validate()?;
        }
        if scenes[0].range.start.0 != 0.0 {
            return Err(ReelError::invalid_scene("first scene must start at 0"));
        }
        for w in scenes.windows(2) {
            if w[0].range.end.0 != w[1].range.start.0 {
                return Err(ReelError::invalid_scene(format!(
                    "scenes '{}' and '{}' leave a gap or overlap",
                    w[0].name, w[1].name
                )));
            }
        }

        let starts = scenes.iter().map(|s| s.range.start.0).collect();
        let mut machine = Self {
            scenes,
            starts,
            extent,
            current: 0,
            state: SceneTransitionState::Resting(0),
        };
        machine.state = machine.state_at(Progress::ZERO);
        Ok(machine)
    }

    /// End of the last scene (`L`).
    pub fn extent(&self) -> f64 {
        self.extent
    }

    /// Scenes in chain order.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Always `false`; construction requires a scene.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Scene reached by the last step.
    pub fn current(&self) -> usize {
        self.current
    }

    /// State after the last step.
    pub fn state(&self) -> SceneTransitionState {
        self.state
    }

    /// Scene containing `p`. Values at or beyond `L` belong to the last scene.
    pub fn scene_at(&self, p: Progress) -> usize {
        self.starts
            .partition_point(|&s| s <= p.0)
            .saturating_sub(1)
    }

    /// State implied by `p` alone.
    pub fn state_at(&self, p: Progress) -> SceneTransitionState {
        let i = self.scene_at(p);
        let scene = &self.scenes[i];
        if i + 1 < self.scenes.len() && scene.transition_len > 0.0 {
            let begin = scene.transition_start();
            if p.0 >= begin && p.0 < scene.range.end.0 {
                return SceneTransitionState::Transitioning {
                    from: i,
                    to: i + 1,
                    local: (p.0 - begin) / scene.transition_len,
                };
            }
        }
        SceneTransitionState::Resting(i)
    }

    /// Advance to `p`, emitting every boundary crossed in progress order.
    pub fn step(&mut self, p: Progress) -> SceneStep {
        let target = self.scene_at(p);
        let mut crossings = SmallVec::new();
        while self.current < target {
            let to = self.current + 1;
            crossings.push(BoundaryCrossing {
                from: self.current,
                to,
                at: self.scenes[to].range.start,
                direction: Direction::Forward,
            });
            self.current = to;
        }
        while self.current > target {
            let from = self.current;
            crossings.push(BoundaryCrossing {
                from,
                to: from - 1,
                at: self.scenes[from].range.start,
                direction: Direction::Backward,
            });
            self.current = from - 1;
        }
        self.state = self.state_at(p);
        SceneStep {
            crossings,
            state: self.state,
        }
    }

    /// Scenes currently on screen: one, or an adjacent pair while transitioning.
    pub fn active_scenes(&self) -> SmallVec<[usize; 2]> {
        match self.state {
            SceneTransitionState::Resting(i) => SmallVec::from_slice(&[i]),
            SceneTransitionState::Transitioning { from, to, .. } => SmallVec::from_slice(&[from, to]),
        }
    }

    /// Vertical offset of every scene in viewport heights.
    ///
    /// Passed scenes park above (`-1`), future scenes park below (`+1`), the resting scene sits
    /// at `0`. During a transition the outgoing scene moves `0 -> -1` and the incoming one
    /// `+1 -> 0`, linearly in `local`.
    pub fn stack_offsets(&self) -> Vec<f64> {
        (0..self.scenes.len())
            .map(|k| stack_offset(self.state, k))
            .collect()
    }
}

fn stack_offset(state: SceneTransitionState, k: usize) -> f64 {
    match state {
        SceneTransitionState::Resting(i) => match k.cmp(&i) {
            std::cmp::Ordering::Less => -1.0,
            std::cmp::Ordering::Equal => 0.0,
            std::cmp::Ordering::Greater => 1.0,
        },
        SceneTransitionState::Transitioning { from, to, local } => {
            if k < from {
                -1.0
            } else if k == from {
                -local
            } else if k == to {
                1.0 - local
            } else {
                1.0
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/machine.rs"]
mod tests;

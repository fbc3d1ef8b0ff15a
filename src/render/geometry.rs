use crate::foundation::error::{ReelError, ReelResult};

/// Pixel layout of the scrolling page.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollGeometry {
    /// Viewport height in pixels.
    pub viewport_height: f64,
    /// Scroll height of each scene section in pixels, in chain order.
    pub scene_heights: Vec<f64>,
}

impl ScrollGeometry {
    /// Every scene one viewport tall.
    pub fn uniform(scene_count: usize, viewport_height: f64) -> Self {
        Self {
            viewport_height,
            scene_heights: vec![viewport_height; scene_count],
        }
    }

    /// Check the layout against a chain of `scene_count` scenes.
    pub fn validate(&self, scene_count: usize) -> ReelResult<()> {
        if !self.viewport_height.is_finite() || self.viewport_height <= 0.0 {
            return Err(ReelError::validation(
                "viewport_height must be finite and > 0",
            ));
        }
        if self.scene_heights.len() != scene_count {
            return Err(ReelError::validation(format!(
                "geometry has {} scene heights for {scene_count} scenes",
                self.scene_heights.len()
            )));
        }
        if self
            .scene_heights
            .iter()
            .any(|h| !h.is_finite() || *h <= 0.0)
        {
            return Err(ReelError::validation("scene heights must be finite and > 0"));
        }
        Ok(())
    }

    /// Total scrollable height.
    pub fn total_height(&self) -> f64 {
        self.scene_heights.iter().sum()
    }
}

/// Supplies the current page layout; queried at startup and after each debounced resize.
pub trait GeometryProvider {
    fn geometry(&mut self) -> ReelResult<ScrollGeometry>;
}

impl<G: GeometryProvider + ?Sized> GeometryProvider for Box<G> {
    fn geometry(&mut self) -> ReelResult<ScrollGeometry> {
        (**self).geometry()
    }
}

/// Provider returning a settable layout, for tests and headless replay.
#[derive(Clone, Debug)]
pub struct FixedGeometry {
    current: ScrollGeometry,
    queries: u32,
}

impl FixedGeometry {
    pub fn new(geometry: ScrollGeometry) -> Self {
        Self {
            current: geometry,
            queries: 0,
        }
    }

    /// Replace the layout returned by the next query.
    pub fn set(&mut self, geometry: ScrollGeometry) {
        self.current = geometry;
    }

    /// Number of times the layout was queried.
    pub fn queries(&self) -> u32 {
        self.queries
    }
}

impl GeometryProvider for FixedGeometry {
    fn geometry(&mut self) -> ReelResult<ScrollGeometry> {
        self.queries += 1;
        Ok(self.current.clone())
    }
}

/// Maps logical progress and stacking offsets to pixels for one validated geometry.
#[derive(Clone, Debug)]
pub struct PixelMap {
    geometry: ScrollGeometry,
    // Pixel offset at which each scene's section begins.
    tops: Vec<f64>,
}

impl PixelMap {
    /// Validate `geometry` against `scene_count` and precompute section tops.
    pub fn new(geometry: ScrollGeometry, scene_count: usize) -> ReelResult<Self> {
        geometry.validate(scene_count)?;
        let tops = geometry
            .scene_heights
            .iter()
            .scan(0.0, |acc, h| {
                let top = *acc;
                *acc += h;
                Some(top)
            })
            .collect();
        Ok(Self { geometry, tops })
    }

    pub fn geometry(&self) -> &ScrollGeometry {
        &self.geometry
    }

    /// Scroll offset in pixels for a scene state.
    ///
    /// `local_in_scene` is the position inside the primary scene's range mapped to `[0, 1]`.
    pub fn scroll_offset(&self, scene: usize, local_in_scene: f64) -> f64 {
        let Some(top) = self.tops.get(scene) else {
            return self.geometry.total_height();
        };
        top + self.geometry.scene_heights[scene] * local_in_scene.clamp(0.0, 1.0)
    }

    /// Stacking offset of one scene in pixels.
    pub fn stack_offset_px(&self, viewport_units: f64) -> f64 {
        viewport_units * self.geometry.viewport_height
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;

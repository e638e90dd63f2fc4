//! Cosmetic easing of rendered positions toward the authoritative frame.
//!
//! The smoother keeps its own copy of what was last drawn and approaches the
//! target by `factor` per 60 Hz frame. It never writes back into the driver.

use indexmap::IndexMap;

use crate::data::Point;
use crate::ids::PlayerId;
use crate::interp::lerp_point;

const REFERENCE_FPS: f32 = 60.0;

#[derive(Clone, Debug, Default)]
pub struct Smoother {
    factor: f32,
    drawn: IndexMap<PlayerId, Point>,
}

impl Smoother {
    pub fn new(factor: f32) -> Self {
        Self {
            factor: factor.clamp(0.0, 1.0),
            drawn: IndexMap::new(),
        }
    }

    /// Ease toward `targets` over `dt` seconds. Players seen for the first time snap;
    /// players missing from `targets` are dropped.
    pub fn smooth<'a, I>(&mut self, targets: I, dt: f32) -> &IndexMap<PlayerId, Point>
    where
        I: IntoIterator<Item = (&'a PlayerId, &'a Point)>,
    {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let alpha = 1.0 - (1.0 - self.factor).powf(dt * REFERENCE_FPS);

        let mut next = IndexMap::with_capacity(self.drawn.len());
        for (id, target) in targets {
            let drawn = match self.drawn.get(id) {
                Some(prev) => lerp_point(*prev, *target, alpha),
                None => *target,
            };
            next.insert(id.clone(), drawn);
        }
        self.drawn = next;
        &self.drawn
    }

    pub fn drawn(&self) -> &IndexMap<PlayerId, Point> {
        &self.drawn
    }

    pub fn reset(&mut self) {
        self.drawn.clear();
    }
}

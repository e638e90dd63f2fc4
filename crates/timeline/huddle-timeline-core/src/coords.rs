//! Canvas ⇄ court coordinate mapping.
//!
//! The court is centred on the origin with `y` up; players stand on the floor
//! (`y = 0`). Canvas x runs along the court length, canvas y across its width.
//! Each axis is an independent affine map, so the inverse is exact up to float
//! precision.

use serde::{Deserialize, Serialize};

use crate::data::{Point, CANVAS_HEIGHT, CANVAS_WIDTH};

/// Court length in metres (baseline to baseline).
pub const COURT_LENGTH: f32 = 28.65;
/// Court width in metres (sideline to sideline).
pub const COURT_WIDTH: f32 = 15.24;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourtMode {
    /// Canvas x spans the whole court.
    #[default]
    Full,
    /// Canvas x spans one half; canvas x = 0 is the far baseline.
    Half,
}

impl CourtMode {
    /// Court metres per canvas unit along the length axis.
    #[inline]
    pub fn length_scale(self) -> f32 {
        match self {
            CourtMode::Full => COURT_LENGTH / CANVAS_WIDTH,
            CourtMode::Half => 0.5 * COURT_LENGTH / CANVAS_WIDTH,
        }
    }

    /// Court metres per canvas unit along the width axis.
    #[inline]
    pub fn width_scale(self) -> f32 {
        COURT_WIDTH / CANVAS_HEIGHT
    }

    /// Court x reached by canvas x = 0.
    #[inline]
    fn length_origin(self) -> f32 {
        -0.5 * COURT_LENGTH
    }
}

/// Position in court space (metres).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CourtPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

pub fn to_court_space(p: Point, mode: CourtMode) -> CourtPoint {
    CourtPoint {
        x: mode.length_origin() + p.x * mode.length_scale(),
        y: 0.0,
        z: -0.5 * COURT_WIDTH + p.y * mode.width_scale(),
    }
}

pub fn from_court_space(px: f32, pz: f32, mode: CourtMode) -> Point {
    Point {
        x: (px - mode.length_origin()) / mode.length_scale(),
        y: (pz + 0.5 * COURT_WIDTH) / mode.width_scale(),
    }
}

/// Map every point of a frame, preserving order.
pub fn to_court_space_all<'a, I>(points: I, mode: CourtMode) -> Vec<CourtPoint>
where
    I: IntoIterator<Item = &'a Point>,
{
    points
        .into_iter()
        .map(|p| to_court_space(*p, mode))
        .collect()
}

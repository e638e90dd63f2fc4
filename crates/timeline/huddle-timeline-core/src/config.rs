//! Core configuration for huddle-timeline-core.

use serde::{Deserialize, Serialize};

use crate::coords::CourtMode;
use crate::error::{PlayError, PlayResult};

/// Playback speed used when a config omits it, in steps per second.
pub const DEFAULT_SPEED: f32 = 1.0;
/// Pause between reaching the last step and the end notification.
pub const DEFAULT_HOLD_SECONDS: f32 = 0.8;
/// Radius, in canvas units, used to attach legacy actions to a player by position.
pub const DEFAULT_MATCH_TOLERANCE: f32 = 45.0;
/// Per-frame approach factor for cosmetic smoothing (0 = frozen, 1 = snap).
pub const DEFAULT_SMOOTHING: f32 = 0.2;

/// Configuration for playback and matching.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Steps advanced per second of real time.
    pub speed: f32,
    /// Seconds spent in the holding phase before playback reports it ended.
    pub hold_seconds: f32,
    /// Legacy proximity matching radius in canvas units.
    pub match_tolerance: f32,
    /// Court layout the canvas is mapped onto.
    pub court_mode: CourtMode,
    /// Cosmetic smoothing factor handed to [`crate::Smoother`].
    pub smoothing: f32,
    /// Maximum events retained per tick.
    pub max_events_per_tick: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            hold_seconds: DEFAULT_HOLD_SECONDS,
            match_tolerance: DEFAULT_MATCH_TOLERANCE,
            court_mode: CourtMode::Full,
            smoothing: DEFAULT_SMOOTHING,
            max_events_per_tick: 1024,
        }
    }
}

impl Config {
    /// Reject values playback cannot run with.
    pub fn validate(&self) -> PlayResult<()> {
        validate_speed(self.speed)?;
        if !self.hold_seconds.is_finite() || self.hold_seconds < 0.0 {
            return Err(PlayError::validation("hold_seconds must be finite and >= 0"));
        }
        if !self.match_tolerance.is_finite() || self.match_tolerance < 0.0 {
            return Err(PlayError::validation("match_tolerance must be finite and >= 0"));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(PlayError::validation("smoothing must be within [0, 1]"));
        }
        if self.max_events_per_tick == 0 {
            return Err(PlayError::validation("max_events_per_tick must be at least 1"));
        }
        Ok(())
    }
}

pub(crate) fn validate_speed(speed: f32) -> PlayResult<()> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(PlayError::InvalidSpeed(speed))
    }
}

//! Output contracts from the playback driver.
//!
//! Outputs carry this tick's authoritative positions (canvas space, document
//! order), any ball in flight, and a separate list of semantic events. Hosts
//! map positions to court space and render them.

use serde::{Deserialize, Serialize};

use crate::data::Point;
use crate::ids::PlayerId;
use crate::timeline::{BallFlight, Frame};

/// One player's position this tick.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlayerPosition {
    pub player: PlayerId,
    pub position: Point,
}

/// Discrete semantic signals emitted during stepping.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum PlaybackEvent {
    PlaybackStarted { total_steps: u32 },
    PlaybackStopped { progress: f32 },
    StepCompleted { step: u32 },
    /// Progress reached the last step; the holding pause begins.
    ReachedEnd { total_steps: u32 },
    /// Holding pause elapsed; playback is idle again.
    PlaybackEnded,
}

/// Outputs returned by `PlayDriver::update()`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    /// Progress the positions were evaluated at; `None` when nothing was published.
    #[serde(default)]
    pub progress: Option<f32>,
    #[serde(default)]
    pub positions: Vec<PlayerPosition>,
    #[serde(default)]
    pub ball: Vec<BallFlight>,
    #[serde(default)]
    pub events: Vec<PlaybackEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.progress = None;
        self.positions.clear();
        self.ball.clear();
        self.events.clear();
    }

    /// Replace published positions with those of `frame`.
    pub fn publish(&mut self, frame: Frame) {
        self.progress = Some(frame.progress);
        self.positions.clear();
        self.positions
            .extend(frame.positions.into_iter().map(|(player, position)| PlayerPosition {
                player,
                position,
            }));
        self.ball = frame.ball;
    }

    #[inline]
    pub fn position(&self, id: &PlayerId) -> Option<Point> {
        self.positions
            .iter()
            .find(|p| &p.player == id)
            .map(|p| p.position)
    }

    #[inline]
    pub fn has_event(&self, pred: impl Fn(&PlaybackEvent) -> bool) -> bool {
        self.events.iter().any(pred)
    }
}

//! Timeline interpolation: continuous positions from fractional progress.
//!
//! Model:
//! - `progress` counts completed steps; 2.35 is 35% through step index 2.
//! - Steps before `floor(progress)` are fully applied through the resolver walk.
//! - In the current step an owned repositioning action moves the player along
//!   `[from, waypoints.., to]` once its delay has elapsed.
//! - At or beyond `total_steps` every player rests at the fully resolved position.
//!
//! The result is the authoritative position; smoothing and display curves are
//! layered on top by callers and never feed back here.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data::{ActionKind, PlayDocument, Player, Point};
use crate::ids::{ActionId, PlayerId};
use crate::interp::{delay_fraction, effective_fraction, sample_path};
use crate::resolve::{
    moving_action_at_step, owned_action_at_step, resolve_all_at_step, resolve_position_at_step,
};

/// Ball travelling along a pass in the current step.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BallFlight {
    pub action_id: ActionId,
    pub passer: PlayerId,
    pub position: Point,
    /// Motion fraction of the pass after its delay, in [0, 1].
    pub fraction: f32,
}

/// Positions of every player at one instant of the timeline.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    /// Progress the frame was evaluated at, after clamping.
    pub progress: f32,
    /// Canvas positions keyed by player, in document order.
    pub positions: IndexMap<PlayerId, Point>,
    #[serde(default)]
    pub ball: Vec<BallFlight>,
}

impl Frame {
    #[inline]
    pub fn position(&self, id: &PlayerId) -> Option<Point> {
        self.positions.get(id).copied()
    }
}

#[inline]
fn is_pass(kind: ActionKind) -> bool {
    kind == ActionKind::Pass
}

/// Clamp raw progress into `[0, total_steps]`; NaN becomes 0.
#[inline]
pub fn clamp_progress(progress: f32, total_steps: u32) -> f32 {
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, total_steps as f32)
}

/// Evaluate the play at `progress` with playback running at `speed` steps/s.
/// `speed` only matters for converting action delays into step fractions.
pub fn interpolate(doc: &PlayDocument, progress: f32, speed: f32, tolerance: f32) -> Frame {
    let total = doc.total_steps();
    let progress = clamp_progress(progress, total);

    if progress >= total as f32 {
        return Frame {
            progress,
            positions: resolve_all_at_step(doc, total, tolerance),
            ball: Vec::new(),
        };
    }

    let step = progress.floor() as u32;
    let step_frac = progress - step as f32;

    let mut positions = IndexMap::with_capacity(doc.players.len());
    let mut ball = Vec::new();
    for player in &doc.players {
        let rest = resolve_position_at_step(player, &doc.actions, step, tolerance);
        let pos = in_flight_position(doc, player, rest, step, step_frac, speed, tolerance);
        positions.insert(player.id.clone(), pos);

        if let Some(pass) =
            owned_action_at_step(player, rest, &doc.actions, step, tolerance, is_pass)
        {
            let fraction = effective_fraction(step_frac, delay_fraction(pass.delay, speed));
            ball.push(BallFlight {
                action_id: pass.id.clone(),
                passer: player.id.clone(),
                position: sample_path(pass.from, &pass.waypoints, pass.to, fraction),
                fraction,
            });
        }
    }

    Frame {
        progress,
        positions,
        ball,
    }
}

fn in_flight_position(
    doc: &PlayDocument,
    player: &Player,
    rest: Point,
    step: u32,
    step_frac: f32,
    speed: f32,
    tolerance: f32,
) -> Point {
    match moving_action_at_step(player, rest, &doc.actions, step, tolerance) {
        Some(action) => {
            let fraction = effective_fraction(step_frac, delay_fraction(action.delay, speed));
            sample_path(action.from, &action.waypoints, action.to, fraction)
        }
        None => rest,
    }
}

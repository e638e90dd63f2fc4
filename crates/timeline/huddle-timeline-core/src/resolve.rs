//! Step resolution: where a player rests at the start of a step.
//!
//! Ownership rule shared by every consumer of actions:
//! - an action with `player_id` belongs to that player;
//! - an action without one (legacy record) belongs to whichever player's running
//!   position lies within `tolerance` of its `from`. Several candidates resolve
//!   to the first in document order, and the ambiguity is logged.
//!
//! Explicit references always win over proximity within the same step.

use indexmap::IndexMap;
use log::warn;

use crate::data::{Action, ActionKind, PlayDocument, Player, Point};
use crate::ids::PlayerId;

/// Find the action `player` performs in `step`, restricted to kinds accepted by `kind_filter`.
pub fn owned_action_at_step<'a>(
    player: &Player,
    running: Point,
    actions: &'a [Action],
    step: u32,
    tolerance: f32,
    kind_filter: fn(ActionKind) -> bool,
) -> Option<&'a Action> {
    let in_step = || {
        actions
            .iter()
            .filter(move |a| a.step_index == step && kind_filter(a.kind))
    };

    if let Some(a) = in_step().find(|a| a.player_id.as_ref() == Some(&player.id)) {
        return Some(a);
    }

    let mut legacy =
        in_step().filter(|a| a.player_id.is_none() && a.from.distance(running) <= tolerance);
    let first = legacy.next()?;
    let extra = legacy.count();
    if extra > 0 {
        warn!(
            "player {} matches {} unowned actions in step {}; using '{}'",
            player.id,
            extra + 1,
            step,
            first.id
        );
    }
    Some(first)
}

/// Repositioning action (move, dribble, screen) the player performs in `step`.
#[inline]
pub fn moving_action_at_step<'a>(
    player: &Player,
    running: Point,
    actions: &'a [Action],
    step: u32,
    tolerance: f32,
) -> Option<&'a Action> {
    owned_action_at_step(player, running, actions, step, tolerance, ActionKind::repositions)
}

/// Resting position of `player` before any action of `target_step` begins:
/// every step `< target_step` fully applied.
pub fn resolve_position_at_step(
    player: &Player,
    actions: &[Action],
    target_step: u32,
    tolerance: f32,
) -> Point {
    let mut pos = player.base();
    for step in 0..target_step {
        if let Some(a) = moving_action_at_step(player, pos, actions, step, tolerance) {
            pos = a.to;
        }
    }
    pos
}

/// Resting positions of every player at `step`, in document order.
pub fn resolve_all_at_step(
    doc: &PlayDocument,
    step: u32,
    tolerance: f32,
) -> IndexMap<PlayerId, Point> {
    doc.players
        .iter()
        .map(|p| {
            (
                p.id.clone(),
                resolve_position_at_step(p, &doc.actions, step, tolerance),
            )
        })
        .collect()
}

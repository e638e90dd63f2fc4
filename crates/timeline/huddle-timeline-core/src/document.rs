//! Editor operations on a [`PlayDocument`].
//!
//! These keep the document in the shape the timeline expects: every new action
//! carries its owner and starts where the owner rests at the start of its step.

use log::debug;

use crate::config::validate_speed;
use crate::data::{Action, ActionKind, PlayDocument, Player, Point, Role, Team};
use crate::error::{PlayError, PlayResult};
use crate::ids::{ActionId, PlayerId};
use crate::resolve::{moving_action_at_step, resolve_position_at_step};

/// Distance, in canvas units, a screener stops short of the teammate it screens for.
pub const SCREEN_OFFSET: f32 = 30.0;

/// Parameters for [`PlayDocument::append_action`].
#[derive(Clone, Debug, PartialEq)]
pub struct NewAction {
    pub player: PlayerId,
    pub kind: ActionKind,
    pub step: u32,
    pub to: Point,
    pub waypoints: Vec<Point>,
    pub delay: f32,
}

impl NewAction {
    pub fn new(player: PlayerId, kind: ActionKind, step: u32, to: Point) -> Self {
        Self {
            player,
            kind,
            step,
            to,
            waypoints: Vec::new(),
            delay: 0.0,
        }
    }

    pub fn with_waypoints(mut self, waypoints: Vec<Point>) -> Self {
        self.waypoints = waypoints;
        self
    }

    /// Seconds to wait after the step starts. Only the sign is checked on append; playback
    /// caps it at [`MAX_DELAY_FRACTION`](crate::interp::MAX_DELAY_FRACTION) of a step.
    /// [`PlayDocument::set_delay`] checks it against a speed.
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }
}

/// Point `SCREEN_OFFSET` away from `teammate`, on the side facing `screener`.
/// Falls back to directly above the teammate when the two coincide.
pub fn screen_position(screener: Point, teammate: Point) -> Point {
    let dx = screener.x - teammate.x;
    let dy = screener.y - teammate.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON {
        return Point::new(teammate.x, teammate.y - SCREEN_OFFSET);
    }
    Point::new(
        teammate.x + dx / len * SCREEN_OFFSET,
        teammate.y + dy / len * SCREEN_OFFSET,
    )
}

impl PlayDocument {
    /// Place a new player. Numbers are unique per team; roles are single-slot per team.
    pub fn add_player(
        &mut self,
        team: Team,
        number: u32,
        role: Option<Role>,
        at: Point,
    ) -> PlayResult<PlayerId> {
        if self.players.iter().any(|p| p.team == team && p.number == number) {
            return Err(PlayError::NumberTaken { team, number });
        }
        if let Some(role) = role {
            if self
                .players
                .iter()
                .any(|p| p.team == team && p.position == Some(role))
            {
                return Err(PlayError::RoleTaken { team, role });
            }
        }
        let id = PlayerId::generate();
        self.players.push(Player {
            id: id.clone(),
            x: at.x,
            y: at.y,
            team,
            number,
            position: role,
        });
        Ok(id)
    }

    /// Remove a player together with the actions it owns.
    pub fn remove_player(&mut self, id: &PlayerId) -> PlayResult<Player> {
        let idx = self
            .players
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| PlayError::UnknownPlayer(id.clone()))?;
        let before = self.actions.len();
        self.actions.retain(|a| a.player_id.as_ref() != Some(id));
        debug!(
            "removed player {id} and {} owned actions",
            before - self.actions.len()
        );
        Ok(self.players.remove(idx))
    }

    /// Append an action whose `from` is the owner's resting position at `step`.
    /// Rejects a second repositioning action for the same player and step.
    pub fn append_action(&mut self, new: NewAction, tolerance: f32) -> PlayResult<ActionId> {
        let player = self
            .player(&new.player)
            .ok_or_else(|| PlayError::UnknownPlayer(new.player.clone()))?;
        let from = resolve_position_at_step(player, &self.actions, new.step, tolerance);

        if new.kind.repositions()
            && moving_action_at_step(player, from, &self.actions, new.step, tolerance).is_some()
        {
            return Err(PlayError::StepOccupied {
                player: new.player,
                step: new.step,
            });
        }
        if !new.delay.is_finite() || new.delay < 0.0 {
            return Err(PlayError::validation(format!(
                "delay {}s must be finite and >= 0",
                new.delay
            )));
        }

        let id = ActionId::generate();
        self.actions.push(Action {
            id: id.clone(),
            kind: new.kind,
            player_id: Some(new.player),
            from,
            to: new.to,
            waypoints: new.waypoints,
            step_index: new.step,
            delay: new.delay,
        });
        Ok(id)
    }

    /// Append a screen that takes `screener` next to where `teammate` rests at `step`.
    pub fn append_screen_for(
        &mut self,
        screener: &PlayerId,
        teammate: &PlayerId,
        step: u32,
        tolerance: f32,
    ) -> PlayResult<ActionId> {
        let screener_at = self
            .player(screener)
            .map(|p| resolve_position_at_step(p, &self.actions, step, tolerance))
            .ok_or_else(|| PlayError::UnknownPlayer(screener.clone()))?;
        let teammate_at = self
            .player(teammate)
            .map(|p| resolve_position_at_step(p, &self.actions, step, tolerance))
            .ok_or_else(|| PlayError::UnknownPlayer(teammate.clone()))?;
        let to = screen_position(screener_at, teammate_at);
        self.append_action(
            NewAction::new(screener.clone(), ActionKind::Screen, step, to),
            tolerance,
        )
    }

    pub fn remove_action(&mut self, id: &ActionId) -> PlayResult<Action> {
        let idx = self
            .actions
            .iter()
            .position(|a| &a.id == id)
            .ok_or_else(|| PlayError::UnknownAction(id.clone()))?;
        Ok(self.actions.remove(idx))
    }

    /// Drop every action in `step`; returns how many were removed.
    pub fn clear_step(&mut self, step: u32) -> usize {
        let before = self.actions.len();
        self.actions.retain(|a| a.step_index != step);
        before - self.actions.len()
    }

    pub fn clear_actions(&mut self) {
        self.actions.clear();
    }

    /// Set an action's delay. It must leave room to move within one step at `speed`.
    pub fn set_delay(&mut self, id: &ActionId, delay: f32, speed: f32) -> PlayResult<()> {
        validate_speed(speed)?;
        let max = 1.0 / speed;
        if !delay.is_finite() || delay < 0.0 || delay >= max {
            return Err(PlayError::InvalidDelay { delay, max });
        }
        let action = self
            .actions
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| PlayError::UnknownAction(id.clone()))?;
        action.delay = delay;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 45.0;

    #[test]
    fn role_and_number_slots_are_exclusive_per_team() {
        let mut doc = PlayDocument::new("slots");
        doc.add_player(Team::Home, 1, Some(Role::PointGuard), Point::new(0.0, 0.0))
            .unwrap();
        assert_eq!(
            doc.add_player(Team::Home, 1, None, Point::new(5.0, 5.0)),
            Err(PlayError::NumberTaken {
                team: Team::Home,
                number: 1
            })
        );
        assert_eq!(
            doc.add_player(Team::Home, 2, Some(Role::PointGuard), Point::new(5.0, 5.0)),
            Err(PlayError::RoleTaken {
                team: Team::Home,
                role: Role::PointGuard
            })
        );
        // Other team may reuse both.
        assert!(doc
            .add_player(Team::Away, 1, Some(Role::PointGuard), Point::new(9.0, 9.0))
            .is_ok());
    }

    #[test]
    fn appended_actions_start_from_the_resolved_position() {
        let mut doc = PlayDocument::new("chain");
        let p = doc
            .add_player(Team::Home, 3, None, Point::new(100.0, 100.0))
            .unwrap();
        doc.append_action(
            NewAction::new(p.clone(), ActionKind::Move, 0, Point::new(200.0, 100.0)),
            TOL,
        )
        .unwrap();
        let second = doc
            .append_action(
                NewAction::new(p.clone(), ActionKind::Dribble, 1, Point::new(200.0, 300.0)),
                TOL,
            )
            .unwrap();
        assert_eq!(doc.action(&second).unwrap().from, Point::new(200.0, 100.0));
        assert_eq!(doc.total_steps(), 2);

        let dup = doc.append_action(
            NewAction::new(p.clone(), ActionKind::Move, 1, Point::new(0.0, 0.0)),
            TOL,
        );
        assert!(matches!(dup, Err(PlayError::StepOccupied { step: 1, .. })));

        // A pass in the same step is not a second movement.
        assert!(doc
            .append_action(
                NewAction::new(p, ActionKind::Pass, 1, Point::new(400.0, 400.0)),
                TOL,
            )
            .is_ok());
    }

    #[test]
    fn screen_for_teammate_stops_short_on_the_screener_side() {
        let mut doc = PlayDocument::new("screen");
        let screener = doc
            .add_player(Team::Home, 5, None, Point::new(100.0, 200.0))
            .unwrap();
        let handler = doc
            .add_player(Team::Home, 1, None, Point::new(300.0, 200.0))
            .unwrap();
        let id = doc.append_screen_for(&screener, &handler, 0, TOL).unwrap();
        let screen = doc.action(&id).unwrap();
        assert_eq!(screen.kind, ActionKind::Screen);
        assert!((screen.to.x - (300.0 - SCREEN_OFFSET)).abs() < 1e-4);
        assert!((screen.to.y - 200.0).abs() < 1e-4);
    }

    #[test]
    fn delay_must_fit_inside_one_step() {
        let mut doc = PlayDocument::new("delay");
        let p = doc.add_player(Team::Home, 1, None, Point::new(0.0, 0.0)).unwrap();
        let a = doc
            .append_action(NewAction::new(p, ActionKind::Move, 0, Point::new(50.0, 0.0)), TOL)
            .unwrap();
        assert!(doc.set_delay(&a, 0.4, 2.0).is_ok());
        assert_eq!(doc.action(&a).unwrap().delay, 0.4);
        assert!(matches!(
            doc.set_delay(&a, 0.5, 2.0),
            Err(PlayError::InvalidDelay { .. })
        ));
        assert!(doc.set_delay(&ActionId::from("nope"), 0.1, 1.0).is_err());
    }

    #[test]
    fn appended_delay_is_kept_and_negative_delay_is_rejected() {
        let mut doc = PlayDocument::new("append delay");
        let p = doc.add_player(Team::Home, 1, None, Point::new(0.0, 0.0)).unwrap();
        let bad = doc.append_action(
            NewAction::new(p.clone(), ActionKind::Move, 0, Point::new(50.0, 0.0)).with_delay(-0.1),
            TOL,
        );
        assert!(matches!(bad, Err(PlayError::Validation(_))));
        assert!(doc.actions.is_empty());

        let a = doc
            .append_action(
                NewAction::new(p, ActionKind::Move, 0, Point::new(50.0, 0.0)).with_delay(0.3),
                TOL,
            )
            .unwrap();
        assert_eq!(doc.action(&a).unwrap().delay, 0.3);
    }

    #[test]
    fn removing_a_player_drops_its_actions_and_clear_step_is_scoped() {
        let mut doc = PlayDocument::new("rm");
        let a = doc.add_player(Team::Home, 1, None, Point::new(0.0, 0.0)).unwrap();
        let b = doc.add_player(Team::Home, 2, None, Point::new(300.0, 0.0)).unwrap();
        doc.append_action(NewAction::new(a.clone(), ActionKind::Move, 0, Point::new(10.0, 0.0)), TOL)
            .unwrap();
        doc.append_action(NewAction::new(b.clone(), ActionKind::Move, 0, Point::new(310.0, 0.0)), TOL)
            .unwrap();
        doc.append_action(NewAction::new(b.clone(), ActionKind::Move, 1, Point::new(320.0, 0.0)), TOL)
            .unwrap();

        doc.remove_player(&a).unwrap();
        assert_eq!(doc.actions.len(), 2);
        assert_eq!(doc.clear_step(0), 1);
        assert_eq!(doc.actions.len(), 1);
        assert_eq!(doc.actions[0].step_index, 1);
        assert!(doc.validate().is_ok());
    }
}

//! Canonical play document model: players, actions and the implicit step count.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PlayError, PlayResult};
use crate::ids::{ActionId, PlayerId};

/// Width of the authoring canvas in canvas units.
pub const CANVAS_WIDTH: f32 = 800.0;
/// Height of the authoring canvas in canvas units.
pub const CANVAS_HEIGHT: f32 = 500.0;

/// 2D point in canvas space.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// Offense.
    Home,
    /// Defense.
    Away,
}

/// Placement slot; each team fills a role at most once.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    PointGuard,
    ShootingGuard,
    SmallForward,
    PowerForward,
    Center,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    /// Base (step 0) position.
    pub x: f32,
    pub y: f32,
    pub team: Team,
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Role>,
}

impl Player {
    #[inline]
    pub fn base(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Pass,
    Move,
    Screen,
    Dribble,
}

impl ActionKind {
    /// Whether completing this action leaves the acting player at `to`.
    /// A pass sends the ball, the passer stays put.
    #[inline]
    pub fn repositions(self) -> bool {
        !matches!(self, ActionKind::Pass)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: ActionId,
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Acting player. `None` only for legacy records matched by position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    pub from: Point,
    pub to: Point,
    /// Intermediate points of a free-drawn path, in drawing order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub waypoints: Vec<Point>,
    pub step_index: u32,
    /// Seconds after step start before motion begins.
    #[serde(default)]
    pub delay: f32,
}

impl Action {
    /// Full polyline `[from, waypoints.., to]`.
    pub fn path(&self) -> Vec<Point> {
        let mut pts = Vec::with_capacity(self.waypoints.len() + 2);
        pts.push(self.from);
        pts.extend_from_slice(&self.waypoints);
        pts.push(self.to);
        pts
    }
}

/// A play: ordered players and actions. Steps are implicit in `step_index`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PlayDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl PlayDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// `max(step_index) + 1`, or 1 for a play without actions.
    pub fn total_steps(&self) -> u32 {
        self.actions
            .iter()
            .map(|a| a.step_index)
            .max()
            .map_or(1, |m| m.saturating_add(1))
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn action(&self, id: &ActionId) -> Option<&Action> {
        self.actions.iter().find(|a| &a.id == id)
    }

    /// Actions in a given step, in document order.
    pub fn actions_in_step(&self, step: u32) -> impl Iterator<Item = &Action> {
        self.actions.iter().filter(move |a| a.step_index == step)
    }

    /// Validate structural invariants of the document.
    pub fn validate(&self) -> PlayResult<()> {
        let mut player_ids = HashSet::new();
        let mut numbers = HashSet::new();
        let mut roles = HashSet::new();
        for p in &self.players {
            if !player_ids.insert(&p.id) {
                return Err(PlayError::validation(format!("duplicate player id '{}'", p.id)));
            }
            if !p.base().is_finite() {
                return Err(PlayError::validation(format!(
                    "player '{}' has a non-finite position",
                    p.id
                )));
            }
            if !numbers.insert((p.team, p.number)) {
                return Err(PlayError::NumberTaken {
                    team: p.team,
                    number: p.number,
                });
            }
            if let Some(role) = p.position {
                if !roles.insert((p.team, role)) {
                    return Err(PlayError::RoleTaken { team: p.team, role });
                }
            }
        }

        let mut action_ids = HashSet::new();
        let mut owned_steps = HashSet::new();
        for a in &self.actions {
            if !action_ids.insert(&a.id) {
                return Err(PlayError::validation(format!("duplicate action id '{}'", a.id)));
            }
            if !a.from.is_finite() || !a.to.is_finite() || !a.waypoints.iter().all(|w| w.is_finite())
            {
                return Err(PlayError::validation(format!(
                    "action '{}' has non-finite coordinates",
                    a.id
                )));
            }
            if !a.delay.is_finite() || a.delay < 0.0 {
                return Err(PlayError::validation(format!(
                    "action '{}' has a negative or non-finite delay",
                    a.id
                )));
            }
            if let Some(owner) = &a.player_id {
                if !player_ids.contains(owner) {
                    return Err(PlayError::UnknownPlayer(owner.clone()));
                }
                if a.kind.repositions() && !owned_steps.insert((owner, a.step_index)) {
                    return Err(PlayError::StepOccupied {
                        player: owner.clone(),
                        step: a.step_index,
                    });
                }
            }
        }
        Ok(())
    }
}

//! Loader for plays saved by the editor.
//!
//! Saves flatten points into `fromX/fromY/toX/toY` and older ones carry no
//! `playerId`; both are normalized here so the rest of the crate only sees
//! owned, canonical [`PlayDocument`]s.

use log::{debug, warn};
use serde::Deserialize;

use crate::data::{Action, ActionKind, PlayDocument, Player, Point, Role, Team};
use crate::error::{PlayError, PlayResult};
use crate::ids::{ActionId, PlayerId};

/// Public API: parse a persisted play (flat `fromX/fromY/toX/toY` records, as saved by the
/// editor) into the canonical [`PlayDocument`].
///
/// Notes:
/// - Team and role strings accept the editor's aliases (`offense`/`defense`, `PG`..`C`).
/// - Records without `playerId` are bound to players by proximity, see [`bind_legacy_owners`].
/// - The result is validated before it is returned.
pub fn parse_play_json(s: &str, tolerance: f32) -> PlayResult<PlayDocument> {
    let stored: StoredPlay =
        serde_json::from_str(s).map_err(|e| PlayError::parse(format!("parse error: {e}")))?;

    let mut players = Vec::with_capacity(stored.players.len());
    for sp in stored.players {
        players.push(Player {
            id: sp.id,
            x: sp.x,
            y: sp.y,
            team: parse_team(&sp.team)?,
            number: sp.number,
            position: sp.position.as_deref().map(parse_role).transpose()?,
        });
    }

    let mut actions = Vec::with_capacity(stored.actions.len());
    for sa in stored.actions {
        actions.push(Action {
            id: sa.id,
            kind: parse_kind(&sa.kind)?,
            player_id: sa.player_id,
            from: Point::new(sa.from_x, sa.from_y),
            to: Point::new(sa.to_x, sa.to_y),
            waypoints: sa
                .waypoints
                .into_iter()
                .map(|w| Point::new(w.x, w.y))
                .collect(),
            step_index: sa.step_index,
            delay: sa.delay.unwrap_or(0.0),
        });
    }

    let mut doc = PlayDocument {
        name: stored.name.unwrap_or_default(),
        players,
        actions,
    };
    let bound = bind_legacy_owners(&mut doc, tolerance);
    if bound > 0 {
        debug!("bound {bound} legacy actions in play '{}'", doc.name);
    }
    doc.validate()?;
    Ok(doc)
}

/// Give every unowned action an owner, step by step, using each player's running position.
///
/// Repositioning actions go to players that do not already move in that step; a pass goes
/// to the first player in document order within `tolerance`. Unmatched actions stay unowned.
/// Returns the number of actions bound.
pub fn bind_legacy_owners(doc: &mut PlayDocument, tolerance: f32) -> usize {
    let mut running: Vec<Point> = doc.players.iter().map(Player::base).collect();
    let mut bound = 0;

    for step in 0..doc.total_steps() {
        for (pi, player) in doc.players.iter().enumerate() {
            let moves_already = doc
                .actions_in_step(step)
                .any(|a| a.kind.repositions() && a.player_id.as_ref() == Some(&player.id));
            if moves_already {
                continue;
            }
            if let Some(a) = doc.actions.iter_mut().find(|a| {
                a.step_index == step
                    && a.kind.repositions()
                    && a.player_id.is_none()
                    && a.from.distance(running[pi]) <= tolerance
            }) {
                a.player_id = Some(player.id.clone());
                bound += 1;
            }
        }

        for a in doc
            .actions
            .iter_mut()
            .filter(|a| a.step_index == step && a.player_id.is_none())
        {
            match doc
                .players
                .iter()
                .zip(&running)
                .find(|(_, pos)| a.from.distance(**pos) <= tolerance)
            {
                Some((player, _)) if !a.kind.repositions() => {
                    a.player_id = Some(player.id.clone());
                    bound += 1;
                }
                _ => warn!("action '{}' in step {step} has no owner; it will not animate", a.id),
            }
        }

        for (pi, player) in doc.players.iter().enumerate() {
            if let Some(a) = doc
                .actions_in_step(step)
                .find(|a| a.kind.repositions() && a.player_id.as_ref() == Some(&player.id))
            {
                running[pi] = a.to;
            }
        }
    }
    bound
}

fn parse_team(s: &str) -> PlayResult<Team> {
    match s.to_ascii_lowercase().as_str() {
        "home" | "offense" => Ok(Team::Home),
        "away" | "defense" => Ok(Team::Away),
        other => Err(PlayError::parse(format!("unknown team '{other}'"))),
    }
}

fn parse_role(s: &str) -> PlayResult<Role> {
    match s.to_ascii_lowercase().as_str() {
        "pg" | "point_guard" | "pointguard" => Ok(Role::PointGuard),
        "sg" | "shooting_guard" | "shootingguard" => Ok(Role::ShootingGuard),
        "sf" | "small_forward" | "smallforward" => Ok(Role::SmallForward),
        "pf" | "power_forward" | "powerforward" => Ok(Role::PowerForward),
        "c" | "center" => Ok(Role::Center),
        other => Err(PlayError::parse(format!("unknown role '{other}'"))),
    }
}

fn parse_kind(s: &str) -> PlayResult<ActionKind> {
    match s.to_ascii_lowercase().as_str() {
        "pass" => Ok(ActionKind::Pass),
        "move" => Ok(ActionKind::Move),
        "screen" => Ok(ActionKind::Screen),
        "dribble" => Ok(ActionKind::Dribble),
        other => Err(PlayError::parse(format!("unknown action type '{other}'"))),
    }
}

// ----- JSON schema (serde) -----

#[derive(Deserialize)]
struct StoredPlay {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    players: Vec<StoredPlayer>,
    #[serde(default)]
    actions: Vec<StoredAction>,
}

#[derive(Deserialize)]
struct StoredPlayer {
    id: PlayerId,
    x: f32,
    y: f32,
    team: String,
    number: u32,
    #[serde(default)]
    position: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAction {
    id: ActionId,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    player_id: Option<PlayerId>,
    from_x: f32,
    from_y: f32,
    to_x: f32,
    to_y: f32,
    step_index: u32,
    #[serde(default)]
    waypoints: Vec<StoredPoint>,
    #[serde(default)]
    delay: Option<f32>,
}

#[derive(Deserialize)]
struct StoredPoint {
    x: f32,
    y: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &str = r#"{
        "name": "Horns",
        "players": [
            { "id": "pg", "x": 400, "y": 400, "team": "offense", "number": 1, "position": "PG" },
            { "id": "c",  "x": 300, "y": 250, "team": "offense", "number": 5, "position": "C" },
            { "id": "d1", "x": 400, "y": 350, "team": "defense", "number": 1 }
        ],
        "actions": [
            { "id": "a0", "type": "screen",  "fromX": 305, "fromY": 250, "toX": 380, "toY": 380, "stepIndex": 0 },
            { "id": "a1", "type": "dribble", "fromX": 400, "fromY": 400, "toX": 500, "toY": 300, "stepIndex": 1 },
            { "id": "a2", "type": "pass",    "fromX": 500, "fromY": 300, "toX": 380, "toY": 380, "stepIndex": 2 },
            { "id": "a3", "type": "move",    "fromX": 700, "fromY": 50,  "toX": 10,  "toY": 10,  "stepIndex": 2 }
        ]
    }"#;

    #[test]
    fn legacy_records_are_bound_along_running_positions() {
        let doc = parse_play_json(LEGACY, 45.0).unwrap();
        assert_eq!(doc.name, "Horns");
        assert_eq!(doc.players[0].position, Some(Role::PointGuard));
        assert_eq!(doc.players[2].team, Team::Away);

        let owner = |id: &str| {
            doc.action(&ActionId::from(id))
                .and_then(|a| a.player_id.as_ref())
                .map(|p| p.as_str().to_string())
        };
        assert_eq!(owner("a0").as_deref(), Some("c"));
        assert_eq!(owner("a1").as_deref(), Some("pg"));
        // The pass starts where pg ended step 1, not at its base.
        assert_eq!(owner("a2").as_deref(), Some("pg"));
        assert_eq!(owner("a3"), None);
    }

    #[test]
    fn owned_records_keep_their_owner_and_optional_fields() {
        let json = r#"{
            "players": [ { "id": "p", "x": 0, "y": 0, "team": "home", "number": 2 } ],
            "actions": [ {
                "id": "a", "type": "Move", "playerId": "p",
                "fromX": 0, "fromY": 0, "toX": 300, "toY": 0, "stepIndex": 0,
                "waypoints": [ { "x": 100, "y": 50 } ], "delay": 0.25
            } ]
        }"#;
        let doc = parse_play_json(json, 45.0).unwrap();
        let a = &doc.actions[0];
        assert_eq!(a.player_id, Some(PlayerId::from("p")));
        assert_eq!(a.waypoints, vec![Point::new(100.0, 50.0)]);
        assert_eq!(a.delay, 0.25);
        assert_eq!(doc.name, "");
    }

    #[test]
    fn rejects_unknown_enumerations_and_bad_json() {
        let bad_team = r#"{ "players": [ { "id": "p", "x": 0, "y": 0, "team": "refs", "number": 1 } ] }"#;
        assert!(matches!(parse_play_json(bad_team, 45.0), Err(PlayError::Parse(_))));
        assert!(matches!(parse_play_json("{", 45.0), Err(PlayError::Parse(_))));
    }
}

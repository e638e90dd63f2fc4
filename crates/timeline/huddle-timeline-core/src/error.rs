//! Error type for the fallible surfaces of the core (editing, loading, configuration).
//!
//! Resolution, interpolation and ticking never fail; see `timeline` and `driver`.

use thiserror::Error;

use crate::data::{Role, Team};
use crate::ids::{ActionId, PlayerId};

pub type PlayResult<T> = Result<T, PlayError>;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum PlayError {
    #[error("play parse error: {0}")]
    Parse(String),

    #[error("invalid play: {0}")]
    Validation(String),

    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("unknown action: {0}")]
    UnknownAction(ActionId),

    #[error("number {number} is already used by the {team:?} team")]
    NumberTaken { team: Team, number: u32 },

    #[error("{role:?} is already filled on the {team:?} team")]
    RoleTaken { team: Team, role: Role },

    #[error("player {player} already moves in step {step}")]
    StepOccupied { player: PlayerId, step: u32 },

    #[error("delay {delay}s must be within [0, {max}s)")]
    InvalidDelay { delay: f32, max: f32 },

    #[error("speed must be finite and > 0, got {0}")]
    InvalidSpeed(f32),
}

impl PlayError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<serde_json::Error> for PlayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(PlayError::parse("x").to_string().starts_with("play parse error:"));
        assert!(PlayError::validation("x").to_string().starts_with("invalid play:"));
        let err = PlayError::StepOccupied {
            player: PlayerId::from("p1"),
            step: 2,
        };
        assert_eq!(err.to_string(), "player p1 already moves in step 2");
    }

    #[test]
    fn serde_errors_become_parse_errors() {
        let err: PlayError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, PlayError::Parse(_)));
    }
}

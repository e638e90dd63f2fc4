//! Huddle Timeline Core (engine-agnostic)
//!
//! Play model, step resolution, progress interpolation and the frame-driven
//! playback driver for animated basketball plays. Rendering, input and
//! persistence live in adapters; this crate only turns a [`PlayDocument`]
//! and elapsed time into canvas positions and playback events.

pub mod config;
pub mod coords;
pub mod data;
pub mod document;
pub mod driver;
pub mod error;
pub mod ids;
pub mod interp;
pub mod outputs;
pub mod resolve;
pub mod smoothing;
pub mod stored_play;
pub mod timeline;

// Re-exports for consumers (adapters)
pub use config::Config;
pub use coords::{from_court_space, to_court_space, to_court_space_all, CourtMode, CourtPoint};
pub use data::{Action, ActionKind, PlayDocument, Player, Point, Role, Team};
pub use document::{screen_position, NewAction, SCREEN_OFFSET};
pub use driver::{
    tick, Phase, PlayDriver, PlaybackState, StartOutcome, TickOutcome, TickParams, PROGRESS_EPSILON,
};
pub use error::{PlayError, PlayResult};
pub use ids::{ActionId, PlayerId};
pub use interp::{catmull_rom_polyline, sample_path};
pub use outputs::{Outputs, PlaybackEvent, PlayerPosition};
pub use resolve::{resolve_all_at_step, resolve_position_at_step};
pub use smoothing::Smoother;
pub use stored_play::{bind_legacy_owners, parse_play_json};
pub use timeline::{interpolate, BallFlight, Frame};

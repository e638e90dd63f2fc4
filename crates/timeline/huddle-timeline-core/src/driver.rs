//! Playback driver: a pure `tick` over [`PlaybackState`] plus the [`PlayDriver`]
//! owner that hosts call once per display frame.
//!
//! Phases: Idle → Running → Holding → Idle.
//! - Running advances `progress` by `dt * speed` and reports each completed step.
//! - Reaching `total_steps` clamps progress, publishes the resolved end
//!   positions and holds for `hold_seconds` before reporting the end.
//! - `stop()` returns to Idle from any phase without an end notification.

use std::fmt;

use indexmap::IndexMap;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::{validate_speed, Config};
use crate::data::{PlayDocument, Point};
use crate::error::PlayResult;
use crate::ids::PlayerId;
use crate::outputs::{Outputs, PlaybackEvent};
use crate::resolve::resolve_all_at_step;
use crate::timeline::{interpolate, Frame};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Running,
    /// End reached; `remaining` seconds of real time before the end is reported.
    Holding { remaining: f32 },
}

/// Progress within this distance of the last step counts as the end.
pub const PROGRESS_EPSILON: f32 = 1e-4;

/// Ephemeral playback state. Never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub phase: Phase,
    /// Completed steps, in `[0, total_steps]`.
    pub progress: f32,
}

impl PlaybackState {
    pub const IDLE: PlaybackState = PlaybackState {
        phase: Phase::Idle,
        progress: 0.0,
    };

    pub const fn running() -> Self {
        Self {
            phase: Phase::Running,
            progress: 0.0,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running)
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::IDLE
    }
}

/// Inputs to one tick that do not change between ticks of the same playback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickParams {
    pub speed: f32,
    pub total_steps: u32,
    pub hold_seconds: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TickOutcome {
    pub state: PlaybackState,
    pub events: Vec<PlaybackEvent>,
}

/// Advance `state` by `dt` seconds of real time. Negative or non-finite `dt` counts as 0.
pub fn tick(state: PlaybackState, dt: f32, params: &TickParams) -> TickOutcome {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let mut events = Vec::new();

    let state = match state.phase {
        Phase::Idle => state,
        Phase::Running => {
            let total = params.total_steps as f32;
            let before = state.progress;
            let mut after = before + dt * params.speed;
            // f32 accumulation of frame deltas lands just short of the end (60 x 1/60 = 0.9999997).
            if !after.is_finite() || after >= total - PROGRESS_EPSILON {
                after = total;
            }

            let first = before.floor() as u32 + 1;
            let last = after.floor() as u32;
            for boundary in first..=last {
                events.push(PlaybackEvent::StepCompleted { step: boundary - 1 });
            }

            if after >= total {
                events.push(PlaybackEvent::ReachedEnd {
                    total_steps: params.total_steps,
                });
                PlaybackState {
                    phase: Phase::Holding {
                        remaining: params.hold_seconds,
                    },
                    progress: total,
                }
            } else {
                PlaybackState {
                    phase: Phase::Running,
                    progress: after,
                }
            }
        }
        Phase::Holding { remaining } => {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                events.push(PlaybackEvent::PlaybackEnded);
                PlaybackState::IDLE
            } else {
                PlaybackState {
                    phase: Phase::Holding { remaining },
                    progress: state.progress,
                }
            }
        }
    };

    TickOutcome { state, events }
}

/// Result of [`PlayDriver::start`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StartOutcome {
    Started,
    /// Playback was already running; nothing changed.
    AlreadyRunning,
}

type EndedListener = Box<dyn FnMut()>;

/// Owns a play document and its playback state; one timeline at a time.
pub struct PlayDriver {
    cfg: Config,
    doc: PlayDocument,
    total_steps: u32,
    state: PlaybackState,
    pending: Vec<PlaybackEvent>,
    publish_end_frame: bool,
    ended_listeners: Vec<EndedListener>,
    outputs: Outputs,
}

impl fmt::Debug for PlayDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayDriver")
            .field("cfg", &self.cfg)
            .field("play", &self.doc.name)
            .field("total_steps", &self.total_steps)
            .field("state", &self.state)
            .field("ended_listeners", &self.ended_listeners.len())
            .finish()
    }
}

impl PlayDriver {
    /// Create a driver with an empty play.
    pub fn new(cfg: Config) -> PlayResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            doc: PlayDocument::default(),
            total_steps: 1,
            state: PlaybackState::IDLE,
            pending: Vec::new(),
            publish_end_frame: false,
            ended_listeners: Vec::new(),
            outputs: Outputs::default(),
        })
    }

    /// Convenience: create a driver and load `doc`.
    pub fn with_document(cfg: Config, doc: PlayDocument) -> PlayResult<Self> {
        let mut driver = Self::new(cfg)?;
        driver.set_document(doc);
        Ok(driver)
    }

    /// Replace the play. Any running playback is stopped first.
    pub fn set_document(&mut self, doc: PlayDocument) {
        self.stop();
        self.total_steps = doc.total_steps();
        debug!("loaded play '{}' with {} steps", doc.name, self.total_steps);
        self.doc = doc;
    }

    pub fn document(&self) -> &PlayDocument {
        &self.doc
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn progress(&self) -> f32 {
        self.state.progress
    }

    /// True only while progress is advancing (not while holding at the end).
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn speed(&self) -> f32 {
        self.cfg.speed
    }

    pub fn set_speed(&mut self, speed: f32) -> PlayResult<()> {
        validate_speed(speed)?;
        self.cfg.speed = speed;
        Ok(())
    }

    /// Register a callback fired once each time playback finishes on its own.
    pub fn on_ended(&mut self, listener: impl FnMut() + 'static) {
        self.ended_listeners.push(Box::new(listener));
    }

    /// Begin playback from progress 0. Idle and Holding both restart;
    /// Running reports `AlreadyRunning` and leaves playback untouched.
    pub fn start(&mut self) -> StartOutcome {
        if self.state.is_running() {
            debug!("start ignored: already running at {}", self.state.progress);
            return StartOutcome::AlreadyRunning;
        }
        self.begin();
        StartOutcome::Started
    }

    /// Begin playback from progress 0 regardless of the current phase.
    pub fn restart(&mut self) {
        self.begin();
    }

    fn begin(&mut self) {
        self.pending.clear();
        self.publish_end_frame = false;
        self.pending.push(PlaybackEvent::PlaybackStarted {
            total_steps: self.total_steps,
        });

        if self.doc.actions.is_empty() {
            // Nothing moves: go straight to the end pause.
            self.state = PlaybackState {
                phase: Phase::Holding {
                    remaining: self.cfg.hold_seconds,
                },
                progress: self.total_steps as f32,
            };
            self.pending.push(PlaybackEvent::ReachedEnd {
                total_steps: self.total_steps,
            });
            self.publish_end_frame = true;
        } else {
            self.state = PlaybackState::running();
        }
        debug!("playback started ({} steps)", self.total_steps);
    }

    /// Return to Idle immediately. No end notification follows.
    /// Returns whether playback was active.
    pub fn stop(&mut self) -> bool {
        let was_active = !matches!(self.state.phase, Phase::Idle);
        self.pending.clear();
        self.publish_end_frame = false;
        if was_active {
            self.pending.push(PlaybackEvent::PlaybackStopped {
                progress: self.state.progress,
            });
            debug!("playback stopped at {}", self.state.progress);
        }
        self.state = PlaybackState::IDLE;
        was_active
    }

    fn tick_params(&self) -> TickParams {
        TickParams {
            speed: self.cfg.speed,
            total_steps: self.total_steps,
            hold_seconds: self.cfg.hold_seconds,
        }
    }

    /// Advance by `dt` seconds of real time and publish this tick's outputs.
    pub fn update(&mut self, dt: f32) -> &Outputs {
        self.outputs.clear();
        self.outputs.events.append(&mut self.pending);

        let TickOutcome { state, events } = tick(self.state, dt, &self.tick_params());
        self.state = state;
        trace!("tick dt={dt} -> {:?}", self.state);

        let reached_end = events
            .iter()
            .any(|e| matches!(e, PlaybackEvent::ReachedEnd { .. }));
        let ended = events
            .iter()
            .any(|e| matches!(e, PlaybackEvent::PlaybackEnded));
        self.outputs.events.extend(events);

        let publish_end = std::mem::take(&mut self.publish_end_frame);
        if self.state.is_running() || reached_end || publish_end {
            let frame = self.frame_at(self.state.progress);
            self.outputs.publish(frame);
        }

        if ended {
            debug!("playback ended");
            for listener in self.ended_listeners.iter_mut() {
                listener();
            }
        }

        self.outputs.events.truncate(self.cfg.max_events_per_tick);
        &self.outputs
    }

    /// Last published outputs.
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Evaluate the play at any progress without touching playback state.
    pub fn frame_at(&self, progress: f32) -> Frame {
        interpolate(
            &self.doc,
            progress,
            self.cfg.speed,
            self.cfg.match_tolerance,
        )
    }

    /// Resting positions at the start of `step`, for the editing view.
    pub fn positions_at_step(&self, step: u32) -> IndexMap<PlayerId, Point> {
        resolve_all_at_step(&self.doc, step, self.cfg.match_tolerance)
    }
}

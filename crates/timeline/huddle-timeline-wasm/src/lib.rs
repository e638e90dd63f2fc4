use js_sys::{Function, JSON};
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use huddle_timeline_core::{
    catmull_rom_polyline, from_court_space, parse_play_json, to_court_space, to_court_space_all,
    ActionId, Config, CourtMode, CourtPoint, Outputs, PlayDocument, PlayDriver, PlayError,
    PlayerId, PlayerPosition, Point, Smoother, StartOutcome,
};

/// Play playback for the browser: owns one driver plus the cosmetic smoother.
#[wasm_bindgen]
pub struct HuddlePlayback {
    core: PlayDriver,
    smoother: Smoother,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn play_error(context: &str, e: PlayError) -> JsError {
    JsError::new(&format!("{context}: {e}"))
}

/// Serialize with plain JS objects for maps so hosts can index by player id.
fn to_js<T: Serialize + ?Sized>(value: &T, context: &str) -> Result<JsValue, JsError> {
    value
        .serialize(&swb::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("{context} error: {e}")))
}

fn court_mode_arg(mode: JsValue) -> Result<CourtMode, JsError> {
    if jsvalue_is_undefined_or_null(&mode) {
        return Ok(CourtMode::default());
    }
    swb::from_value(mode).map_err(|e| JsError::new(&format!("court mode error: {e}")))
}

/// Rendered player: smoothed canvas position and its court-space mapping.
#[derive(Serialize)]
struct DrawnPlayer<'a> {
    player: &'a PlayerId,
    canvas: Point,
    court: CourtPoint,
}

/// Display curve of one action in both spaces.
#[derive(Serialize)]
struct PathCurve {
    canvas: Vec<Point>,
    court: Vec<CourtPoint>,
}

#[derive(Serialize)]
struct UpdateView<'a> {
    #[serde(flatten)]
    outputs: &'a Outputs,
    drawn: Vec<DrawnPlayer<'a>>,
    running: bool,
}

impl HuddlePlayback {
    fn install(&mut self, doc: PlayDocument) {
        self.core.set_document(doc);
        self.smoother.reset();
    }
}

#[wasm_bindgen]
impl HuddlePlayback {
    /// Create a playback instance. Pass a JSON config object or undefined/null for defaults.
    /// Example:
    ///   new HuddlePlayback({ speed: 1.5, court_mode: "half" })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<HuddlePlayback, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let smoother = Smoother::new(cfg.smoothing);
        let core = PlayDriver::new(cfg).map_err(|e| play_error("config error", e))?;
        Ok(HuddlePlayback { core, smoother })
    }

    /// Load a persisted play, either as a JSON string or a plain JS object.
    /// Unowned legacy actions are bound to players on load. Returns the step count.
    #[wasm_bindgen(js_name = loadPlay)]
    pub fn load_play(&mut self, play: JsValue) -> Result<u32, JsError> {
        if jsvalue_is_undefined_or_null(&play) {
            return Err(JsError::new("loadPlay: play is null/undefined"));
        }
        let s = match play.as_string() {
            Some(s) => s,
            None => JSON::stringify(&play)
                .map_err(|e| JsError::new(&format!("loadPlay stringify error: {:?}", e)))?
                .as_string()
                .ok_or_else(|| JsError::new("loadPlay: stringify produced non-string"))?,
        };
        let doc = parse_play_json(&s, self.core.config().match_tolerance)
            .map_err(|e| play_error("loadPlay", e))?;
        self.install(doc);
        Ok(self.core.total_steps())
    }

    /// Load a document already in the core's canonical shape (`from`/`to` points).
    #[wasm_bindgen(js_name = loadDocument)]
    pub fn load_document(&mut self, doc: JsValue) -> Result<u32, JsError> {
        let doc: PlayDocument = swb::from_value(doc)
            .map_err(|e| JsError::new(&format!("loadDocument parse error: {e}")))?;
        doc.validate().map_err(|e| play_error("loadDocument", e))?;
        self.install(doc);
        Ok(self.core.total_steps())
    }

    /// Begin playback. Returns false when playback was already running.
    #[wasm_bindgen]
    pub fn start(&mut self) -> bool {
        match self.core.start() {
            StartOutcome::Started => {
                self.smoother.reset();
                true
            }
            StartOutcome::AlreadyRunning => false,
        }
    }

    #[wasm_bindgen]
    pub fn restart(&mut self) {
        self.core.restart();
        self.smoother.reset();
    }

    /// Stop immediately; no end callback follows. Returns whether playback was active.
    #[wasm_bindgen]
    pub fn stop(&mut self) -> bool {
        self.smoother.reset();
        self.core.stop()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.core.is_running()
    }

    #[wasm_bindgen]
    pub fn progress(&self) -> f32 {
        self.core.progress()
    }

    #[wasm_bindgen(js_name = totalSteps)]
    pub fn total_steps(&self) -> u32 {
        self.core.total_steps()
    }

    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&mut self, speed: f32) -> Result<(), JsError> {
        self.core
            .set_speed(speed)
            .map_err(|e| play_error("setSpeed", e))
    }

    /// Register `callback()` to run each time playback finishes on its own.
    #[wasm_bindgen(js_name = onEnded)]
    pub fn on_ended(&mut self, callback: Function) {
        self.core.on_ended(move || {
            if let Err(e) = callback.call0(&JsValue::UNDEFINED) {
                log::warn!("onEnded callback threw: {e:?}");
            }
        });
    }

    /// Advance by dt seconds. Returns `{ progress, positions, ball, events, drawn, running }`,
    /// where `drawn` holds smoothed positions with their court-space mapping.
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32) -> Result<JsValue, JsError> {
        let mode = self.core.config().court_mode;
        self.core.update(dt);
        let running = self.core.is_running();
        let out = self.core.outputs();
        let drawn = if out.positions.is_empty() {
            Vec::new()
        } else {
            self.smoother
                .smooth(out.positions.iter().map(|p| (&p.player, &p.position)), dt)
                .iter()
                .map(|(player, canvas)| DrawnPlayer {
                    player,
                    canvas: *canvas,
                    court: to_court_space(*canvas, mode),
                })
                .collect()
        };
        let view = UpdateView {
            outputs: out,
            drawn,
            running,
        };
        to_js(&view, "outputs")
    }

    /// Resting positions at the start of `step`: `[{ player, position }]`.
    #[wasm_bindgen(js_name = positionsAtStep)]
    pub fn positions_at_step(&self, step: u32) -> Result<JsValue, JsError> {
        let positions: Vec<PlayerPosition> = self
            .core
            .positions_at_step(step)
            .into_iter()
            .map(|(player, position)| PlayerPosition { player, position })
            .collect();
        to_js(&positions, "positionsAtStep")
    }

    /// Smoothed drawing of an action's path (`samples` points per span): `{ canvas, court }`.
    /// Display only; players still move along the straight segments.
    #[wasm_bindgen(js_name = pathCurve)]
    pub fn path_curve(&self, action_id: String, samples: usize) -> Result<JsValue, JsError> {
        let id = ActionId(action_id);
        let action = self
            .core
            .document()
            .action(&id)
            .ok_or_else(|| play_error("pathCurve", PlayError::UnknownAction(id.clone())))?;
        let canvas = catmull_rom_polyline(&action.path(), samples);
        let court = to_court_space_all(&canvas, self.core.config().court_mode);
        to_js(&PathCurve { canvas, court }, "pathCurve")
    }

    /// Evaluate the play at `progress` without touching playback state.
    #[wasm_bindgen(js_name = frameAt)]
    pub fn frame_at(&self, progress: f32) -> Result<JsValue, JsError> {
        to_js(&self.core.frame_at(progress), "frameAt")
    }
}

/// Map a canvas point to court space. `mode` is "full" (default) or "half".
#[wasm_bindgen(js_name = toCourtSpace)]
pub fn to_court_space_js(x: f32, y: f32, mode: JsValue) -> Result<JsValue, JsError> {
    let mode = court_mode_arg(mode)?;
    to_js(
        &to_court_space(Point::new(x, y), mode),
        "toCourtSpace",
    )
}

/// Inverse of `toCourtSpace`; the court `y` (height) is not needed.
#[wasm_bindgen(js_name = fromCourtSpace)]
pub fn from_court_space_js(px: f32, pz: f32, mode: JsValue) -> Result<JsValue, JsError> {
    let mode = court_mode_arg(mode)?;
    to_js(&from_court_space(px, pz, mode), "fromCourtSpace")
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen(js_name = abiVersion)]
pub fn abi_version() -> u32 {
    1
}

#![cfg(target_arch = "wasm32")]
use std::cell::Cell;
use std::rc::Rc;

use huddle_timeline_wasm::{abi_version, from_court_space_js, to_court_space_js, HuddlePlayback};
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn single_move_play() -> String {
    json!({
        "name": "single move",
        "players": [ { "id": "p1", "x": 0, "y": 0, "team": "home", "number": 1 } ],
        "actions": [ {
            "id": "a0", "type": "move",
            "fromX": 0, "fromY": 0, "toX": 100, "toY": 0, "stepIndex": 0
        } ]
    })
    .to_string()
}

fn to_json(v: JsValue) -> Value {
    let s = js_sys::JSON::stringify(&v).unwrap().as_string().unwrap();
    serde_json::from_str(&s).unwrap()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults_and_reject_bad_config() {
    assert!(HuddlePlayback::new(JsValue::UNDEFINED).is_ok());
    let bad = js_sys::JSON::parse(r#"{ "speed": -1 }"#).unwrap();
    assert!(HuddlePlayback::new(bad).is_err());
}

#[wasm_bindgen_test]
fn load_start_update_reaches_the_target() {
    let mut pb = HuddlePlayback::new(JsValue::NULL).unwrap();
    assert_eq!(pb.load_play(JsValue::from_str(&single_move_play())).unwrap(), 1);
    assert!(pb.start());
    assert!(!pb.start());

    let mut last = Value::Null;
    for _ in 0..60 {
        last = to_json(pb.update(1.0 / 60.0).unwrap());
    }
    let x = last["positions"][0]["position"]["x"].as_f64().unwrap();
    assert!((x - 100.0).abs() < 1e-3);
    assert_eq!(last["running"], Value::Bool(false));
    assert!(last["drawn"][0]["court"]["x"].is_number());
    assert!(!pb.is_running());
}

#[wasm_bindgen_test]
fn high_refresh_frames_also_finish_the_play() {
    let mut pb = HuddlePlayback::new(JsValue::UNDEFINED).unwrap();
    pb.load_play(JsValue::from_str(&single_move_play())).unwrap();
    pb.start();
    for _ in 0..144 {
        pb.update(1.0 / 144.0).unwrap();
    }
    assert!(!pb.is_running());
    assert_eq!(pb.progress(), 1.0);
}

#[wasm_bindgen_test]
fn path_curve_smooths_waypoint_paths_for_display() {
    let play = json!({
        "players": [ { "id": "p1", "x": 0, "y": 0, "team": "home", "number": 1 } ],
        "actions": [ {
            "id": "curl", "type": "move", "playerId": "p1",
            "fromX": 0, "fromY": 0, "toX": 200, "toY": 0, "stepIndex": 0,
            "waypoints": [ { "x": 100, "y": 80 } ]
        } ]
    })
    .to_string();
    let mut pb = HuddlePlayback::new(JsValue::UNDEFINED).unwrap();
    pb.load_play(JsValue::from_str(&play)).unwrap();

    let curve = to_json(pb.path_curve("curl".into(), 8).unwrap());
    let canvas = curve["canvas"].as_array().unwrap();
    let court = curve["court"].as_array().unwrap();
    assert_eq!(canvas.len(), court.len());
    assert!(canvas.len() > 3);
    assert_eq!(canvas[0]["x"].as_f64(), Some(0.0));
    assert_eq!(canvas[canvas.len() - 1]["x"].as_f64(), Some(200.0));

    assert!(pb.path_curve("missing".into(), 8).is_err());
}

#[wasm_bindgen_test]
fn on_ended_is_called_once() {
    let mut pb = HuddlePlayback::new(JsValue::UNDEFINED).unwrap();
    pb.load_play(JsValue::from_str(&single_move_play())).unwrap();

    let hits = Rc::new(Cell::new(0u32));
    let seen = hits.clone();
    let cb = Closure::<dyn FnMut()>::new(move || seen.set(seen.get() + 1));
    pb.on_ended(cb.as_ref().unchecked_ref::<js_sys::Function>().clone());
    cb.forget();

    pb.start();
    pb.update(2.0).unwrap();
    pb.update(2.0).unwrap();
    pb.update(2.0).unwrap();
    assert_eq!(hits.get(), 1);
}

#[wasm_bindgen_test]
fn static_queries_and_coordinate_helpers() {
    let mut pb = HuddlePlayback::new(JsValue::UNDEFINED).unwrap();
    pb.load_play(JsValue::from_str(&single_move_play())).unwrap();

    let at_end = to_json(pb.positions_at_step(1).unwrap());
    assert_eq!(at_end[0]["player"], "p1");
    assert_eq!(at_end[0]["position"]["x"].as_f64(), Some(100.0));

    let frame = to_json(pb.frame_at(0.5).unwrap());
    assert_eq!(frame["positions"]["p1"]["x"].as_f64(), Some(50.0));

    let court = to_json(to_court_space_js(400.0, 250.0, JsValue::UNDEFINED).unwrap());
    assert!(court["x"].as_f64().unwrap().abs() < 1e-4);
    let canvas = to_json(from_court_space_js(0.0, 0.0, JsValue::from_str("full")).unwrap());
    assert!((canvas["x"].as_f64().unwrap() - 400.0).abs() < 1e-2);
    assert!(to_court_space_js(0.0, 0.0, JsValue::from_str("quarter")).is_err());
}

#[wasm_bindgen_test]
fn set_speed_validates() {
    let mut pb = HuddlePlayback::new(JsValue::UNDEFINED).unwrap();
    assert!(pb.set_speed(2.0).is_ok());
    assert!(pb.set_speed(0.0).is_err());
}

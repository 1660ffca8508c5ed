#![cfg(target_arch = "wasm32")]

use js_sys::{Float64Array, Function, Reflect, Uint32Array};
use planarity_wasm::Level;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const SQUARE: &str = r#"{
    "name": "square",
    "vertices": [[0, 0], [10, 0], [10, 10], [0, 10]],
    "edges": [[0, 1], [1, 2], [2, 3], [3, 0], [0, 2], [1, 3]],
    "scoring": {"kind": "*", "threshold": 0}
}"#;

fn get(v: &JsValue, k: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str(k)).unwrap()
}

fn value(v: &JsValue) -> JsValue {
    assert_eq!(get(v, "ok").as_bool(), Some(true), "expected ok result");
    get(v, "value")
}

#[wasm_bindgen_test]
fn start_reports_initial_clashes() {
    let mut level = Level::new();
    let r = level.start_json_res(SQUARE);
    assert_eq!(value(&r).as_f64(), Some(1.0));
    assert_eq!(level.state(), "running");
    let clashes = get(&level.get_clash_data(), "edges");
    let edges = Uint32Array::from(clashes).to_vec();
    assert_eq!(edges, vec![4, 5]);
    let positions = Float64Array::from(get(&level.get_clash_data(), "positions")).to_vec();
    assert_eq!(positions, vec![5.0, 5.0]);
}

#[wasm_bindgen_test]
fn untangle_calls_win_handler() {
    let mut level = Level::new();
    level.start_json_res(SQUARE);
    let f = Function::new_with_args("status", "globalThis.__planarity_wins = (globalThis.__planarity_wins || 0) + 1;");
    level.set_on_win(f);
    let r = level.move_vertex_res(0, 20.0, 20.0);
    let out = value(&r);
    assert_eq!(get(&out, "won").as_bool(), Some(true));
    assert_eq!(get(&out, "clash_count").as_f64(), Some(0.0));
    let wins = Reflect::get(&js_sys::global(), &JsValue::from_str("__planarity_wins")).unwrap();
    assert_eq!(wins.as_f64(), Some(1.0));
    assert_eq!(level.state(), "paused");
}

#[wasm_bindgen_test]
fn changes_are_drained() {
    let mut level = Level::new();
    level.start_json_res(SQUARE);
    let first = level.take_changes();
    assert_eq!(get(&first, "full").as_bool(), Some(true));
    let empty = level.take_changes();
    assert_eq!(get(&empty, "full").as_bool(), Some(false));
    assert_eq!(Uint32Array::from(get(&empty, "vertices")).length(), 0);
    level.move_vertex(0, 20.0, 20.0);
    let ch = level.take_changes();
    assert_eq!(Uint32Array::from(get(&ch, "clashes_removed")).to_vec(), vec![0]);
}

#[wasm_bindgen_test]
fn lasso_closes_into_a_group() {
    let mut level = Level::new();
    level.start_json_res(SQUARE);
    let samples = [(-2.0, -2.0), (2.0, -2.0), (2.0, 2.0), (-2.0, 2.0)];
    for (x, y) in samples {
        let r = value(&level.lasso_push_res(x, y));
        assert_eq!(get(&r, "closed").as_bool(), Some(false));
    }
    let r = value(&level.lasso_push_res(-1.0, -6.0));
    assert_eq!(get(&r, "closed").as_bool(), Some(true));
    assert_eq!(get(&r, "group").as_f64(), Some(0.0));
    assert_eq!(level.lasso_points().length(), 0);

    let members = Uint32Array::from(get(&level.get_group_data(), "members")).to_vec();
    assert_eq!(members, vec![0]);
    assert!(!level.move_vertex(0, 5.0, 5.0));
    let out = value(&level.move_group_res(0, 20.0, 20.0));
    assert_eq!(get(&out, "won").as_bool(), Some(true));
    assert!(level.ungroup(0));
}

#[wasm_bindgen_test]
fn throwing_win_handler_does_not_undo_the_win() {
    let mut level = Level::new();
    level.start_json_res(SQUARE);
    level.set_on_win(Function::new_with_args("status", "throw new Error('handler failed');"));
    let out = value(&level.move_vertex_res(0, 20.0, 20.0));
    assert_eq!(get(&out, "won").as_bool(), Some(true));
    assert_eq!(level.state(), "paused");
    // the level is still usable afterwards
    assert!(level.move_vertex(0, 0.0, 0.0));
    assert_eq!(level.clash_count(), 1);
}

#[wasm_bindgen_test]
fn empty_loop_keeps_the_stroke() {
    let mut level = Level::new();
    level.start_json_res(SQUARE);
    let samples = [(100.0, 100.0), (110.0, 100.0), (110.0, 110.0), (100.0, 110.0)];
    for (x, y) in samples {
        value(&level.lasso_push_res(x, y));
    }
    let r = value(&level.lasso_push_res(101.0, 95.0));
    assert_eq!(get(&r, "closed").as_bool(), Some(true));
    assert!(get(&r, "group").as_f64().is_none());
    assert_eq!(level.lasso_points().length(), 10);
    assert_eq!(Uint32Array::from(get(&level.get_group_data(), "ids")).length(), 0);
}

#[wasm_bindgen_test]
fn status_text_matches_the_hud() {
    let mut level = Level::new();
    level.start_json_res(SQUARE);
    assert_eq!(level.status_text(), "clashes left: 1, goal: <= 0");
    let status = level.status();
    assert_eq!(get(&status, "clashes").as_f64(), Some(1.0));
    level.stop();
    assert_eq!(level.state(), "stopped");
    assert_eq!(level.vertex_count(), 0);
}

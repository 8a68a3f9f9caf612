// Browser tests: `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

#[wasm_bindgen_test]
fn start_mounts_overlay_and_stop_removes_it() {
    flock_count::start_game().unwrap();
    let doc = document();
    assert!(doc.get_element_by_id("fc-root").is_some());
    assert!(doc.get_element_by_id("fc-stage").is_some());
    assert!(doc.get_element_by_id("fc-bird-canvas").is_some());

    flock_count::stop_game();
    assert!(doc.get_element_by_id("fc-root").is_none());
}

#[wasm_bindgen_test]
fn restarting_keeps_a_single_overlay() {
    flock_count::start_game().unwrap();
    flock_count::start_game().unwrap();
    let roots = document().query_selector_all("#fc-root").unwrap();
    assert_eq!(roots.length(), 1);
    flock_count::stop_game();
}

#[wasm_bindgen_test]
fn stop_without_start_is_harmless() {
    flock_count::stop_game();
    assert_eq!(flock_count::level_count(), 5);
}

#[wasm_bindgen_test]
fn failed_start_leaves_no_overlay_behind() {
    let doc = document();
    let body = doc.body().unwrap();
    // An element squatting on the canvas id makes attaching the canvas fail.
    let squatter = doc.create_element("div").unwrap();
    squatter.set_id("fc-bird-canvas");
    body.append_child(&squatter).unwrap();

    assert!(flock_count::start_game().is_err());
    assert!(doc.get_element_by_id("fc-root").is_none());

    squatter.remove();
    flock_count::start_game().unwrap();
    assert!(doc.get_element_by_id("fc-root").is_some());
    flock_count::stop_game();
}

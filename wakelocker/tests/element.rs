// Copyright 2026 The wakelocker Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

#![cfg(target_arch = "wasm32")]

use gloo_utils::{body, document};
use wakelocker::{TAG_NAME, register, set_verbose, state, verbose};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Element, js_sys::Promise};

wasm_bindgen_test_configure!(run_in_browser);

/// Waits for pending mutation observer callbacks to run.
async fn settle() {
    JsFuture::from(Promise::resolve(&JsValue::NULL))
        .await
        .unwrap();
}

fn wake_locker(inner_html: &str) -> Element {
    let element = document().create_element(TAG_NAME).unwrap();
    element.set_inner_html(inner_html);
    element
}

#[wasm_bindgen_test]
fn register_twice() {
    register().unwrap();
    register().unwrap();
}

#[wasm_bindgen_test]
async fn unchecked_control_is_unarmed() {
    register().unwrap();
    let element = wake_locker(r#"<input type="checkbox">"#);
    assert_eq!(state(&element), None);

    body().append_child(&element).unwrap();
    settle().await;
    // Headless browsers don't always expose the Screen Wake Lock API.
    assert!(matches!(
        state(&element).as_deref(),
        Some("unarmed") | Some("inert")
    ));

    element.remove();
    settle().await;
    assert_eq!(state(&element), None);
}

#[wasm_bindgen_test]
async fn nested_element_follows_its_ancestor() {
    register().unwrap();
    let wrapper = document().create_element("div").unwrap();
    let element = wake_locker(r#"<input type="checkbox">"#);
    wrapper.append_child(&element).unwrap();

    body().append_child(&wrapper).unwrap();
    settle().await;
    assert!(state(&element).is_some());

    // Unrelated changes leave it alone.
    let other = document().create_element("p").unwrap();
    wrapper.append_child(&other).unwrap();
    other.remove();
    settle().await;
    assert!(state(&element).is_some());

    wrapper.remove();
    settle().await;
    assert_eq!(state(&element), None);
}

#[wasm_bindgen_test]
async fn verbose_is_reflected() {
    register().unwrap();
    let element = wake_locker("");
    assert!(!verbose(&element));

    set_verbose(&element, true).unwrap();
    assert!(element.has_attribute("verbose"));
    assert!(verbose(&element));

    body().append_child(&element).unwrap();
    settle().await;
    assert!(verbose(&element));

    set_verbose(&element, false).unwrap();
    assert!(!element.has_attribute("verbose"));
    assert!(!verbose(&element));

    element.set_attribute("verbose", "").unwrap();
    settle().await;
    assert!(verbose(&element));

    element.remove();
    settle().await;
}

#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Object, Reflect};
use parallax_scroller_wasm::{abi_version, destroy, init, is_active};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn body() -> HtmlElement {
    document().body().unwrap()
}

fn window() -> web_sys::Window {
    web_sys::window().unwrap()
}

fn add_node(attrs: &[(&str, &str)]) -> HtmlElement {
    let el = document().create_element("div").unwrap();
    el.set_attribute("data-fixture", "").unwrap();
    for (k, v) in attrs {
        el.set_attribute(k, v).unwrap();
    }
    body().append_child(&el).unwrap();
    el.dyn_into::<HtmlElement>().unwrap()
}

fn options(pairs: &[(&str, &JsValue)]) -> JsValue {
    let obj = Object::new();
    for (k, v) in pairs {
        Reflect::set(&obj, &JsValue::from_str(k), v).unwrap();
    }
    obj.into()
}

fn reset_page() {
    destroy();
    let nodes = document().query_selector_all("[data-fixture]").unwrap();
    for i in 0..nodes.length() {
        let node = nodes.item(i).unwrap();
        if let Some(parent) = node.parent_node() {
            parent.remove_child(&node).unwrap();
        }
    }
    body().remove_attribute("style").unwrap();
    window().scroll_to_with_x_and_y(0.0, 0.0);
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

type Seen = Rc<RefCell<Vec<(String, String)>>>;

/// Listener collecting `(name, stage)` pairs.
fn recorder() -> (Seen, Closure<dyn FnMut(JsValue)>) {
    let seen: Seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let cb = Closure::wrap(Box::new(move |e: JsValue| {
        let field = |k: &str| {
            Reflect::get(&e, &JsValue::from_str(k))
                .unwrap()
                .as_string()
                .unwrap_or_default()
        };
        sink.borrow_mut().push((field("name"), field("stage")));
    }) as Box<dyn FnMut(JsValue)>);
    (seen, cb)
}

fn stages(seen: &Seen, stage: &str) -> usize {
    seen.borrow().iter().filter(|(_, s)| s == stage).count()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn init_applies_initial_styles_and_sizes_body() {
    reset_page();
    let hero = add_node(&[
        ("data-scroll", "hero"),
        ("data-0p", "opacity: 0"),
        ("data-200p", "opacity: 1"),
    ]);

    assert!(init(JsValue::UNDEFINED).is_ok());
    assert!(is_active());
    assert_eq!(hero.style().get_property_value("opacity").unwrap(), "0");

    let vh = web_sys::window()
        .unwrap()
        .inner_height()
        .unwrap()
        .as_f64()
        .unwrap();
    assert_eq!(
        body().style().get_property_value("height").unwrap(),
        format!("{}px", 2.0 * vh)
    );

    destroy();
    assert!(!is_active());
    assert_eq!(body().style().get_property_value("height").unwrap(), "");
    reset_page();
}

#[wasm_bindgen_test]
fn listener_receives_init_events() {
    reset_page();
    add_node(&[("data-scroll", "hero"), ("data-0p", "opacity: 0")]);
    add_node(&[("data-20p", "opacity: 0")]);

    let seen: Rc<RefCell<Vec<JsValue>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let cb = Closure::wrap(Box::new(move |e: JsValue| sink.borrow_mut().push(e)) as Box<dyn FnMut(JsValue)>);

    assert!(init(options(&[("listener", cb.as_ref())])).is_ok());

    let first = seen.borrow().first().cloned().expect("init event");
    let name = Reflect::get(&first, &JsValue::from_str("name")).unwrap();
    let stage = Reflect::get(&first, &JsValue::from_str("stage")).unwrap();
    assert_eq!(name.as_string().as_deref(), Some("hero"));
    assert_eq!(stage.as_string().as_deref(), Some("init"));

    reset_page();
}

#[wasm_bindgen_test]
fn custom_root_is_pinned() {
    reset_page();
    let root = add_node(&[]);
    let root_value = JsValue::from(root.clone());
    assert!(init(options(&[("root", &root_value)])).is_ok());

    let style = root.style();
    assert_eq!(style.get_property_value("position").unwrap(), "fixed");
    assert_eq!(style.get_property_value("top").unwrap(), "0px");
    assert_eq!(style.get_property_value("left").unwrap(), "0px");
    assert_eq!(style.get_property_value("width").unwrap(), "100%");
    assert_eq!(style.get_property_value("height").unwrap(), "100%");
    reset_page();
}

#[wasm_bindgen_test]
fn rejects_bad_options() {
    reset_page();
    assert!(init(options(&[("listener", &JsValue::from_str("nope"))])).is_err());
    assert!(init(options(&[("root", &JsValue::from_f64(3.0))])).is_err());
    assert!(!is_active());
}

#[wasm_bindgen_test]
fn destroy_is_idempotent() {
    reset_page();
    destroy();
    destroy();
    assert!(!is_active());
}

#[wasm_bindgen_test]
fn falsy_listener_is_ignored() {
    reset_page();
    add_node(&[("data-scroll", "quiet"), ("data-0p", "opacity: 0")]);
    for falsy in [JsValue::FALSE, JsValue::from_f64(0.0), JsValue::from_str("")] {
        assert!(init(options(&[("listener", &falsy)])).is_ok());
        assert!(is_active());
    }
    reset_page();
}

#[wasm_bindgen_test]
fn failed_frame_clears_is_active() {
    reset_page();
    add_node(&[
        ("data-scroll", "lopsided"),
        ("data-0p", "transform: translateX(0%)"),
        ("data-100p", "transform: translateX(100%) scaleY(1.5)"),
    ]);
    assert!(init(JsValue::UNDEFINED).is_ok());
    assert!(!is_active());
    reset_page();
}

#[wasm_bindgen_test]
fn destroy_from_inside_the_listener() {
    reset_page();
    add_node(&[
        ("data-scroll", "selfdestruct"),
        ("data-0p", "opacity: 0"),
        ("data-100p", "opacity: 1"),
    ]);
    let calls = Rc::new(RefCell::new(0_usize));
    let count = Rc::clone(&calls);
    let cb = Closure::wrap(Box::new(move |e: JsValue| {
        *count.borrow_mut() += 1;
        let stage = Reflect::get(&e, &JsValue::from_str("stage")).unwrap();
        if stage.as_string().as_deref() == Some("scrollForward") {
            destroy();
        }
    }) as Box<dyn FnMut(JsValue)>);

    assert!(init(options(&[("listener", cb.as_ref())])).is_ok());
    assert_eq!(*calls.borrow(), 2);
    assert!(!is_active());
    assert_eq!(body().style().get_property_value("height").unwrap(), "");
    reset_page();
}

#[wasm_bindgen_test]
fn reinit_keeps_last_scroll_points() {
    reset_page();
    add_node(&[
        ("data-scroll", "carried"),
        ("data-0p", "opacity: 0"),
        ("data-100p", "opacity: 1"),
    ]);
    let (seen, cb) = recorder();

    assert!(init(options(&[("listener", cb.as_ref())])).is_ok());
    assert_eq!(stages(&seen, "init"), 1);
    assert_eq!(stages(&seen, "scrollForward"), 1);
    destroy();

    seen.borrow_mut().clear();
    assert!(init(options(&[("listener", cb.as_ref())])).is_ok());
    assert_eq!(
        *seen.borrow(),
        vec![("carried".to_string(), "init".to_string())]
    );
    destroy();

    seen.borrow_mut().clear();
    let reset = options(&[("reset_checkpoints_on_rebuild", &JsValue::TRUE)]);
    assert!(init(options(&[("listener", cb.as_ref()), ("config", &reset)])).is_ok());
    assert_eq!(stages(&seen, "scrollForward"), 1);
    reset_page();
}

#[wasm_bindgen_test]
async fn resize_burst_rebuilds_once() {
    reset_page();
    add_node(&[("data-scroll", "resized"), ("data-0p", "opacity: 0")]);
    let (seen, cb) = recorder();
    let config = options(&[("resize_debounce_ms", &JsValue::from_f64(50.0))]);
    assert!(init(options(&[("listener", cb.as_ref()), ("config", &config)])).is_ok());
    assert_eq!(stages(&seen, "init"), 1);

    for _ in 0..5 {
        let event = web_sys::Event::new("resize").unwrap();
        window().dispatch_event(&event).unwrap();
    }
    assert_eq!(stages(&seen, "init"), 1);

    sleep(250).await;
    assert_eq!(stages(&seen, "init"), 2);
    assert!(is_active());
    reset_page();
}

#[wasm_bindgen_test]
async fn reinit_leaves_a_single_loop() {
    reset_page();
    let root = add_node(&[]);
    let root_value = JsValue::from(root);
    add_node(&[
        ("data-scroll", "looped"),
        ("data-0p", "opacity: 0"),
        ("data-100p", "opacity: 1"),
        ("data-300p", "opacity: 1"),
    ]);
    let (first, first_cb) = recorder();
    let (second, second_cb) = recorder();

    assert!(init(options(&[("root", &root_value), ("listener", first_cb.as_ref())])).is_ok());
    assert!(init(options(&[("root", &root_value), ("listener", second_cb.as_ref())])).is_ok());
    first.borrow_mut().clear();

    let vh = window().inner_height().unwrap().as_f64().unwrap();
    window().scroll_to_with_x_and_y(0.0, 10.0 * vh);
    sleep(200).await;

    assert!(first.borrow().is_empty());
    assert!(stages(&second, "scrollForward") >= 1);
    reset_page();
}

//! Browser entry points: `init`, `destroy` and the animation-frame loop.
//!
//! One session is active per page. `init` replaces any running session.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::{Function, Reflect};
use serde_wasm_bindgen as swb;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, HtmlElement};

use parallax_scroller_core::{
    CheckpointCache, Config, Listener, ScrollEvent, ScrollerError, Session,
};

mod dom;

pub use dom::DomHost;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn js_error(err: &ScrollerError) -> JsError {
    JsError::new(&err.to_string())
}

fn report(context: &str, err: &ScrollerError) {
    console::error_1(&JsValue::from_str(&format!(
        "parallax-scroller: {context}: {err}"
    )));
}

/// Forwards notifications to a JS callback as `{ name, stage, checkpoint? }`.
struct JsListener {
    f: Function,
}

impl Listener for JsListener {
    fn on_event(&mut self, event: &ScrollEvent) {
        let payload = match swb::to_value(event) {
            Ok(v) => v,
            Err(e) => {
                console::error_1(&JsValue::from_str(&format!("listener payload error: {e}")));
                return;
            }
        };
        if let Err(err) = self.f.call1(&JsValue::UNDEFINED, &payload) {
            console::error_1(&err);
        }
    }
}

/// Options accepted by [`init`]: `{ root?, listener?, config? }`.
struct InitOptions {
    root: Option<HtmlElement>,
    listener: Option<Function>,
    config: Config,
}

impl InitOptions {
    fn from_js(options: &JsValue) -> Result<Self, JsError> {
        if jsvalue_is_undefined_or_null(options) {
            return Ok(Self {
                root: None,
                listener: None,
                config: Config::default(),
            });
        }
        let field = |name: &str| {
            Reflect::get(options, &JsValue::from_str(name))
                .map_err(|_| JsError::new(&format!("init options: cannot read {name}")))
        };

        let root = field("root")?;
        let root = if jsvalue_is_undefined_or_null(&root) {
            None
        } else {
            Some(
                root.dyn_into::<HtmlElement>()
                    .map_err(|_| js_error(&ScrollerError::InvalidRootElement))?,
            )
        };

        let listener = field("listener")?;
        let listener = if !listener.is_truthy() {
            None
        } else {
            Some(
                listener
                    .dyn_into::<Function>()
                    .map_err(|_| js_error(&ScrollerError::InvalidListener))?,
            )
        };

        let config = field("config")?;
        let config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        Ok(Self {
            root,
            listener,
            config,
        })
    }
}

struct Runtime {
    session: Session<HtmlElement>,
    host: DomHost,
    frame_id: Option<i32>,
    frame_closure: Option<Closure<dyn FnMut()>>,
    resize_closure: Option<Closure<dyn FnMut(web_sys::Event)>>,
    resize_timer: Option<i32>,
    resize_settle_closure: Option<Closure<dyn FnMut()>>,
}

struct Shared {
    runtime: RefCell<Runtime>,
    // Set by `destroy`; checked after every callback since the listener may
    // call `destroy` while the runtime is borrowed.
    cancelled: Cell<bool>,
}

thread_local! {
    static ACTIVE: RefCell<Option<Rc<Shared>>> = const { RefCell::new(None) };
    // Last scroll points of the most recently torn down session.
    static CHECKPOINTS: RefCell<CheckpointCache> = RefCell::new(CheckpointCache::new());
}

fn teardown(shared: &Shared) {
    let mut guard = shared.runtime.borrow_mut();
    let rt = &mut *guard;
    if let Some(id) = rt.frame_id.take() {
        let _ = rt.host.window.cancel_animation_frame(id);
    }
    if let Some(id) = rt.resize_timer.take() {
        rt.host.window.clear_timeout_with_handle(id);
    }
    if let Some(cb) = rt.resize_closure.take() {
        let _ = rt
            .host
            .window
            .remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
    }
    rt.session.destroy(&mut rt.host);
    let points = rt.session.take_checkpoints();
    CHECKPOINTS.with(|slot| *slot.borrow_mut() = points);
}

/// Cancel any pending frame, then request the next one.
fn schedule_frame(shared: &Rc<Shared>) -> Result<(), JsValue> {
    let mut guard = shared.runtime.borrow_mut();
    let rt = &mut *guard;
    if let Some(id) = rt.frame_id.take() {
        rt.host.window.cancel_animation_frame(id)?;
    }
    let weak: Weak<Shared> = Rc::downgrade(shared);
    let callback = rt.frame_closure.get_or_insert_with(|| {
        Closure::wrap(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                tick(&shared);
            }
        }) as Box<dyn FnMut()>)
    });
    let id = rt
        .host
        .window
        .request_animation_frame(callback.as_ref().unchecked_ref())?;
    rt.frame_id = Some(id);
    Ok(())
}

fn tick(shared: &Rc<Shared>) {
    if shared.cancelled.get() {
        return;
    }
    let keep_going = {
        let mut guard = shared.runtime.borrow_mut();
        let rt = &mut *guard;
        rt.frame_id = None;
        match rt.session.frame(&mut rt.host) {
            Ok(active) => active,
            Err(err) => {
                report("frame failed, stopping", &err);
                false
            }
        }
    };
    if shared.cancelled.get() {
        teardown(shared);
        return;
    }
    if keep_going {
        if let Err(err) = schedule_frame(shared) {
            console::error_1(&err);
        }
    }
}

fn rebuild(shared: &Rc<Shared>) {
    let restart = {
        let Ok(mut guard) = shared.runtime.try_borrow_mut() else {
            return;
        };
        let rt = &mut *guard;
        rt.resize_timer = None;
        match rt.session.rebuild(&mut rt.host) {
            // A loop stopped by a failed frame resumes with the new elements.
            Ok(()) => rt.frame_id.is_none(),
            Err(err) => {
                report("rebuild after resize failed", &err);
                false
            }
        }
    };
    if shared.cancelled.get() {
        teardown(shared);
        return;
    }
    if restart {
        tick(shared);
    }
}

/// Re-read elements once resize events stop for `debounce_ms`.
fn install_resize(shared: &Rc<Shared>, debounce_ms: i32) -> Result<(), JsValue> {
    let settle_weak = Rc::downgrade(shared);
    let settle = Closure::wrap(Box::new(move || {
        if let Some(shared) = settle_weak.upgrade() {
            if !shared.cancelled.get() {
                rebuild(&shared);
            }
        }
    }) as Box<dyn FnMut()>);

    let resize_weak = Rc::downgrade(shared);
    let on_resize = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        let Some(shared) = resize_weak.upgrade() else {
            return;
        };
        let Ok(mut guard) = shared.runtime.try_borrow_mut() else {
            return;
        };
        let rt = &mut *guard;
        if let Some(id) = rt.resize_timer.take() {
            rt.host.window.clear_timeout_with_handle(id);
        }
        let Some(settle) = rt.resize_settle_closure.as_ref() else {
            return;
        };
        match rt
            .host
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                settle.as_ref().unchecked_ref(),
                debounce_ms,
            ) {
            Ok(id) => rt.resize_timer = Some(id),
            Err(err) => console::error_1(&err),
        }
    }) as Box<dyn FnMut(web_sys::Event)>);

    let mut guard = shared.runtime.borrow_mut();
    let rt = &mut *guard;
    rt.host
        .window
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    rt.resize_settle_closure = Some(settle);
    rt.resize_closure = Some(on_resize);
    Ok(())
}

/// Start animating every `[data-scroll]` element on the page.
///
/// `options` is `{ root?, listener?, config? }`; `root` defaults to `document.body`
/// and is pinned in place. Any running session is destroyed first.
#[wasm_bindgen]
pub fn init(options: JsValue) -> Result<(), JsError> {
    console_error_panic_hook::set_once();

    let opts = InitOptions::from_js(&options)?;
    destroy();

    let window = web_sys::window().ok_or_else(|| JsError::new("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsError::new("no document"))?;
    let root = match opts.root {
        Some(root) => root,
        None => document
            .body()
            .ok_or_else(|| js_error(&ScrollerError::InvalidRootElement))?,
    };

    let debounce_ms = i32::try_from(opts.config.resize_debounce_ms).unwrap_or(i32::MAX);
    let mut host = DomHost::new(window, document, root);
    let checkpoints = CHECKPOINTS.with(|slot| std::mem::take(&mut *slot.borrow_mut()));
    let mut session = Session::with_checkpoints(opts.config, checkpoints);
    let listener = opts
        .listener
        .map(|f| Box::new(JsListener { f }) as Box<dyn Listener>);
    if let Err(err) = session.init(&mut host, listener) {
        let points = session.take_checkpoints();
        CHECKPOINTS.with(|slot| *slot.borrow_mut() = points);
        return Err(js_error(&err));
    }

    let shared = Rc::new(Shared {
        runtime: RefCell::new(Runtime {
            session,
            host,
            frame_id: None,
            frame_closure: None,
            resize_closure: None,
            resize_timer: None,
            resize_settle_closure: None,
        }),
        cancelled: Cell::new(false),
    });
    install_resize(&shared, debounce_ms)
        .map_err(|e| JsError::new(&format!("resize listener error: {e:?}")))?;
    ACTIVE.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&shared)));

    tick(&shared);
    Ok(())
}

/// Stop the loop, detach listeners and remove the document height override.
/// Safe to call at any time, including from inside the listener.
#[wasm_bindgen]
pub fn destroy() {
    let Some(shared) = ACTIVE.with(|slot| slot.borrow_mut().take()) else {
        return;
    };
    shared.cancelled.set(true);
    if shared.runtime.try_borrow_mut().is_ok() {
        teardown(&shared);
    }
}

/// Whether a session is currently animating.
#[wasm_bindgen(js_name = isActive)]
pub fn is_active() -> bool {
    ACTIVE.with(|slot| {
        slot.borrow().as_ref().is_some_and(|shared| {
            shared
                .runtime
                .try_borrow()
                .map(|rt| rt.session.is_active())
                .unwrap_or(true)
        })
    })
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}

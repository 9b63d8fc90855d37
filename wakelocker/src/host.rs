// Copyright 2026 The wakelocker Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! [`Host`] implementation backed by the browser DOM and Screen Wake Lock API.

use gloo_utils::{document, window};
use log::Level;
use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};
use wakelock::{Host, LockError, Visibility, WakeLockKind, WakeLocker};
use wasm_bindgen::{JsCast, JsValue, prelude::Closure};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Element, Event, EventTarget, HtmlInputElement, VisibilityState, WakeLockSentinel,
    WakeLockType, js_sys::Reflect,
};

pub type SharedLocker = Rc<RefCell<WakeLocker<DomHost>>>;
type WeakLocker = Weak<RefCell<WakeLocker<DomHost>>>;

/// The selector used to find the toggle control inside the element.
const CONTROL_SELECTOR: &str = r#"input[type="checkbox"]"#;

/// An event listener which is removed again when dropped.
struct Listener {
    target: EventTarget,
    event_type: &'static str,
    callback: Closure<dyn Fn(Event)>,
}

impl Listener {
    fn new(
        target: &EventTarget,
        event_type: &'static str,
        callback: impl Fn(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn Fn(Event)>::new(callback);
        target.add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event_type,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        _ = self.target.remove_event_listener_with_callback(
            self.event_type,
            self.callback.as_ref().unchecked_ref(),
        );
    }
}

/// Connects a [`WakeLocker`] to a `<wake-locker>` element in the current document.
pub struct DomHost {
    element: Element,
    locker: WeakLocker,
    control: Option<(HtmlInputElement, Listener)>,
    visibility_listener: Option<Listener>,
    release_listeners: Vec<(WakeLockSentinel, Listener)>,
}

impl DomHost {
    /// Creates a locker for the given element. It isn't attached until it gets
    /// [`wakelock::Event::Attach`].
    pub fn new_locker(element: Element) -> SharedLocker {
        Rc::new_cyclic(|locker| {
            RefCell::new(WakeLocker::new(Self {
                element,
                locker: locker.clone(),
                control: None,
                visibility_listener: None,
                release_listeners: Vec::new(),
            }))
        })
    }

    fn report(&self, error: JsValue) {
        gloo_console::error!(error);
    }
}

/// Delivers the given event to the locker, if it still exists.
fn dispatch(locker: &WeakLocker, event: wakelock::Event<WakeLockSentinel>) {
    if let Some(locker) = locker.upgrade() {
        locker.borrow_mut().handle(event);
    }
}

fn current_visibility() -> Visibility {
    match document().visibility_state() {
        VisibilityState::Visible => Visibility::Visible,
        VisibilityState::Hidden => Visibility::Hidden,
        _ => Visibility::Unknown,
    }
}

async fn request(kind: WakeLockKind) -> Result<WakeLockSentinel, JsValue> {
    let kind = match kind {
        WakeLockKind::Screen => WakeLockType::Screen,
    };
    Ok(
        JsFuture::from(window().navigator().wake_lock().request(kind))
            .await?
            .unchecked_into::<WakeLockSentinel>(),
    )
}

async fn release_sentinel(sentinel: WakeLockSentinel) -> Result<(), LockError> {
    JsFuture::from(sentinel.release())
        .await
        .map(|_| ())
        .map_err(|e| LockError::ReleaseFailed(format!("{e:?}")))
}

impl Host for DomHost {
    type Sentinel = WakeLockSentinel;

    fn wake_lock_supported(&self) -> bool {
        Reflect::has(&window().navigator(), &JsValue::from_str("wakeLock")).unwrap_or(false)
    }

    fn request(&mut self, kind: WakeLockKind) {
        let locker = self.locker.clone();
        spawn_local(async move {
            let result = request(kind)
                .await
                .map_err(|e| LockError::Denied(format!("{e:?}")));
            match (locker.upgrade(), result) {
                (Some(locker), result) => {
                    locker
                        .borrow_mut()
                        .handle(wakelock::Event::AcquireCompleted(result));
                }
                // The element is gone, so nobody else will release it.
                (None, Ok(sentinel)) => {
                    _ = release_sentinel(sentinel).await;
                }
                (None, Err(_)) => {}
            }
        });
    }

    fn release(&mut self, sentinel: WakeLockSentinel) {
        let locker = self.locker.clone();
        spawn_local(async move {
            let result = release_sentinel(sentinel).await;
            dispatch(&locker, wakelock::Event::ReleaseCompleted(result));
        });
    }

    fn watch_release(&mut self, sentinel: &WakeLockSentinel) {
        self.release_listeners
            .retain(|(watched, _)| !watched.released());

        let locker = self.locker.clone();
        let released = sentinel.clone();
        match Listener::new(sentinel, "release", move |_| {
            dispatch(&locker, wakelock::Event::LockReleased(released.clone()));
        }) {
            Ok(listener) => self.release_listeners.push((sentinel.clone(), listener)),
            Err(e) => self.report(e),
        }
    }

    fn visibility(&self) -> Visibility {
        current_visibility()
    }

    fn subscribe_visibility(&mut self) {
        let locker = self.locker.clone();
        match Listener::new(&document(), "visibilitychange", move |_| {
            dispatch(
                &locker,
                wakelock::Event::VisibilityChanged(current_visibility()),
            );
        }) {
            Ok(listener) => self.visibility_listener = Some(listener),
            Err(e) => self.report(e),
        }
    }

    fn unsubscribe_visibility(&mut self) {
        self.visibility_listener = None;
    }

    fn connect_control(&mut self) -> Option<bool> {
        let input = self
            .element
            .query_selector(CONTROL_SELECTOR)
            .ok()
            .flatten()?
            .dyn_into::<HtmlInputElement>()
            .ok()?;

        let locker = self.locker.clone();
        let target = input.clone();
        match Listener::new(&input, "change", move |_| {
            dispatch(&locker, wakelock::Event::ControlChanged(target.checked()));
        }) {
            Ok(listener) => {
                let checked = input.checked();
                self.control = Some((input, listener));
                Some(checked)
            }
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    fn disconnect_control(&mut self) {
        self.control = None;
    }

    fn verbose_attribute(&self) -> bool {
        self.element.has_attribute("verbose")
    }

    fn set_verbose_attribute(&mut self, verbose: bool) {
        let result = if verbose {
            self.element.set_attribute("verbose", "")
        } else {
            self.element.remove_attribute("verbose")
        };
        if let Err(e) = result {
            self.report(e);
        }
    }

    fn log(&mut self, level: Level, message: &str) {
        match level {
            Level::Error | Level::Warn => gloo_console::warn!(message),
            _ => gloo_console::info!(message),
        }
    }
}

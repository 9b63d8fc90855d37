// Copyright 2026 The wakelocker Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Tracks `<wake-locker>` elements as they are connected to and disconnected from the document.

use crate::host::{DomHost, SharedLocker};
use gloo_utils::document;
use std::cell::RefCell;
use wakelock::Event;
use wasm_bindgen::{JsCast, JsValue, prelude::*};
use web_sys::{
    Document, Element, MutationObserver, MutationObserverInit, MutationRecord, NodeList,
    js_sys::Array,
};

/// The tag name of the element.
pub const TAG_NAME: &str = "wake-locker";

struct Registry {
    document: Document,
    observer: MutationObserver,
    _callback: Closure<dyn Fn(Array)>,
    elements: Vec<(Element, SharedLocker)>,
}

impl Registry {
    fn locker_for(&self, element: &Element) -> Option<&SharedLocker> {
        self.elements
            .iter()
            .find(|(registered, _)| registered == element)
            .map(|(_, locker)| locker)
    }

    /// Detaches elements which have left the document and attaches ones which have joined it.
    fn sync(&mut self) -> Result<(), JsValue> {
        self.elements.retain(|(element, locker)| {
            let connected = element.is_connected();
            if !connected {
                locker.borrow_mut().handle(Event::Detach);
            }
            connected
        });

        let found = self.document.query_selector_all(TAG_NAME)?;
        for i in 0..found.length() {
            let Some(element) = found.get(i).and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };
            if self.locker_for(&element).is_none() {
                let locker = DomHost::new_locker(element.clone());
                locker.borrow_mut().handle(Event::Attach);
                self.elements.push((element, locker));
            }
        }
        Ok(())
    }

    fn mutations_observed(&mut self, records: Array) -> Result<(), JsValue> {
        let mut children_changed = false;
        for record in records.iter() {
            let record = record.unchecked_into::<MutationRecord>();
            match record.type_().as_str() {
                "childList" => {
                    children_changed = children_changed
                        || contains_wake_locker(&record.added_nodes())?
                        || contains_wake_locker(&record.removed_nodes())?;
                }
                "attributes" => {
                    let Some(element) = record
                        .target()
                        .and_then(|node| node.dyn_into::<Element>().ok())
                    else {
                        continue;
                    };
                    if let Some(locker) = self.locker_for(&element) {
                        let verbose = element.has_attribute("verbose");
                        locker.borrow_mut().handle(Event::VerboseChanged(verbose));
                    }
                }
                _ => {}
            }
        }
        if children_changed {
            self.sync()?;
        }
        Ok(())
    }
}

/// Returns whether any of the given nodes is or contains a `<wake-locker>` element.
fn contains_wake_locker(nodes: &NodeList) -> Result<bool, JsValue> {
    for i in 0..nodes.length() {
        if let Some(element) = nodes.get(i).and_then(|node| node.dyn_into::<Element>().ok())
            && (element.matches(TAG_NAME)? || element.query_selector(TAG_NAME)?.is_some())
        {
            return Ok(true);
        }
    }
    Ok(false)
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.observer.disconnect();
        for (_, locker) in &self.elements {
            locker.borrow_mut().handle(Event::Detach);
        }
    }
}

thread_local! {
    static REGISTRY: RefCell<Option<Registry>> = const { RefCell::new(None) };
}

/// Starts managing all `<wake-locker>` elements in the current document, now and in future.
///
/// Calling this again for the same document does nothing.
#[wasm_bindgen]
pub fn register() -> Result<(), JsValue> {
    REGISTRY.with_borrow_mut(|registry| {
        let document = document();
        if registry
            .as_ref()
            .is_some_and(|registry| registry.document == document)
        {
            return Ok(());
        }

        let callback = Closure::<dyn Fn(Array)>::new(|records| {
            REGISTRY.with_borrow_mut(|registry| {
                if let Some(registry) = registry
                    && let Err(e) = registry.mutations_observed(records)
                {
                    gloo_console::error!(e);
                }
            });
        });
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        options.set_attributes(true);
        options.set_attribute_filter(&Array::of1(&JsValue::from_str("verbose")));
        observer.observe_with_options(&document, &options)?;

        let registry = registry.insert(Registry {
            document,
            observer,
            _callback: callback,
            elements: Vec::new(),
        });
        registry.sync()
    })
}

/// Returns whether the given element is verbose.
#[wasm_bindgen(js_name = isVerbose)]
pub fn verbose(element: &Element) -> bool {
    with_locker(element, |locker| locker.borrow().verbose())
        .unwrap_or_else(|| element.has_attribute("verbose"))
}

/// Sets whether the given element logs diagnostics, by adding or removing its `verbose` attribute.
#[wasm_bindgen(js_name = setVerbose)]
pub fn set_verbose(element: &Element, verbose: bool) -> Result<(), JsValue> {
    if with_locker(element, |locker| locker.borrow_mut().set_verbose(verbose)).is_some() {
        return Ok(());
    }
    if verbose {
        element.set_attribute("verbose", "")
    } else {
        element.remove_attribute("verbose")
    }
}

/// Returns the name of the state of the given element, or `None` if it isn't being managed.
#[wasm_bindgen(js_name = wakeLockState)]
pub fn state(element: &Element) -> Option<String> {
    with_locker(element, |locker| locker.borrow().state().name().to_owned())
}

fn with_locker<T>(element: &Element, f: impl FnOnce(&SharedLocker) -> T) -> Option<T> {
    REGISTRY.with_borrow(|registry| registry.as_ref()?.locker_for(element).map(f))
}

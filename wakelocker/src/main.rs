// Copyright 2026 The wakelocker Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Demo page for the `<wake-locker>` element.

use leptos::prelude::*;
use leptos_use::use_document_visibility;

fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    if let Err(e) = wakelocker::register() {
        gloo_console::error!(e);
    }
    leptos::mount::mount_to_body(App);
}

#[component]
fn App() -> impl IntoView {
    let (verbose, write_verbose) = signal(true);
    let visibility = use_document_visibility();

    view! {
        <h1>"Wake locker"</h1>
        <wake-locker verbose=move || verbose.get()>
            <label>
                <input type="checkbox" checked />
                " Keep the screen on"
            </label>
        </wake-locker>
        <form>
            <label>
                <input
                    type="checkbox"
                    prop:checked=verbose
                    on:change:target=move |event| write_verbose.set(event.target().checked())
                />
                " Log to the console"
            </label>
        </form>
        <p>"The page is " { move || format!("{:?}", visibility.get()).to_lowercase() } "."</p>
    }
}

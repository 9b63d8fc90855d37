// Copyright 2026 The wakelocker Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! The `<wake-locker>` element: keeps the screen awake while the checkbox inside it is checked (or
//! always, if it has no checkbox), and requests the wake lock again whenever the page becomes
//! visible.
//!
//! Call [`register`] once, after which every `<wake-locker>` element in the document is managed
//! automatically. Add the `verbose` attribute to log what it is doing to the console.
//!
//! ```html
//! <wake-locker verbose>
//!   <label><input type="checkbox" checked> Keep the screen on</label>
//! </wake-locker>
//! ```

mod element;
mod host;

pub use crate::element::{TAG_NAME, register, set_verbose, state, verbose};

// Copyright 2026 The wakelocker Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! A state machine for holding a screen wake lock while a toggle is on, independent of any
//! particular UI framework.
//!
//! The platform (a browser, or a fake in tests) is provided as a [`Host`], and everything that
//! happens to the widget is fed in as an [`Event`] through [`WakeLocker::handle`]. Asynchronous
//! operations started through the host report back with [`Event::AcquireCompleted`] and
//! [`Event::ReleaseCompleted`].
//!
//! ```
//! use wakelock::{Event, State, WakeLocker, recording::RecordingHost};
//!
//! let mut locker = WakeLocker::new(RecordingHost::default());
//! locker.handle(Event::Attach);
//! assert_eq!(locker.state(), &State::Acquiring);
//! let sentinel = locker.host_mut().next_sentinel();
//! locker.handle(Event::AcquireCompleted(Ok(sentinel)));
//! assert_eq!(locker.state(), &State::Held(sentinel));
//! ```

pub mod recording;
pub mod types;

pub use crate::types::{AcquireReason, Event, LockError, State, Visibility, WakeLockKind};
use log::Level;
use std::{fmt::Debug, mem};

/// The platform and document the widget is attached to.
///
/// Methods which start asynchronous work return immediately; the host must later feed the result
/// back to [`WakeLocker::handle`] as the corresponding [`Event`].
pub trait Host {
    /// Reference to a granted wake lock.
    type Sentinel: Clone + Debug + PartialEq;

    /// Returns whether the platform exposes a wake lock capability at all.
    fn wake_lock_supported(&self) -> bool;

    /// Starts requesting a wake lock. Completes with [`Event::AcquireCompleted`].
    fn request(&mut self, kind: WakeLockKind);

    /// Starts releasing the given lock. Completes with [`Event::ReleaseCompleted`].
    fn release(&mut self, sentinel: Self::Sentinel);

    /// Arranges for [`Event::LockReleased`] to be delivered when the platform releases the given
    /// lock, for whatever reason.
    fn watch_release(&mut self, sentinel: &Self::Sentinel);

    /// Returns the current visibility state of the document.
    fn visibility(&self) -> Visibility;

    /// Starts delivering [`Event::VisibilityChanged`].
    fn subscribe_visibility(&mut self);

    /// Stops delivering [`Event::VisibilityChanged`].
    fn unsubscribe_visibility(&mut self);

    /// Looks for the toggle control and, if there is one, starts delivering
    /// [`Event::ControlChanged`] for it.
    ///
    /// Returns whether the control is currently checked, or `None` if there is no control.
    fn connect_control(&mut self) -> Option<bool>;

    /// Stops delivering [`Event::ControlChanged`].
    fn disconnect_control(&mut self);

    /// Returns whether the `verbose` attribute is present.
    fn verbose_attribute(&self) -> bool;

    /// Adds or removes the `verbose` attribute.
    fn set_verbose_attribute(&mut self, verbose: bool);

    /// Writes a diagnostic message. Only called while the widget is verbose.
    fn log(&mut self, level: Level, message: &str);
}

/// Keeps a wake lock held while attached and its control (if any) is checked.
#[derive(Debug)]
pub struct WakeLocker<H: Host> {
    host: H,
    state: State<H::Sentinel>,
    verbose: bool,
    /// Whether the control is checked, or `None` if no control is connected.
    control: Option<bool>,
    subscribed: bool,
    acquire_in_flight: bool,
}

impl<H: Host> WakeLocker<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            state: State::Detached,
            verbose: false,
            control: None,
            subscribed: false,
            acquire_in_flight: false,
        }
    }

    pub fn state(&self) -> &State<H::Sentinel> {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Returns whether visibility changes are currently subscribed to.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Returns whether a request to the platform is still outstanding.
    pub fn is_acquire_in_flight(&self) -> bool {
        self.acquire_in_flight
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Sets whether diagnostics are logged, and reflects it to the `verbose` attribute.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.host.set_verbose_attribute(verbose);
        self.verbose = verbose;
    }

    /// Processes a single event.
    pub fn handle(&mut self, event: Event<H::Sentinel>) {
        match event {
            Event::Attach => self.attach(),
            Event::Detach => self.detach(),
            Event::ControlChanged(checked) => self.control_changed(checked),
            Event::VisibilityChanged(visibility) => self.visibility_changed(visibility),
            Event::AcquireCompleted(result) => self.acquire_completed(result),
            Event::ReleaseCompleted(result) => self.release_completed(result),
            Event::LockReleased(sentinel) => self.lock_released(sentinel),
            Event::VerboseChanged(verbose) => self.verbose = verbose,
        }
        debug_assert_eq!(self.subscribed, self.state.is_desired());
    }

    fn attach(&mut self) {
        if !matches!(self.state, State::Detached) {
            self.detach();
        }

        self.verbose = self.host.verbose_attribute();
        if !self.host.wake_lock_supported() {
            self.warn("Wake lock not available on this platform.");
            self.state = State::Inert;
            return;
        }

        self.control = self.host.connect_control();
        self.state = State::Unarmed;
        if self.control.unwrap_or(true) {
            self.arm();
        }
    }

    fn detach(&mut self) {
        if self.control.take().is_some() {
            self.host.disconnect_control();
        }
        self.unsubscribe();
        self.release(State::Detached);
    }

    fn control_changed(&mut self, checked: bool) {
        let Some(previous) = self.control.replace(checked) else {
            // No control is connected, so this is left over from a previous attachment.
            self.control = None;
            return;
        };
        if checked == previous {
            return;
        }

        if checked {
            self.arm();
        } else {
            self.unsubscribe();
            self.release(State::Unarmed);
        }
    }

    fn visibility_changed(&mut self, visibility: Visibility) {
        if !self.subscribed || !visibility.is_visible() {
            return;
        }
        if matches!(self.state, State::AwaitingRevisibility) {
            self.acquire(AcquireReason::Revisibility);
        }
    }

    fn acquire_completed(&mut self, result: Result<H::Sentinel, LockError>) {
        self.acquire_in_flight = false;
        match result {
            Ok(sentinel) => {
                self.info("Screen wake lock granted.");
                self.host.watch_release(&sentinel);
                if matches!(
                    self.state,
                    State::Acquiring | State::AwaitingRevisibility
                ) {
                    self.state = State::Held(sentinel);
                } else {
                    // Nobody wants it any more.
                    self.info("Releasing screen wake lock.");
                    self.host.release(sentinel);
                }
            }
            Err(e) => {
                self.warn(&e.to_string());
                if matches!(self.state, State::Acquiring) {
                    self.state = State::AwaitingRevisibility;
                }
            }
        }
    }

    fn release_completed(&mut self, result: Result<(), LockError>) {
        if let Err(e) = result {
            self.warn(&e.to_string());
        }
    }

    fn lock_released(&mut self, sentinel: H::Sentinel) {
        self.info("Screen wake lock released.");
        if self.state.handle() == Some(&sentinel) {
            self.state = State::AwaitingRevisibility;
        }
    }

    /// Starts wanting a lock: acquires it, then subscribes to visibility changes.
    fn arm(&mut self) {
        self.acquire(AcquireReason::Initial);
        self.subscribe();
    }

    fn acquire(&mut self, reason: AcquireReason) {
        if !self.host.visibility().is_visible() {
            self.state = State::AwaitingRevisibility;
            return;
        }

        self.state = State::Acquiring;
        // An earlier request is still outstanding; its result will be used instead.
        if self.acquire_in_flight {
            return;
        }
        self.info(reason.message());
        self.acquire_in_flight = true;
        self.host.request(WakeLockKind::Screen);
    }

    /// Moves to the given state, releasing the held lock if there is one.
    ///
    /// The handle is forgotten immediately, whether or not the platform manages to release it.
    fn release(&mut self, next: State<H::Sentinel>) {
        if let State::Held(sentinel) = mem::replace(&mut self.state, next) {
            self.info("Releasing screen wake lock.");
            self.host.release(sentinel);
        }
    }

    fn subscribe(&mut self) {
        if !self.subscribed {
            self.subscribed = true;
            self.host.subscribe_visibility();
        }
    }

    fn unsubscribe(&mut self) {
        if self.subscribed {
            self.subscribed = false;
            self.host.unsubscribe_visibility();
        }
    }

    fn info(&mut self, message: &str) {
        if self.verbose {
            self.host.log(Level::Info, message);
        }
    }

    fn warn(&mut self, message: &str) {
        if self.verbose {
            self.host.log(Level::Warn, message);
        }
    }
}

// Copyright 2026 The wakelocker Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! A [`Host`] which records every call made to it, for tests and simulations.
//!
//! Logged messages are also passed on to the [`log`] crate, so a binary using it can show them
//! with whatever logger it installs.

use crate::{Host, Visibility, WakeLockKind};
use log::Level;
use serde::Serialize;

/// A call made by the state machine to a [`RecordingHost`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostCall {
    Request(WakeLockKind),
    Release(u32),
    WatchRelease(u32),
    SubscribeVisibility,
    UnsubscribeVisibility,
    ConnectControl,
    DisconnectControl,
    SetVerbose(bool),
    Log(Level, String),
}

/// Fake host whose sentinels are plain integers.
///
/// Nothing completes on its own: the caller decides when and how each request or release finishes
/// and feeds the corresponding event back in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordingHost {
    pub supported: bool,
    pub visibility: Visibility,
    /// Whether there is a control, and if so whether it is checked when connected.
    pub control: Option<bool>,
    pub verbose_attribute: bool,
    pub calls: Vec<HostCall>,
    last_sentinel: u32,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            supported: true,
            visibility: Visibility::Visible,
            control: None,
            verbose_attribute: false,
            calls: Vec::new(),
            last_sentinel: 0,
        }
    }
}

impl RecordingHost {
    pub fn with_supported(mut self, supported: bool) -> Self {
        self.supported = supported;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Sets whether there is a control, and if so whether it is checked when connected.
    pub fn with_control(mut self, control: Option<bool>) -> Self {
        self.control = control;
        self
    }

    pub fn with_verbose_attribute(mut self, verbose_attribute: bool) -> Self {
        self.verbose_attribute = verbose_attribute;
        self
    }

    /// Returns a sentinel which hasn't been returned before.
    pub fn next_sentinel(&mut self) -> u32 {
        self.last_sentinel += 1;
        self.last_sentinel
    }

    /// Returns the calls recorded so far, and clears them.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn request_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, HostCall::Request(_)))
            .count()
    }

    pub fn release_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, HostCall::Release(_)))
            .count()
    }

    /// Returns all messages logged at the given level.
    pub fn logs(&self, level: Level) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Log(call_level, message) if *call_level == level => {
                    Some(message.as_str())
                }
                _ => None,
            })
            .collect()
    }
}

impl Host for RecordingHost {
    type Sentinel = u32;

    fn wake_lock_supported(&self) -> bool {
        self.supported
    }

    fn request(&mut self, kind: WakeLockKind) {
        self.calls.push(HostCall::Request(kind));
    }

    fn release(&mut self, sentinel: u32) {
        self.calls.push(HostCall::Release(sentinel));
    }

    fn watch_release(&mut self, sentinel: &u32) {
        self.calls.push(HostCall::WatchRelease(*sentinel));
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }

    fn subscribe_visibility(&mut self) {
        self.calls.push(HostCall::SubscribeVisibility);
    }

    fn unsubscribe_visibility(&mut self) {
        self.calls.push(HostCall::UnsubscribeVisibility);
    }

    fn connect_control(&mut self) -> Option<bool> {
        self.calls.push(HostCall::ConnectControl);
        self.control
    }

    fn disconnect_control(&mut self) {
        self.calls.push(HostCall::DisconnectControl);
    }

    fn verbose_attribute(&self) -> bool {
        self.verbose_attribute
    }

    fn set_verbose_attribute(&mut self, verbose: bool) {
        self.calls.push(HostCall::SetVerbose(verbose));
        self.verbose_attribute = verbose;
    }

    fn log(&mut self, level: Level, message: &str) {
        log::log!(level, "{message}");
        self.calls.push(HostCall::Log(level, message.to_owned()));
    }
}

// Copyright 2026 The wakelocker Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// The visibility state of the document hosting the widget.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    /// Some state the host didn't recognise, such as `prerender`.
    Unknown,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Self::Visible
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Visible => write!(f, "visible"),
            Self::Hidden => write!(f, "hidden"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// The kind of wake lock to request from the platform.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WakeLockKind {
    #[default]
    Screen,
}

/// Why a wake lock is being requested. This only affects diagnostics.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AcquireReason {
    /// The lock became desired, because the widget was attached or its control was checked.
    Initial,
    /// The document became visible again while the lock was desired but not held.
    Revisibility,
}

impl AcquireReason {
    pub fn message(self) -> &'static str {
        match self {
            Self::Initial => "Requesting screen wake lock.",
            Self::Revisibility => "Requesting screen wake lock again now that the page is visible.",
        }
    }
}

/// An error reported by the platform for a wake lock operation.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum LockError {
    /// The request was refused, e.g. because of low battery or a permissions policy.
    #[error("Wake lock request denied: {0}")]
    Denied(String),
    /// Releasing a previously granted lock failed.
    #[error("Wake lock release failed: {0}")]
    ReleaseFailed(String),
}

/// An input to [`WakeLocker::handle`](crate::WakeLocker::handle).
///
/// `S` is the host's lock handle type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event<S> {
    /// The widget became part of the active document.
    Attach,
    /// The widget was removed from the document.
    Detach,
    /// The toggle control changed to the given checked state.
    ControlChanged(bool),
    /// The document's visibility changed to the given state.
    VisibilityChanged(Visibility),
    /// A request made through [`Host::request`](crate::Host::request) finished.
    AcquireCompleted(Result<S, LockError>),
    /// A release made through [`Host::release`](crate::Host::release) finished.
    ReleaseCompleted(Result<(), LockError>),
    /// The platform reported that the given lock was released, either because we asked or because
    /// it revoked it.
    LockReleased(S),
    /// The `verbose` attribute was added or removed.
    VerboseChanged(bool),
}

/// The state of a [`WakeLocker`](crate::WakeLocker).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum State<S> {
    /// Not attached to a document.
    Detached,
    /// Attached, but the platform has no wake lock capability.
    Inert,
    /// Attached, but the control is unchecked so no lock is wanted.
    Unarmed,
    /// A lock is wanted and a request is in flight.
    Acquiring,
    /// A lock is wanted and held.
    Held(S),
    /// A lock is wanted but not held, e.g. because it was denied or revoked while hidden.
    AwaitingRevisibility,
}

impl<S> State<S> {
    /// Returns whether the widget currently wants to hold a lock.
    pub fn is_desired(&self) -> bool {
        matches!(
            self,
            Self::Acquiring | Self::Held(_) | Self::AwaitingRevisibility
        )
    }

    /// Returns the currently held lock handle, if any.
    pub fn handle(&self) -> Option<&S> {
        match self {
            Self::Held(handle) => Some(handle),
            _ => None,
        }
    }

    /// Returns a short name for the state, without the handle.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Detached => "detached",
            Self::Inert => "inert",
            Self::Unarmed => "unarmed",
            Self::Acquiring => "acquiring",
            Self::Held(_) => "held",
            Self::AwaitingRevisibility => "awaiting-revisibility",
        }
    }
}

// Copyright 2026 The wakelocker Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Parsing and running scripts of things that happen to a wake locker.
//!
//! A script has one step per line. Blank lines and anything after a `#` are ignored.

use serde::Serialize;
use thiserror::Error;
use wakelock::{
    Event, LockError, State, Visibility, WakeLocker,
    recording::{HostCall, RecordingHost},
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Step {
    /// Sets whether the platform supports wake locks, for the next attach.
    Supported(bool),
    /// Sets whether there is a control and whether it starts checked, for the next attach.
    Control(Option<bool>),
    Attach,
    Detach,
    Check,
    Uncheck,
    Hide,
    Show,
    /// Completes the outstanding request successfully.
    Grant,
    /// Fails the outstanding request with the given message.
    Deny(String),
    ReleaseOk,
    ReleaseFail(String),
    /// The platform releases the held lock by itself.
    Revoke,
    Verbose(bool),
}

/// A step along with where it came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Line {
    pub number: usize,
    pub text: String,
    pub step: Step,
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParseScriptError {
    #[error("line {line}: unknown step {step:?}")]
    UnknownStep { line: usize, step: String },
    #[error("line {line}: {step} expects {expected}")]
    BadArgument {
        line: usize,
        step: String,
        expected: &'static str,
    },
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum RunError {
    #[error("line {0}: no request is in flight")]
    NoRequest(usize),
    #[error("line {0}: no lock is held")]
    NoLock(usize),
}

/// Parses a whole script.
pub fn parse_script(script: &str) -> Result<Vec<Line>, ParseScriptError> {
    script
        .lines()
        .enumerate()
        .filter_map(|(index, text)| {
            let text = text.split('#').next().unwrap_or_default().trim();
            if text.is_empty() {
                None
            } else {
                Some(parse_step(index + 1, text).map(|step| Line {
                    number: index + 1,
                    text: text.to_owned(),
                    step,
                }))
            }
        })
        .collect()
}

fn parse_step(line: usize, text: &str) -> Result<Step, ParseScriptError> {
    let (step, argument) = match text.split_once(char::is_whitespace) {
        Some((step, argument)) => (step, argument.trim()),
        None => (text, ""),
    };
    let bad_argument = |expected| ParseScriptError::BadArgument {
        line,
        step: step.to_owned(),
        expected,
    };

    Ok(match (step, argument) {
        ("supported", "yes") => Step::Supported(true),
        ("supported", "no") => Step::Supported(false),
        ("supported", _) => return Err(bad_argument("yes or no")),
        ("control", "none") => Step::Control(None),
        ("control", "checked") => Step::Control(Some(true)),
        ("control", "unchecked") => Step::Control(Some(false)),
        ("control", _) => return Err(bad_argument("none, checked or unchecked")),
        ("verbose", "on") => Step::Verbose(true),
        ("verbose", "off") => Step::Verbose(false),
        ("verbose", _) => return Err(bad_argument("on or off")),
        ("deny", reason) => Step::Deny(reason.to_owned()),
        ("release-fail", reason) => Step::ReleaseFail(reason.to_owned()),
        (step, "") => match step {
            "attach" => Step::Attach,
            "detach" => Step::Detach,
            "check" => Step::Check,
            "uncheck" => Step::Uncheck,
            "hide" => Step::Hide,
            "show" => Step::Show,
            "grant" => Step::Grant,
            "release-ok" => Step::ReleaseOk,
            "revoke" => Step::Revoke,
            _ => {
                return Err(ParseScriptError::UnknownStep {
                    line,
                    step: step.to_owned(),
                });
            }
        },
        (
            "attach" | "detach" | "check" | "uncheck" | "hide" | "show" | "grant" | "release-ok"
            | "revoke",
            _,
        ) => return Err(bad_argument("no argument")),
        (step, _) => {
            return Err(ParseScriptError::UnknownStep {
                line,
                step: step.to_owned(),
            });
        }
    })
}

/// What happened when running a single line of a script.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Outcome {
    pub line: usize,
    pub step: String,
    pub state: &'static str,
    pub calls: Vec<HostCall>,
}

/// Runs the given lines against a fresh wake locker.
pub fn run(lines: &[Line], verbose: bool) -> Result<Vec<Outcome>, RunError> {
    let mut locker = WakeLocker::new(RecordingHost::default().with_verbose_attribute(verbose));
    lines
        .iter()
        .map(|line| {
            if let Some(event) = event_for(&mut locker, line)? {
                locker.handle(event);
            }
            Ok(Outcome {
                line: line.number,
                step: line.text.clone(),
                state: locker.state().name(),
                calls: locker.host_mut().take_calls(),
            })
        })
        .collect()
}

/// Applies the setup part of the step to the host, and returns the event to deliver, if any.
fn event_for(
    locker: &mut WakeLocker<RecordingHost>,
    line: &Line,
) -> Result<Option<Event<u32>>, RunError> {
    let host = locker.host_mut();
    Ok(Some(match &line.step {
        Step::Supported(supported) => {
            host.supported = *supported;
            return Ok(None);
        }
        Step::Control(control) => {
            host.control = *control;
            return Ok(None);
        }
        Step::Attach => Event::Attach,
        Step::Detach => Event::Detach,
        Step::Check => Event::ControlChanged(true),
        Step::Uncheck => Event::ControlChanged(false),
        Step::Hide => {
            host.visibility = Visibility::Hidden;
            Event::VisibilityChanged(Visibility::Hidden)
        }
        Step::Show => {
            host.visibility = Visibility::Visible;
            Event::VisibilityChanged(Visibility::Visible)
        }
        Step::Grant => {
            if !locker.is_acquire_in_flight() {
                return Err(RunError::NoRequest(line.number));
            }
            Event::AcquireCompleted(Ok(locker.host_mut().next_sentinel()))
        }
        Step::Deny(reason) => {
            if !locker.is_acquire_in_flight() {
                return Err(RunError::NoRequest(line.number));
            }
            Event::AcquireCompleted(Err(LockError::Denied(reason.clone())))
        }
        Step::ReleaseOk => Event::ReleaseCompleted(Ok(())),
        Step::ReleaseFail(reason) => {
            Event::ReleaseCompleted(Err(LockError::ReleaseFailed(reason.clone())))
        }
        Step::Revoke => match locker.state() {
            State::Held(sentinel) => Event::LockReleased(*sentinel),
            _ => return Err(RunError::NoLock(line.number)),
        },
        Step::Verbose(verbose) => {
            host.verbose_attribute = *verbose;
            Event::VerboseChanged(*verbose)
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wakelock::WakeLockKind;

    #[test]
    fn parse_steps() {
        let lines = parse_script(
            "\
# Setup
control unchecked
attach

check   # turn it on
deny low battery
",
        )
        .unwrap();
        assert_eq!(
            lines
                .iter()
                .map(|line| (line.number, line.step.clone()))
                .collect::<Vec<_>>(),
            vec![
                (2, Step::Control(Some(false))),
                (3, Step::Attach),
                (5, Step::Check),
                (6, Step::Deny("low battery".to_string())),
            ]
        );
        assert_eq!(lines[2].text, "check");
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            parse_script("attach\nsnooze"),
            Err(ParseScriptError::UnknownStep {
                line: 2,
                step: "snooze".to_string()
            })
        );
        assert_eq!(
            parse_script("control maybe"),
            Err(ParseScriptError::BadArgument {
                line: 1,
                step: "control".to_string(),
                expected: "none, checked or unchecked"
            })
        );
        assert_eq!(
            parse_script("attach now"),
            Err(ParseScriptError::BadArgument {
                line: 1,
                step: "attach".to_string(),
                expected: "no argument"
            })
        );
    }

    #[test]
    fn run_toggle() {
        let lines = parse_script("control unchecked\nattach\ncheck\ngrant\nuncheck").unwrap();
        let outcomes = run(&lines, false).unwrap();
        assert_eq!(
            outcomes
                .iter()
                .map(|outcome| outcome.state)
                .collect::<Vec<_>>(),
            vec!["detached", "unarmed", "acquiring", "held", "unarmed"]
        );
        assert_eq!(
            outcomes[2].calls,
            vec![
                HostCall::Request(WakeLockKind::Screen),
                HostCall::SubscribeVisibility
            ]
        );
        assert_eq!(
            outcomes[4].calls,
            vec![HostCall::UnsubscribeVisibility, HostCall::Release(1)]
        );
    }

    #[test]
    fn run_revoke_and_return() {
        let lines = parse_script("attach\ngrant\nhide\nrevoke\nshow\ngrant").unwrap();
        let outcomes = run(&lines, true).unwrap();
        assert_eq!(outcomes[3].state, "awaiting-revisibility");
        assert_eq!(
            outcomes[4].calls,
            vec![
                HostCall::Log(
                    log::Level::Info,
                    "Requesting screen wake lock again now that the page is visible.".to_string()
                ),
                HostCall::Request(WakeLockKind::Screen),
            ]
        );
        assert_eq!(outcomes[5].state, "held");
    }

    #[test]
    fn run_logs_release_on_detach() {
        let lines = parse_script("control checked\nattach\ngrant\ndetach").unwrap();
        let outcomes = run(&lines, true).unwrap();
        assert_eq!(outcomes[3].state, "detached");
        assert_eq!(
            outcomes[3].calls,
            vec![
                HostCall::DisconnectControl,
                HostCall::UnsubscribeVisibility,
                HostCall::Log(
                    log::Level::Info,
                    "Releasing screen wake lock.".to_string()
                ),
                HostCall::Release(1),
            ]
        );
    }

    #[test]
    fn run_errors() {
        let lines = parse_script("control unchecked\nattach\ngrant").unwrap();
        assert_eq!(run(&lines, false), Err(RunError::NoRequest(3)));

        let lines = parse_script("attach\nrevoke").unwrap();
        assert_eq!(run(&lines, false), Err(RunError::NoLock(2)));
    }

    #[test]
    fn run_unsupported() {
        let lines = parse_script("supported no\nattach\nshow").unwrap();
        let outcomes = run(&lines, true).unwrap();
        assert_eq!(outcomes[1].state, "inert");
        assert_eq!(
            outcomes[1].calls,
            vec![HostCall::Log(
                log::Level::Warn,
                "Wake lock not available on this platform.".to_string()
            )]
        );
        assert_eq!(outcomes[2].calls, vec![]);
    }
}

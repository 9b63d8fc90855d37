// Copyright 2026 The wakelocker Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

mod script;

use crate::script::{Outcome, parse_script, run};
use clap::Parser;
use eyre::Report;
use log::info;
use std::{fs::read_to_string, path::PathBuf};
use wakelock::recording::HostCall;

fn main() -> Result<(), Report> {
    pretty_env_logger::init();

    match Args::parse() {
        Args::Simulate {
            path,
            json,
            verbose,
        } => {
            let lines = parse_script(&read_to_string(path)?)?;
            info!("Running {} steps", lines.len());
            for outcome in run(&lines, verbose)? {
                if json {
                    println!("{}", serde_json::to_string(&outcome)?);
                } else {
                    print_outcome(&outcome);
                }
            }
        }
        Args::Check { path } => {
            let lines = parse_script(&read_to_string(&path)?)?;
            println!("{}: {} steps OK", path.display(), lines.len());
        }
    }

    Ok(())
}

#[derive(Clone, Debug, Parser)]
enum Args {
    /// Run the given script against a wake locker and print every call it makes to its host.
    Simulate {
        path: PathBuf,
        /// Print one JSON object per line instead of text.
        #[arg(long)]
        json: bool,
        /// Start with the `verbose` attribute set.
        #[arg(long)]
        verbose: bool,
    },
    /// Check that the given script parses.
    Check { path: PathBuf },
}

fn print_outcome(outcome: &Outcome) {
    println!("{:>3} {}: {}", outcome.line, outcome.step, outcome.state);
    for call in &outcome.calls {
        match call {
            HostCall::Request(kind) => println!("      request {kind:?}"),
            HostCall::Release(sentinel) => println!("      release #{sentinel}"),
            HostCall::WatchRelease(sentinel) => println!("      watch release of #{sentinel}"),
            HostCall::SubscribeVisibility => println!("      subscribe to visibility changes"),
            HostCall::UnsubscribeVisibility => {
                println!("      unsubscribe from visibility changes")
            }
            HostCall::ConnectControl => println!("      connect control"),
            HostCall::DisconnectControl => println!("      disconnect control"),
            HostCall::SetVerbose(verbose) => println!("      set verbose attribute to {verbose}"),
            HostCall::Log(level, message) => println!("      [{level}] {message}"),
        }
    }
}

// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! The `@MIDI:` line protocol.
//!
//! USB-CDC bridges and the console speak ASCII lines of the form
//! `@MIDI:<b0>,<b1>,<b2>` carrying decimal byte values. This adapter
//! reads stdin; the parser is transport-agnostic so a serial adapter
//! can reuse it.

use std::error::Error;
use std::fmt;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc::Sender;
use tracing::{debug, info};

const LINE_PREFIX: &str = "@MIDI:";

/// Parses one protocol line into a raw MIDI message.
///
/// A line must yield three decimal byte values; senders zero-fill the
/// third byte of two-byte messages such as program change. Anything
/// else, including short lines, is dropped whole.
pub fn parse_midi_line(line: &str) -> Option<Vec<u8>> {
    let values = line.trim().strip_prefix(LINE_PREFIX)?;
    let mut message = Vec::with_capacity(3);
    for value in values.split(',').take(3) {
        message.push(value.trim().parse::<u8>().ok()?);
    }
    if message.len() < 3 {
        return None;
    }
    Some(message)
}

/// The console adapter: reads protocol lines from stdin.
pub struct Device {
    closed: Arc<AtomicBool>,
}

impl Device {
    pub fn new() -> Device {
        Device {
            closed: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl super::Device for Device {
    fn name(&self) -> String {
        "console".to_string()
    }

    fn watch_events(&self, sender: Sender<Vec<u8>>) -> Result<(), Box<dyn Error>> {
        info!("Watching console MIDI lines.");

        let closed = self.closed.clone();
        thread::Builder::new()
            .name("console-midi".to_string())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    if closed.load(Ordering::Relaxed) {
                        break;
                    }
                    let Ok(line) = line else {
                        break;
                    };
                    match parse_midi_line(&line) {
                        Some(message) => {
                            if sender.blocking_send(message).is_err() {
                                break;
                            }
                        }
                        None => debug!(line, "Ignoring non-MIDI console line"),
                    }
                }
            })?;

        Ok(())
    }

    fn stop_watch_events(&self) {
        self.closed.store(true, Ordering::Relaxed);
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "console (line protocol)")
    }
}

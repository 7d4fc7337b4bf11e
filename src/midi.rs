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

//! MIDI input adapters.
//!
//! Adapters normalize whatever transport they sit on into raw MIDI
//! messages and forward them to the dispatcher over a channel. Besides
//! the midir port adapter there is a line-protocol adapter that reads
//! `@MIDI:<b0>,<b1>,<b2>` lines from the console, and a mock for tests.

use std::{error::Error, fmt, sync::Arc};

use tokio::sync::mpsc::Sender;

mod line;
mod midir;
mod mock;

// Exported for serial-bridge adapters that speak the same line protocol
#[allow(unused_imports)]
pub use line::parse_midi_line;

/// A MIDI input device that can forward events to the dispatcher.
pub trait Device: fmt::Display + Send + Sync {
    /// Returns the name of the device.
    fn name(&self) -> String;

    /// Watches MIDI input for events and sends them to the given sender.
    fn watch_events(&self, sender: Sender<Vec<u8>>) -> Result<(), Box<dyn Error>>;

    /// Stops watching events.
    fn stop_watch_events(&self);
}

/// Lists input devices known to midir.
pub fn list_devices() -> Result<Vec<Box<dyn Device>>, Box<dyn Error>> {
    midir::list()
}

/// Gets a device with the given name. `console` is the line-protocol
/// adapter on stdin; names starting with `mock` resolve to the mock.
pub fn get_device(name: &str) -> Result<Arc<dyn Device>, Box<dyn Error>> {
    if name.starts_with("mock") {
        return Ok(Arc::new(mock::Device::get(name)));
    }
    if name == "console" {
        return Ok(Arc::new(line::Device::new()));
    }

    Ok(Arc::new(midir::get(name)?))
}

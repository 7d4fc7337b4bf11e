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

//! Short status strings for an attached display.
//!
//! The engine reports preset progress as four-character strings, the
//! format a 7-segment display wants: `LNNN` while loading, `NNNN` once
//! loaded, `ENNN` for an empty or missing preset. Hosts without a
//! physical display get the logging sink.

use tracing::info;

/// Anything that can show a four-character status.
pub trait StatusSink: Send + Sync {
    fn show(&self, status: &str);
}

/// Default sink: status goes to the log.
pub struct LogSink;

impl StatusSink for LogSink {
    fn show(&self, status: &str) {
        info!(status, "Display");
    }
}

/// Status string shown while a preset loads.
pub fn loading(preset: u8) -> String {
    format!("L{:03}", preset)
}

/// Status string shown once a preset finished loading.
pub fn loaded(preset: u8) -> String {
    format!("{:04}", preset)
}

/// Status string shown for a missing or empty preset.
pub fn empty(preset: u8) -> String {
    format!("E{:03}", preset)
}

#[cfg(test)]
pub struct RecordingSink {
    shown: parking_lot::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn new() -> RecordingSink {
        RecordingSink {
            shown: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn shown(&self) -> Vec<String> {
        self.shown.lock().clone()
    }
}

#[cfg(test)]
impl StatusSink for RecordingSink {
    fn show(&self, status: &str) {
        self.shown.lock().push(status.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_formats() {
        assert_eq!(loading(3), "L003");
        assert_eq!(loaded(3), "0003");
        assert_eq!(empty(3), "E003");
        assert_eq!(loading(127), "L127");
        assert_eq!(loaded(127), "0127");
    }
}

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
use std::{error::Error, fmt, sync::Mutex};

use tokio::sync::mpsc::Sender;
use tracing::info;

/// A mock MIDI device. Events are injected by tests.
pub struct Device {
    name: String,
    sender: Mutex<Option<Sender<Vec<u8>>>>,
}

impl Device {
    /// Gets the given mock device.
    pub fn get(name: &str) -> Device {
        Device {
            name: name.to_string(),
            sender: Mutex::new(None),
        }
    }

    #[cfg(test)]
    /// Forwards a mock event as if the transport produced it.
    pub fn mock_event(&self, event: &[u8]) {
        let sender = self.sender.lock().expect("Unable to get sender lock.");
        if let Some(sender) = sender.as_ref() {
            sender
                .blocking_send(event.to_vec())
                .expect("Unable to send mock event.");
        }
    }
}

impl super::Device for Device {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn watch_events(&self, sender: Sender<Vec<u8>>) -> Result<(), Box<dyn Error>> {
        info!(device = self.name, "Watching mock MIDI events.");
        *self.sender.lock().expect("Unable to get sender lock.") = Some(sender);
        Ok(())
    }

    fn stop_watch_events(&self) {
        self.sender
            .lock()
            .expect("Unable to get sender lock.")
            .take();
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (mock)", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::super::Device as _;
    use super::*;

    #[test]
    fn test_mock_device_forwards_events() {
        let device = Device::get("mock-pads");
        let (tx, mut rx) = tokio::sync::mpsc::channel::<Vec<u8>>(4);
        device.watch_events(tx).expect("watch");

        device.mock_event(&[0x90, 60, 127]);
        assert_eq!(rx.blocking_recv(), Some(vec![0x90, 60, 127]));

        device.stop_watch_events();
        device.mock_event(&[0x80, 60, 0]);
        assert!(rx.try_recv().is_err());
    }
}

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
use std::{
    error::Error,
    fmt, mem,
    sync::Mutex,
};

use midir::{MidiInput, MidiInputConnection, MidiInputPort};
use tokio::sync::mpsc::Sender;
use tracing::{error, info};

pub struct Device {
    name: String,
    input_port: MidiInputPort,
    event_connection: Mutex<Option<MidiInputConnection<()>>>,
}

/// Lists midir input ports as devices.
pub fn list() -> Result<Vec<Box<dyn super::Device>>, Box<dyn Error>> {
    let input = MidiInput::new("samplerd input")?;
    let mut devices: Vec<Box<dyn super::Device>> = Vec::new();
    for port in input.ports() {
        devices.push(Box::new(Device {
            name: input.port_name(&port)?,
            input_port: port,
            event_connection: Mutex::new(None),
        }));
    }
    Ok(devices)
}

/// Gets the midir device with the given port name.
pub fn get(name: &str) -> Result<Device, Box<dyn Error>> {
    let input = MidiInput::new("samplerd input")?;
    for port in input.ports() {
        if input.port_name(&port)? == name {
            return Ok(Device {
                name: name.to_string(),
                input_port: port,
                event_connection: Mutex::new(None),
            });
        }
    }
    Err(format!("No MIDI input named {}.", name).into())
}

impl super::Device for Device {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn watch_events(&self, sender: Sender<Vec<u8>>) -> Result<(), Box<dyn Error>> {
        let mut event_connection = self.event_connection.lock().expect("unable to get lock");
        if event_connection.is_some() {
            return Err("Already watching events.".into());
        }

        info!(device = self.name, "Watching MIDI events.");

        let input = MidiInput::new("samplerd input watcher")?;
        *event_connection = Some(input.connect(
            &self.input_port,
            "samplerd event watcher",
            move |_, raw_event, _| {
                if let Err(e) = sender.blocking_send(raw_event.to_vec()) {
                    error!(
                        err = format!("{:?}", e),
                        "Error sending MIDI event to dispatcher."
                    );
                }
            },
            (),
        )?);

        Ok(())
    }

    fn stop_watch_events(&self) {
        // Explicitly drop the connection.
        let event_connection = self
            .event_connection
            .lock()
            .expect("error getting mutex")
            .take();

        mem::drop(event_connection);
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (midir)", self.name)
    }
}

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
use std::{error::Error, fmt, thread};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info};

use crate::mixer::Mixer;

pub struct Device {
    name: String,
    device: cpal::Device,
}

impl Device {
    /// Lists cpal output devices.
    pub fn list() -> Result<Vec<Box<dyn super::Device>>, Box<dyn Error>> {
        let host = cpal::default_host();
        let mut devices: Vec<Box<dyn super::Device>> = Vec::new();
        for device in host.output_devices()? {
            devices.push(Box::new(Device {
                name: device.name()?,
                device,
            }));
        }
        Ok(devices)
    }

    /// Gets the named output device, or the host default without a name.
    pub fn get(name: Option<&str>) -> Result<Device, Box<dyn Error>> {
        let host = cpal::default_host();
        match name {
            None => {
                let device = host
                    .default_output_device()
                    .ok_or("No default audio output device.")?;
                Ok(Device {
                    name: device.name()?,
                    device,
                })
            }
            Some(name) => {
                for device in host.output_devices()? {
                    if device.name()? == name {
                        return Ok(Device {
                            name: name.to_string(),
                            device,
                        });
                    }
                }
                Err(format!("No audio output device named {}.", name).into())
            }
        }
    }
}

impl super::Device for Device {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn play(&self, mut mixer: Mixer) -> Result<(), Box<dyn Error>> {
        let config = cpal::StreamConfig {
            channels: super::CHANNELS,
            sample_rate: super::SAMPLE_RATE,
            buffer_size: cpal::BufferSize::Fixed(super::BUFFER_FRAMES),
        };

        let stream = self.device.build_output_stream(
            &config,
            move |data: &mut [i16], _| mixer.mix_into(data),
            |e| error!(error = %e, "Audio stream error."),
            None,
        )?;
        stream.play()?;

        info!(
            device = self.name,
            sample_rate = super::SAMPLE_RATE,
            buffer_frames = super::BUFFER_FRAMES,
            "Audio output running."
        );

        // The stream lives as long as this frame; the callback does the
        // rest.
        loop {
            thread::park();
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (cpal)", self.name)
    }
}

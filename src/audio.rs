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

//! Audio output devices.
//!
//! The engine mixes into whatever buffer the host device asks for; the
//! device layer owns stream negotiation and the callback cadence. The
//! output format is fixed: 44.1 kHz, stereo, int16, 512-frame buffers.

use std::{error::Error, fmt, sync::Arc};

use crate::mixer::Mixer;

mod cpal;
mod mock;

/// Output sample rate in Hz.
pub const SAMPLE_RATE: u32 = 44_100;

/// Output channel count.
pub const CHANNELS: u16 = 2;

/// Frames per output buffer requested from the device.
pub const BUFFER_FRAMES: u32 = 512;

/// An audio output device that can drive the mixer.
pub trait Device: fmt::Display + Send + Sync {
    /// Returns the name of the device.
    fn name(&self) -> String;

    /// Opens the output stream and drives the mixer callback. Does not
    /// return while the stream is healthy.
    fn play(&self, mixer: Mixer) -> Result<(), Box<dyn Error>>;
}

/// Lists devices known to cpal.
pub fn list_devices() -> Result<Vec<Box<dyn Device>>, Box<dyn Error>> {
    cpal::Device::list()
}

/// Gets a device with the given name, or the default output device when
/// no name is given.
pub fn get_device(name: Option<&str>) -> Result<Arc<dyn Device>, Box<dyn Error>> {
    if let Some(name) = name {
        if name.starts_with("mock") {
            return Ok(Arc::new(mock::Device::get(name)));
        }
    }

    Ok(Arc::new(cpal::Device::get(name)?))
}

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
use std::{error::Error, fmt, thread, time::Duration};

use tracing::info;

use crate::mixer::Mixer;

/// A mock device. Pulls buffers at the real callback cadence and
/// discards them; useful for running without audio hardware.
pub struct Device {
    name: String,
}

impl Device {
    /// Gets the given mock device.
    pub fn get(name: &str) -> Device {
        Device {
            name: name.to_string(),
        }
    }
}

impl super::Device for Device {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn play(&self, mut mixer: Mixer) -> Result<(), Box<dyn Error>> {
        info!(device = self.name, "Mock audio output running.");

        let mut buffer = vec![0i16; super::BUFFER_FRAMES as usize * super::CHANNELS as usize];
        let period = Duration::from_nanos(
            super::BUFFER_FRAMES as u64 * 1_000_000_000 / super::SAMPLE_RATE as u64,
        );
        loop {
            mixer.mix_into(&mut buffer);
            thread::sleep(period);
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (mock)", self.name)
    }
}

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

//! Startup configuration, set once by the host.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default maximum number of simultaneous voices.
pub const DEFAULT_MAX_POLYPHONY: usize = 80;

/// Default global volume in dBFS.
pub const DEFAULT_VOLUME_DB: f32 = -12.0;

/// Typed error for config load/parse failures so callers can distinguish
/// e.g. file-not-found from parse errors without string matching.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config load/parse error: {0}")]
    Load(#[from] config::ConfigError),
}

/// A YAML representation of the sampler configuration.
#[derive(Deserialize, Clone, Debug)]
pub struct Sampler {
    /// The audio output device name. Unset means the system default.
    audio_device: Option<String>,

    /// The root directory containing the preset directories.
    samples_dir: PathBuf,

    /// Maximum number of simultaneous voices.
    #[serde(default = "default_max_polyphony")]
    max_polyphony: usize,

    /// Global volume in dBFS.
    #[serde(default = "default_volume_db")]
    volume_db: f32,

    /// The preset loaded at startup.
    #[serde(default)]
    initial_preset: u8,

    /// MIDI input port names to watch.
    #[serde(default)]
    midi_devices: Vec<String>,

    /// Whether to read `@MIDI:` lines from the console.
    #[serde(default)]
    console_midi: bool,
}

fn default_max_polyphony() -> usize {
    DEFAULT_MAX_POLYPHONY
}

fn default_volume_db() -> f32 {
    DEFAULT_VOLUME_DB
}

impl Sampler {
    /// Gets the configured audio device name.
    pub fn audio_device(&self) -> Option<&str> {
        self.audio_device.as_deref()
    }

    /// Gets the samples root directory.
    pub fn samples_dir(&self) -> &Path {
        &self.samples_dir
    }

    /// Gets the polyphony cap.
    pub fn max_polyphony(&self) -> usize {
        self.max_polyphony
    }

    /// Gets the default global volume as a linear gain.
    pub fn global_volume(&self) -> f32 {
        10f32.powf(self.volume_db / 20.0)
    }

    /// Gets the preset to load at startup.
    pub fn initial_preset(&self) -> u8 {
        self.initial_preset
    }

    /// Gets the MIDI input ports to watch.
    pub fn midi_devices(&self) -> &[String] {
        &self.midi_devices
    }

    /// Whether the console line adapter is enabled.
    pub fn console_midi(&self) -> bool {
        self.console_midi
    }
}

/// Loads the sampler configuration from the given file.
pub fn load(path: &Path) -> Result<Sampler, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::from(path))
        .build()?;
    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sampler.yaml");
        fs::write(&path, "samples_dir: /media/samples\n").expect("write");

        let config = load(&path).expect("load");
        assert_eq!(config.samples_dir(), Path::new("/media/samples"));
        assert_eq!(config.audio_device(), None);
        assert_eq!(config.max_polyphony(), 80);
        assert_eq!(config.initial_preset(), 0);
        assert!(!config.console_midi());
        assert!(config.midi_devices().is_empty());
        // -12 dBFS as linear gain.
        assert!((config.global_volume() - 0.2511886).abs() < 1e-6);
    }

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sampler.yaml");
        fs::write(
            &path,
            concat!(
                "audio_device: USB Audio\n",
                "samples_dir: /media/samples\n",
                "max_polyphony: 32\n",
                "volume_db: -6.0\n",
                "initial_preset: 4\n",
                "midi_devices:\n",
                "  - nanoKEY\n",
                "console_midi: true\n",
            ),
        )
        .expect("write");

        let config = load(&path).expect("load");
        assert_eq!(config.audio_device(), Some("USB Audio"));
        assert_eq!(config.max_polyphony(), 32);
        assert_eq!(config.initial_preset(), 4);
        assert_eq!(config.midi_devices(), ["nanoKEY".to_string()]);
        assert!(config.console_midi());
        assert!((config.global_volume() - 0.5011872).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load(Path::new("/nonexistent/sampler.yaml")).is_err());
    }
}

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
mod audio;
mod config;
mod display;
mod engine;
mod midi;
mod mixer;
mod playsync;
mod samples;
#[cfg(test)]
mod testutil;
mod wave;

use std::error::Error;
use std::path::Path;
use std::sync::atomic::AtomicI32;
use std::sync::Arc;
use std::thread;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use crate::engine::Engine;
use crate::mixer::Mixer;
use crate::samples::{PresetLoader, StoreHandle};

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = "0.1.0",
    about = "A polyphonic MIDI sampler."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Starts the sampler with the given configuration.
    Start {
        /// The path to the sampler config.
        config_path: String,
    },
    /// Lists the available audio output devices.
    Devices {},
    /// Lists the available MIDI input devices.
    MidiDevices {},
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Devices {} => {
            for device in audio::list_devices()? {
                println!("- {}", device);
            }
            Ok(())
        }
        Commands::MidiDevices {} => {
            for device in midi::list_devices()? {
                println!("- {}", device);
            }
            Ok(())
        }
        Commands::Start { config_path } => start(Path::new(&config_path)).await,
    }
}

async fn start(config_path: &Path) -> Result<(), Box<dyn Error>> {
    let config = config::load(config_path)?;
    let volume = config.global_volume();

    let (events, event_rx) = mixer::control_channel();
    let mixer = Mixer::new(event_rx, config.max_polyphony(), volume);
    let store = StoreHandle::new();
    let transpose = Arc::new(AtomicI32::new(0));
    let status: Arc<dyn display::StatusSink> = Arc::new(display::LogSink);

    let loader = PresetLoader::new(
        config.samples_dir().to_path_buf(),
        store.clone(),
        events.clone(),
        transpose.clone(),
        volume,
        status,
    );
    let engine = Engine::new(events, store, transpose, loader);

    // An unopenable audio device is fatal before anything else starts.
    let device = audio::get_device(config.audio_device())?;
    info!(device = %device, "Using audio output device");
    thread::Builder::new().name("audio".to_string()).spawn(move || {
        if let Err(e) = device.play(mixer) {
            error!(error = %e, "Unable to open audio output");
            std::process::exit(1);
        }
    })?;

    engine.load_preset(config.initial_preset());

    let (midi_tx, mut midi_rx) = tokio::sync::mpsc::channel::<Vec<u8>>(256);
    let mut adapters: Vec<Arc<dyn midi::Device>> = Vec::new();
    for name in config.midi_devices() {
        let adapter = midi::get_device(name)?;
        adapter.watch_events(midi_tx.clone())?;
        info!(device = %adapter, "Watching MIDI device");
        adapters.push(adapter);
    }
    if config.console_midi() {
        let adapter = midi::get_device("console")?;
        adapter.watch_events(midi_tx.clone())?;
        adapters.push(adapter);
    }
    drop(midi_tx);

    tokio::spawn(async move {
        while let Some(message) = midi_rx.recv().await {
            engine.handle_message(&message);
        }
    });

    info!("Sampler running. Press Ctrl-C to exit.");
    tokio::signal::ctrl_c().await?;

    for adapter in &adapters {
        adapter.stop_watch_events();
    }
    Ok(())
}

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

//! Decoded samples and the immutable store snapshot the engine plays from.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::wave::{self, WaveError};

/// A decoded sample, immutable after construction.
///
/// Samples are shared behind `Arc`: voices hold a reference for as long
/// as they play, so a sample outlives the store that introduced it.
pub struct Sample {
    /// Interleaved stereo int16 frames.
    pcm: Vec<i16>,
    /// Total frames in `pcm`.
    frame_count: usize,
    /// Loop start/end frame indices, `None` for one-shot samples.
    loop_points: Option<(usize, usize)>,
    /// The MIDI note this sample was recorded at.
    midi_note: u8,
    /// The velocity layer this sample belongs to.
    velocity: u8,
}

impl Sample {
    /// Decodes a WAV file into a sample keyed at (midi_note, velocity).
    pub fn load(path: &Path, midi_note: u8, velocity: u8) -> Result<Sample, WaveError> {
        let decoded = wave::decode_file(path)?;
        Ok(Sample {
            pcm: decoded.pcm,
            frame_count: decoded.frame_count,
            loop_points: decoded.loop_points,
            midi_note,
            velocity,
        })
    }

    /// The MIDI note the sample plays at unity pitch.
    pub fn midi_note(&self) -> u8 {
        self.midi_note
    }

    /// The velocity layer of this sample.
    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    /// Total frames resident in memory.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Loop points, if the sample loops.
    pub fn loop_points(&self) -> Option<(usize, usize)> {
        self.loop_points
    }

    /// Reads the stereo frame at `index`.
    #[inline]
    pub fn frame(&self, index: usize) -> (i16, i16) {
        (self.pcm[index * 2], self.pcm[index * 2 + 1])
    }

    /// Builds a sample directly from frames, bypassing the decoder.
    #[cfg(test)]
    pub fn from_parts(
        pcm: Vec<i16>,
        loop_points: Option<(usize, usize)>,
        midi_note: u8,
        velocity: u8,
    ) -> Sample {
        let frame_count = pcm.len() / 2;
        Sample {
            pcm,
            frame_count,
            loop_points,
            midi_note,
            velocity,
        }
    }
}

impl std::fmt::Debug for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sample")
            .field("midi_note", &self.midi_note())
            .field("velocity", &self.velocity())
            .field("frames", &self.frame_count())
            .field("loop_points", &self.loop_points())
            .finish()
    }
}

/// An immutable snapshot of samples keyed by (midi note, velocity).
///
/// Built whole by the preset loader and published once; never mutated in
/// place afterwards.
#[derive(Default)]
pub struct SampleStore {
    samples: HashMap<(u8, u8), Arc<Sample>>,
}

impl SampleStore {
    /// Looks up the exact (note, velocity) key. Velocity layers are
    /// sparse; a miss is an ordinary outcome, not an error.
    pub fn get(&self, midi_note: u8, velocity: u8) -> Option<Arc<Sample>> {
        self.samples.get(&(midi_note, velocity)).cloned()
    }

    /// Inserts a sample under its own identity key.
    pub fn insert(&mut self, sample: Sample) {
        self.samples
            .insert((sample.midi_note, sample.velocity), Arc::new(sample));
    }

    /// Number of mapped (note, velocity) cells.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no samples are mapped.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Shared handle through which the loader publishes a new store and the
/// dispatcher takes snapshots.
///
/// Readers clone the inner `Arc`, so installation is a pointer swap and
/// never blocks a reader for longer than the swap itself. The realtime
/// thread never touches this handle; voices carry their own sample Arcs.
#[derive(Clone, Default)]
pub struct StoreHandle {
    inner: Arc<RwLock<Arc<SampleStore>>>,
}

impl StoreHandle {
    /// Creates a handle holding an empty store.
    pub fn new() -> StoreHandle {
        StoreHandle::default()
    }

    /// The store currently in force.
    pub fn snapshot(&self) -> Arc<SampleStore> {
        self.inner.read().clone()
    }

    /// Atomically replaces the store in force.
    pub fn install(&self, store: SampleStore) {
        *self.inner.write() = Arc::new(store);
    }
}

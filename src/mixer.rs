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

//! The realtime mixing core.
//!
//! `Mixer::mix_into` runs inside the audio callback. It drains the
//! control-event channel, applies the events, truncates to the polyphony
//! cap, renders every active voice into a preallocated f32 scratch
//! buffer, and saturates the sum to int16. The hot path takes no locks
//! and does not allocate in steady state; the dispatcher on the other
//! end of the channel is the only other party.

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::samples::{Sample, Voice};

/// Capacity of the control-event channel.
///
/// Deep enough that a burst of MIDI within one buffer period cannot fill
/// it; the dispatcher drops note-ons (never releases) if it ever does.
pub const EVENT_QUEUE_DEPTH: usize = 1024;

/// Scratch frames preallocated for the host buffer. Hosts asking for
/// more get a one-time reallocation outside the steady state.
const SCRATCH_FRAMES: usize = 4096;

/// Control events applied by the audio thread between buffers.
pub enum ControlEvent {
    /// Start a voice for `note` playing `sample`.
    NoteOn { sample: Arc<Sample>, note: u8 },
    /// Release every held voice started by `note`.
    NoteOff { note: u8 },
    /// Sustain pedal state change.
    Sustain(bool),
    /// Replace the linear global volume.
    SetVolume(f32),
    /// Drop all voices immediately; sent on preset replacement.
    ClearVoices,
}

/// Sending side of the control plane, held by the dispatcher and loader.
pub type EventSender = Sender<ControlEvent>;

/// Creates the dispatcher-to-mixer control channel.
pub fn control_channel() -> (EventSender, Receiver<ControlEvent>) {
    bounded(EVENT_QUEUE_DEPTH)
}

/// The realtime mixer. Owned by the audio callback thread.
pub struct Mixer {
    events: Receiver<ControlEvent>,
    active: Vec<Voice>,
    scratch: Vec<f32>,
    max_polyphony: usize,
    volume: f32,
    sustain: bool,
}

impl Mixer {
    /// Creates a mixer draining `events`, capped at `max_polyphony`
    /// simultaneous voices, at the given initial linear volume.
    pub fn new(events: Receiver<ControlEvent>, max_polyphony: usize, volume: f32) -> Mixer {
        Mixer {
            events,
            active: Vec::with_capacity(max_polyphony * 2),
            scratch: vec![0.0; SCRATCH_FRAMES * 2],
            max_polyphony,
            volume,
            sustain: false,
        }
    }

    /// Fills `out` (interleaved stereo int16) with the next buffer.
    ///
    /// This is the audio callback body. Pending control events are
    /// applied first, then the oldest voices beyond the polyphony cap
    /// are dropped before they emit a sample, then the survivors are
    /// rendered, scaled, and saturated into `out`.
    pub fn mix_into(&mut self, out: &mut [i16]) {
        while let Ok(event) = self.events.try_recv() {
            self.apply(event);
        }

        if self.active.len() > self.max_polyphony {
            let excess = self.active.len() - self.max_polyphony;
            self.active.drain(..excess);
        }

        if self.scratch.len() < out.len() {
            self.scratch.resize(out.len(), 0.0);
        }
        let scratch = &mut self.scratch[..out.len()];
        scratch.fill(0.0);

        self.active.retain_mut(|voice| voice.render(scratch));

        let volume = self.volume;
        for (sample, sum) in out.iter_mut().zip(scratch.iter()) {
            *sample = (sum * volume).clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        }
    }

    fn apply(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::NoteOn { sample, note } => {
                self.active.push(Voice::new(sample, note));
            }
            ControlEvent::NoteOff { note } => {
                let sustain = self.sustain;
                for voice in self.active.iter_mut() {
                    if voice.note() == note && voice.is_held() {
                        voice.release(sustain);
                    }
                }
            }
            ControlEvent::Sustain(true) => self.sustain = true,
            ControlEvent::Sustain(false) => {
                for voice in self.active.iter_mut() {
                    voice.drop_sustain();
                }
                self.sustain = false;
            }
            ControlEvent::SetVolume(volume) => self.volume = volume,
            ControlEvent::ClearVoices => {
                self.active.clear();
                self.sustain = false;
            }
        }
    }

    /// Number of live voices.
    pub fn active_voices(&self) -> usize {
        self.active.len()
    }

    #[cfg(test)]
    pub fn voices(&self) -> &[Voice] {
        &self.active
    }
}

impl std::fmt::Debug for Mixer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mixer")
            .field("active_voices", &self.active_voices())
            .field("max_polyphony", &self.max_polyphony)
            .field("volume", &self.volume)
            .field("sustain", &self.sustain)
            .finish()
    }
}

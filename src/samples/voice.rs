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

//! One playing instance of a sample.
//!
//! A voice advances through its sample with a fractional step derived
//! from the pitch table, wraps at the loop points, and applies the
//! fade-out envelope once released. All of this runs on the audio
//! thread; nothing here locks or allocates.

use std::sync::Arc;
use std::sync::OnceLock;

use super::store::Sample;

/// Frames over which a released voice fades to silence.
pub const FADEOUT_LENGTH: usize = 30_000;

/// Semitone steps covered by the pitch table.
const SPEED_STEPS: usize = 84;

/// Table index of unity pitch; `note - sample_note` is offset by this.
const PITCH_TABLE_OFFSET: i32 = 48;

static SPEED: OnceLock<[f32; SPEED_STEPS]> = OnceLock::new();
static FADEOUT: OnceLock<Vec<f32>> = OnceLock::new();

fn speed_table() -> &'static [f32; SPEED_STEPS] {
    SPEED.get_or_init(|| {
        let mut table = [0.0f32; SPEED_STEPS];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = 2f32.powf((i as i32 - PITCH_TABLE_OFFSET) as f32 / 12.0);
        }
        table
    })
}

/// Sixth-power release curve, padded with a tail of zeros so a lookup
/// one buffer past the fade end stays in bounds.
fn fadeout_table() -> &'static [f32] {
    FADEOUT.get_or_init(|| {
        let mut table = Vec::with_capacity(FADEOUT_LENGTH * 2);
        for j in 0..FADEOUT_LENGTH {
            let linear = (FADEOUT_LENGTH - 1 - j) as f32 / (FADEOUT_LENGTH - 1) as f32;
            table.push(linear.powi(6));
        }
        table.resize(FADEOUT_LENGTH * 2, 0.0);
        table
    })
}

/// Source frames advanced per output frame for a note played against a
/// sample recorded at `sample_note`. Shifts beyond the table clamp to
/// its nearest entry.
pub fn playback_step(note: u8, sample_note: u8) -> f64 {
    let index = (note as i32 - sample_note as i32 + PITCH_TABLE_OFFSET)
        .clamp(0, SPEED_STEPS as i32 - 1) as usize;
    speed_table()[index] as f64
}

/// Per-voice playback state. Owned exclusively by the mixer while live.
pub struct Voice {
    sample: Arc<Sample>,
    /// Effective MIDI note that started this voice.
    note: u8,
    /// Fractional read position, in frames.
    pos: f64,
    step: f64,
    /// Still held down; a note-off clears this.
    held: bool,
    /// Released while the sustain pedal was down.
    sustained: bool,
    fading: bool,
    fade_pos: usize,
}

impl Voice {
    /// Starts a voice at the beginning of `sample`, pitched for `note`.
    pub fn new(sample: Arc<Sample>, note: u8) -> Voice {
        let step = playback_step(note, sample.midi_note());
        Voice {
            sample,
            note,
            pos: 0.0,
            step,
            held: true,
            sustained: false,
            fading: false,
            fade_pos: 0,
        }
    }

    /// The effective note that started this voice.
    pub fn note(&self) -> u8 {
        self.note
    }

    /// True until the note-off for this voice arrives.
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// True when the voice is parked on the sustain pedal.
    pub fn is_sustained(&self) -> bool {
        self.sustained
    }

    /// Begins the release envelope. Idempotent: calling again on a
    /// fading voice does not restart the fade.
    pub fn fadeout(&mut self) {
        if !self.fading {
            self.fading = true;
            self.fade_pos = 0;
        }
    }

    /// Handles the note-off for this voice: parks it on the pedal when
    /// sustain is down, otherwise starts the release.
    pub fn release(&mut self, sustain_on: bool) {
        self.held = false;
        if sustain_on {
            self.sustained = true;
        } else {
            self.fadeout();
        }
    }

    /// Releases a pedal-parked voice when the sustain pedal comes up.
    pub fn drop_sustain(&mut self) {
        if self.sustained {
            self.sustained = false;
            self.fadeout();
        }
    }

    /// Accumulates this voice into `out` (interleaved stereo f32).
    ///
    /// Returns false when the voice finished during this buffer: the
    /// fade completed, or a one-shot sample ran off its end. Loop wrap
    /// subtracts rather than resetting so the sub-frame phase survives
    /// the seam.
    pub fn render(&mut self, out: &mut [f32]) -> bool {
        let fadeout = fadeout_table();
        let frame_count = self.sample.frame_count();
        let loop_points = self.sample.loop_points();

        for frame in out.chunks_exact_mut(2) {
            let index = self.pos as usize;
            if index >= frame_count {
                return false;
            }
            let (left, right) = self.sample.frame(index);

            let gain = if self.fading {
                let gain = fadeout[self.fade_pos];
                self.fade_pos += 1;
                gain
            } else {
                1.0
            };
            frame[0] += left as f32 * gain;
            frame[1] += right as f32 * gain;

            if self.fading && self.fade_pos >= FADEOUT_LENGTH {
                return false;
            }

            self.pos += self.step;
            match loop_points {
                Some((start, end)) => {
                    if self.pos >= end as f64 {
                        self.pos = start as f64 + (self.pos - end as f64);
                    }
                }
                None => {
                    if self.pos >= frame_count as f64 {
                        return false;
                    }
                }
            }
        }

        true
    }

    #[cfg(test)]
    pub fn position(&self) -> f64 {
        self.pos
    }

    #[cfg(test)]
    pub fn is_fading(&self) -> bool {
        self.fading
    }

    #[cfg(test)]
    pub fn fade_position(&self) -> usize {
        self.fade_pos
    }
}

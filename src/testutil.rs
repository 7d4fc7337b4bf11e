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

//! Test helpers for building WAV fixtures, including `smpl` loop chunks
//! that off-the-shelf writers do not produce.

use std::fs;
use std::path::Path;

/// Builds a complete RIFF/WAVE byte stream.
///
/// `samples` are interleaved across `channels` and written at the given
/// bit width (one value per sample, low bytes taken for 24-bit). Each
/// entry of `loops` becomes a loop record in a `smpl` chunk.
pub fn wav_bytes(bits: u16, channels: u16, samples: &[i32], loops: &[(u32, u32)]) -> Vec<u8> {
    let bytes_per_sample = (bits / 8) as usize;
    let block_align = channels as usize * bytes_per_sample;
    let sample_rate: u32 = 44_100;

    let mut data = Vec::with_capacity(samples.len() * bytes_per_sample);
    for sample in samples {
        let raw = (*sample as u32).to_le_bytes();
        data.extend_from_slice(&raw[..bytes_per_sample]);
    }

    let mut smpl = Vec::new();
    if !loops.is_empty() {
        // Nine u32 header fields; only the loop count matters here.
        for field in 0..9 {
            let value: u32 = if field == 7 { loops.len() as u32 } else { 0 };
            smpl.extend_from_slice(&value.to_le_bytes());
        }
        for (start, end) in loops {
            for value in [0u32, 0, *start, *end, 0, 0] {
                smpl.extend_from_slice(&value.to_le_bytes());
            }
        }
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    let riff_size = 4 // "WAVE"
        + 8 + 16 // fmt
        + if smpl.is_empty() { 0 } else { 8 + smpl.len() }
        + 8 + data.len() + (data.len() & 1);
    out.extend_from_slice(&(riff_size as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
    out.extend_from_slice(&(block_align as u16).to_le_bytes());
    out.extend_from_slice(&bits.to_le_bytes());

    if !smpl.is_empty() {
        out.extend_from_slice(b"smpl");
        out.extend_from_slice(&(smpl.len() as u32).to_le_bytes());
        out.extend_from_slice(&smpl);
    }

    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(&data);
    if data.len() & 1 == 1 {
        out.push(0);
    }

    out
}

/// Writes a WAV fixture to `path`.
pub fn write_wav(path: &Path, bits: u16, channels: u16, samples: &[i32], loops: &[(u32, u32)]) {
    fs::write(path, wav_bytes(bits, channels, samples, loops)).expect("write wav fixture");
}

/// Writes a constant-valued 16-bit mono WAV of `frames` frames.
pub fn write_constant_wav(path: &Path, frames: usize, value: i16, loops: &[(u32, u32)]) {
    let samples: Vec<i32> = std::iter::repeat(value as i32).take(frames).collect();
    write_wav(path, 16, 1, &samples, loops);
}

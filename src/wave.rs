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

//! RIFF/WAVE decoding for sample files.
//!
//! Decodes 16- and 24-bit PCM, mono or stereo, into interleaved stereo
//! int16 frames. Loop points are read from the `smpl` sampler chunk when
//! present; hound does not expose foreign chunks, so those are pulled out
//! of the container with a separate chunk walk.

use std::fs;
use std::path::Path;

/// Decode errors. Anything here means the file is skipped by the loader.
#[derive(Debug, thiserror::Error)]
pub enum WaveError {
    #[error("Unable to read WAV file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Unable to parse WAV file: {0}")]
    Format(#[from] hound::Error),
    #[error("File is not a RIFF/WAVE container")]
    NotWave,
    #[error("Unsupported sample width: {0} bits")]
    UnsupportedBitDepth(u16),
    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(u16),
    #[error("Float PCM is not supported")]
    UnsupportedFormat,
}

/// A decoded WAV file: interleaved stereo int16 PCM plus loop metadata.
pub struct DecodedWave {
    /// Interleaved stereo samples, two per frame.
    pub pcm: Vec<i16>,
    /// Total frames in `pcm`.
    pub frame_count: usize,
    /// `(loop_start, loop_end)` frame indices from the first `smpl` loop.
    /// `None` when the sample does not loop.
    pub loop_points: Option<(usize, usize)>,
}

/// Decodes a WAV file into stereo int16 frames.
///
/// Mono input is duplicated into both channels. 24-bit samples are
/// narrowed to 16 bits by discarding the low byte. When the file carries
/// a `smpl` loop, only `loop_end + 2` frames are kept resident; the two
/// extra frames cover fractional-position reads just shy of the wrap
/// point.
pub fn decode_file(path: &Path) -> Result<DecodedWave, WaveError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    if spec.sample_format == hound::SampleFormat::Float {
        return Err(WaveError::UnsupportedFormat);
    }
    let shift = match spec.bits_per_sample {
        16 => 0,
        24 => 8,
        bits => return Err(WaveError::UnsupportedBitDepth(bits)),
    };
    let channels = match spec.channels {
        1 | 2 => spec.channels as usize,
        n => return Err(WaveError::UnsupportedChannels(n)),
    };

    let total_frames = reader.duration() as usize;
    let (mut frame_count, mut loop_points) =
        match read_smpl_loop(path)? {
            Some((start, end)) if (start as usize) < (end as usize) && (end as usize) <= total_frames => {
                let usable = total_frames.min(end as usize + 2);
                (usable, Some((start as usize, end as usize)))
            }
            _ => (total_frames, None),
        };

    let mut pcm = Vec::with_capacity(frame_count * 2);
    for sample in reader.samples::<i32>().take(frame_count * channels) {
        let value = (sample? >> shift) as i16;
        pcm.push(value);
        if channels == 1 {
            pcm.push(value);
        }
    }

    // A data chunk shorter than its header claims loses its tail.
    if pcm.len() / 2 < frame_count {
        frame_count = pcm.len() / 2;
        if let Some((start, end)) = loop_points {
            if end > frame_count || start >= frame_count {
                loop_points = None;
            }
        }
    }
    pcm.truncate(frame_count * 2);

    Ok(DecodedWave {
        pcm,
        frame_count,
        loop_points,
    })
}

/// Reads the first loop of the `smpl` chunk, if any.
///
/// The chunk body is nine little-endian u32 header fields (loop count at
/// byte offset 28) followed by 24-byte loop records with the start and
/// end frame at record offsets 8 and 12.
fn read_smpl_loop(path: &Path) -> Result<Option<(u32, u32)>, WaveError> {
    let data = fs::read(path)?;
    if data.len() < 12 || &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return Err(WaveError::NotWave);
    }

    let mut offset = 12;
    while offset + 8 <= data.len() {
        let id = &data[offset..offset + 4];
        let size = u32::from_le_bytes(
            data[offset + 4..offset + 8]
                .try_into()
                .expect("4-byte slice"),
        ) as usize;
        let body = offset + 8;
        if body + size > data.len() {
            break;
        }
        if id == b"smpl" && size >= 36 + 24 {
            let loop_count =
                u32::from_le_bytes(data[body + 28..body + 32].try_into().expect("4-byte slice"));
            if loop_count >= 1 {
                let record = body + 36;
                let start = u32::from_le_bytes(
                    data[record + 8..record + 12].try_into().expect("4-byte slice"),
                );
                let end = u32::from_le_bytes(
                    data[record + 12..record + 16].try_into().expect("4-byte slice"),
                );
                return Ok(Some((start, end)));
            }
        }
        // Chunks are word-aligned.
        offset = body + size + (size & 1);
    }

    Ok(None)
}

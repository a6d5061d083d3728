// decode ms-adpcm (wave format code 2)
// predictor math per https://wiki.multimedia.cx/index.php/Microsoft_ADPCM

use alloc::{format, vec, vec::Vec};

use crate::{
    chunks::{CoefficientPair, FormatChunk},
    constants::{WaveFormat, ADAPTATION_TABLE, DELTA_MAX, DELTA_MIN},
    Result, WavError,
};

/// Per-channel block header bytes: predictor index, delta, sample1, sample2.
const CHANNEL_HEADER_SIZE: usize = 7;

/// Linear PCM reconstructed from one container, interleaved by channel.
pub struct DecodedAudio {
    pub sample_rate: u32, // in hz
    pub channels: u16,
    pub samples: Vec<i16>,
}

/// How to treat blocks that disagree with the parsed format. The reference
/// behavior clamps out-of-range predictor indices and keeps going.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Default)]
pub enum Strictness {
    #[default]
    Lenient,
    Strict,
}

/// Prediction state for one channel of one block. Seeded from the block
/// header, mutated once per nibble, discarded when the block ends.
struct ChannelState {
    coeff1: i32,
    coeff2: i32,
    delta: i32,
    sample1: i32,
    sample2: i32,
}

impl ChannelState {
    fn expand_nibble(&mut self, nibble: u8) -> i16 {
        let signed = if nibble & 0x8 != 0 { nibble as i32 - 16 } else { nibble as i32 };

        let predicted = self.sample1 as i64 * self.coeff1 as i64 + self.sample2 as i64 * self.coeff2 as i64;
        let sample = ((predicted >> 8) as i32 + signed * self.delta).clamp(-32768, 32767);

        self.sample2 = self.sample1;
        self.sample1 = sample;
        self.delta = ((ADAPTATION_TABLE[nibble as usize] as i32 * self.delta) >> 8).clamp(DELTA_MIN, DELTA_MAX);

        sample as i16
    }
}

fn le_i16_at(block: &[u8], offset: usize) -> i32 {
    i16::from_le_bytes([block[offset], block[offset + 1]]) as i32
}

/// Decodes one block into per-channel sample sequences. The two header
/// samples are part of the output, oldest first.
fn decode_block(
    block: &[u8],
    channels: usize,
    coefficients: &[CoefficientPair],
    strictness: Strictness,
) -> Result<Vec<Vec<i16>>> {
    let header_size = channels * CHANNEL_HEADER_SIZE;
    if block.len() < header_size {
        // A trailing fragment too short to seed any channel.
        return match strictness {
            Strictness::Lenient => Ok(vec![Vec::new(); channels]),
            Strictness::Strict => Err(WavError::MalformedBlock(format!(
                "{} bytes left over, {} channel headers need {}",
                block.len(),
                channels,
                header_size
            ))),
        };
    }

    let mut states = Vec::with_capacity(channels);
    for c in 0..channels {
        let index = block[c] as usize;
        let index = if index < coefficients.len() {
            index
        } else if strictness == Strictness::Strict {
            return Err(WavError::MalformedBlock(format!(
                "predictor index {} with {} coefficient pairs",
                index,
                coefficients.len()
            )));
        } else {
            coefficients.len() - 1
        };

        let CoefficientPair { coeff1, coeff2 } = coefficients[index];
        states.push(ChannelState {
            coeff1: coeff1 as i32,
            coeff2: coeff2 as i32,
            delta: le_i16_at(block, channels + c * 2),
            sample1: le_i16_at(block, channels * 3 + c * 2),
            sample2: le_i16_at(block, channels * 5 + c * 2),
        });
    }

    let nibbles_per_channel = (block.len() - header_size) * 2 / channels;
    let mut decoded = Vec::with_capacity(channels);
    for state in &states {
        let mut samples = Vec::with_capacity(2 + nibbles_per_channel + 1);
        samples.push(state.sample2 as i16);
        samples.push(state.sample1 as i16);
        decoded.push(samples);
    }

    let mut channel = 0;
    for &byte in &block[header_size..] {
        for nibble in [byte >> 4, byte & 0xf] {
            decoded[channel].push(states[channel].expand_nibble(nibble));
            channel = (channel + 1) % channels;
        }
    }

    Ok(decoded)
}

/// Decodes a compressed payload into one interleaved PCM buffer, walking
/// it in `block_align` windows. A short final block decodes whatever
/// nibbles are present.
pub fn decode_payload(format: &FormatChunk, payload: &[u8], strictness: Strictness) -> Result<DecodedAudio> {
    match format.format {
        WaveFormat::Pcm => decode_pcm(format, payload),
        WaveFormat::MsAdpcm => decode_adpcm(format, payload, strictness),
    }
}

fn decode_adpcm(format: &FormatChunk, payload: &[u8], strictness: Strictness) -> Result<DecodedAudio> {
    let extension = format
        .extension
        .as_ref()
        .ok_or_else(|| WavError::ParseError("format carries no coefficient table".into()))?;

    let channels = format.channels as usize;
    let block_align = format.block_align as usize;
    if channels == 0 || block_align == 0 {
        return Err(WavError::ParseError("format declares zero channels or block alignment".into()));
    }

    let mut samples = Vec::with_capacity(payload.len() * 2);
    for block in payload.chunks(block_align) {
        let decoded = decode_block(block, channels, &extension.coefficients, strictness)?;
        interleave(&mut samples, &decoded);
    }

    Ok(DecodedAudio {
        sample_rate: format.sample_rate,
        channels: format.channels,
        samples,
    })
}

// Pass-through for uncompressed 16-bit containers. Other widths are out of
// scope.
fn decode_pcm(format: &FormatChunk, payload: &[u8]) -> Result<DecodedAudio> {
    if format.bits_per_sample != 16 {
        return Err(WavError::UnsupportedFormat(format.format as u16));
    }

    let samples = payload
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    Ok(DecodedAudio {
        sample_rate: format.sample_rate,
        channels: format.channels,
        samples,
    })
}

fn interleave(out: &mut Vec<i16>, decoded: &[Vec<i16>]) {
    let longest = decoded.iter().map(Vec::len).max().unwrap_or(0);
    for s in 0..longest {
        for channel in decoded {
            if let Some(&sample) = channel.get(s) {
                out.push(sample);
            }
        }
    }
}

use alloc::{format, vec::Vec};

use nom::{
    multi::count,
    number::complete::{le_u16, le_u32},
    sequence::tuple,
};
use nom_derive::{NomLE, Parse};

use crate::{
    constants::{WaveFormat, MAX_COEFFICIENTS},
    structural, Result, WavError,
};

/// One predictor pair from the coefficient table. Each block selects a
/// pair by index to linearly combine its two most recent samples.
#[derive(NomLE, Eq, PartialEq, Copy, Clone, Debug)]
pub struct CoefficientPair {
    pub coeff1: i16,
    pub coeff2: i16,
}

/// Extension appended to the `fmt ` descriptor when the format code is the
/// adaptive-differential encoding.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct AdpcmExtension {
    pub samples_per_block: u16,
    pub coefficients: Vec<CoefficientPair>,
}

/// The `fmt ` chunk: the container's format descriptor.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct FormatChunk {
    pub format: WaveFormat,
    pub channels: u16,
    pub sample_rate: u32, // in hz
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub extension: Option<AdpcmExtension>,
}

impl FormatChunk {
    pub(crate) fn of(body: &[u8]) -> Result<Self> {
        let (remaining, (format_code, channels, sample_rate, byte_rate, block_align, bits_per_sample)) =
            tuple((le_u16, le_u16, le_u32, le_u32, le_u16, le_u16))(body).map_err(structural)?;

        let format = WaveFormat::try_from(format_code)?;
        if channels == 0 {
            return Err(WavError::ParseError("format declares zero channels".into()));
        }
        if block_align == 0 {
            return Err(WavError::ParseError("format declares zero block alignment".into()));
        }

        let extension = match format {
            WaveFormat::Pcm => None,
            WaveFormat::MsAdpcm => Some(AdpcmExtension::of(remaining)?),
        };

        Ok(Self {
            format,
            channels,
            sample_rate,
            byte_rate,
            block_align,
            bits_per_sample,
            extension,
        })
    }
}

impl AdpcmExtension {
    fn of(body: &[u8]) -> Result<Self> {
        // The declared extra size is not cross-checked, same leniency as
        // the riff size.
        let (remaining, (_extra_size, samples_per_block, coefficient_count)) =
            tuple((le_u16, le_u16, le_u16))(body).map_err(structural)?;

        if coefficient_count == 0 || coefficient_count as usize > MAX_COEFFICIENTS {
            return Err(WavError::ParseError(format!(
                "coefficient count {} outside 1..={}",
                coefficient_count, MAX_COEFFICIENTS
            )));
        }

        let (_, coefficients) =
            count(CoefficientPair::parse, coefficient_count as usize)(remaining).map_err(structural)?;

        Ok(Self {
            samples_per_block,
            coefficients,
        })
    }
}

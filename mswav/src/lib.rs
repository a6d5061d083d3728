#![no_std]
extern crate alloc;

mod adpcm;
mod chunks;
mod constants;
mod wav;

use alloc::{format, string::String};
use core::result;

#[derive(Debug, Eq, PartialEq)]
pub enum WavError {
    OversizedInput(usize),
    BadMagic,
    UnsupportedFormat(u16),
    MissingChunk(&'static str),
    MalformedBlock(String),
    ParseError(String),
}

impl From<WavError> for anyhow::Error {
    fn from(e: WavError) -> Self {
        anyhow::anyhow!("{:?}", e)
    }
}

pub type Result<T> = result::Result<T, WavError>;

pub(crate) fn structural(e: nom::Err<nom::error::Error<&[u8]>>) -> WavError {
    WavError::ParseError(format!("{}", e))
}

pub use self::{
    adpcm::{decode_payload, DecodedAudio, Strictness},
    chunks::{AdpcmExtension, CoefficientPair, FormatChunk},
    constants::WaveFormat,
    wav::Wav,
};

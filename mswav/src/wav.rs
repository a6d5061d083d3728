use nom::{
    bytes::complete::take,
    combinator::{complete, flat_map, map},
    multi::many0,
    number::complete::le_u32,
    sequence::tuple,
    IResult,
};

use crate::{
    adpcm::{decode_payload, DecodedAudio, Strictness},
    chunks::FormatChunk,
    constants::MAX_CONTAINER_SIZE,
    structural, Result, WavError,
};

enum RawChunk<'a> {
    Format(&'a [u8]), // "fmt " (trailing space significant)
    Data(&'a [u8]),   // "data"
    Skipped,          // "fact", "cue ", "LIST", ..
}

impl<'a> RawChunk<'a> {
    fn parse(data: &'a [u8]) -> IResult<&'a [u8], Self> {
        map(tuple((take(4usize), flat_map(le_u32, take))), |(tag, body): (&[u8], &[u8])| match tag {
            b"fmt " => Self::Format(body),
            b"data" => Self::Data(body),
            _ => Self::Skipped,
        })(data)
    }
}

/// A parsed RIFF/WAVE container. The compressed payload is borrowed from
/// the input buffer.
#[derive(Debug)]
pub struct Wav<'a> {
    /// Declared riff size. Carried through but never checked against the
    /// real buffer length; files in the wild routinely get it wrong.
    pub riff_size: u32,
    pub format: FormatChunk,
    pub payload: &'a [u8],
}

impl<'a> Wav<'a> {
    const RIFF_MAGIC: [u8; 4] = *b"RIFF";
    const WAVE_MAGIC: [u8; 4] = *b"WAVE";

    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() > MAX_CONTAINER_SIZE {
            return Err(WavError::OversizedInput(data.len()));
        }
        if data.len() < 12 || data[0..4] != Self::RIFF_MAGIC || data[8..12] != Self::WAVE_MAGIC {
            return Err(WavError::BadMagic);
        }
        let riff_size = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);

        // Bytes after the last complete chunk are ignored.
        let (_, chunks) = many0(complete(RawChunk::parse))(&data[12..]).map_err(structural)?;

        let mut format = None;
        let mut payload = None;
        for chunk in chunks {
            match chunk {
                RawChunk::Format(body) => format = Some(FormatChunk::of(body)?),
                RawChunk::Data(body) => payload = Some(body),
                RawChunk::Skipped => {}
            }
        }

        let format = format.ok_or(WavError::MissingChunk("fmt "))?;
        let payload = payload.ok_or(WavError::MissingChunk("data"))?;

        Ok(Self {
            riff_size,
            format,
            payload,
        })
    }

    pub fn decode(&self) -> Result<DecodedAudio> {
        self.decode_with(Strictness::default())
    }

    pub fn decode_with(&self, strictness: Strictness) -> Result<DecodedAudio> {
        decode_payload(&self.format, self.payload, strictness)
    }
}

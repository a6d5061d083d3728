use crate::WavError;

/// Hard cap on an input container. Voice-line clips run a few seconds;
/// anything larger is rejected before a single header byte is read.
pub const MAX_CONTAINER_SIZE: usize = 16 * 1024 * 1024;

/// Most coefficient pairs a `fmt ` extension may declare.
pub const MAX_COEFFICIENTS: usize = 7;

/// Scale factors driving the per-sample delta adaptation, indexed by the
/// raw (not sign-extended) nibble value.
pub const ADAPTATION_TABLE: [i16; 16] = [
    230, 230, 230, 230, 307, 409, 512, 614, 768, 614, 512, 409, 307, 230, 230, 230,
];

pub const DELTA_MIN: i32 = 16;
pub const DELTA_MAX: i32 = 32767;

#[repr(u16)]
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum WaveFormat {
    Pcm = 1,
    MsAdpcm = 2,
}

impl TryFrom<u16> for WaveFormat {
    type Error = WavError;

    fn try_from(value: u16) -> crate::Result<Self> {
        match value {
            1 => Ok(Self::Pcm),
            2 => Ok(Self::MsAdpcm),
            other => Err(WavError::UnsupportedFormat(other)),
        }
    }
}

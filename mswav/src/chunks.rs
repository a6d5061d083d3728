mod format;

pub use self::format::{AdpcmExtension, CoefficientPair, FormatChunk};

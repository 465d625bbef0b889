use std::{error::Error, fmt};

/// Failures of a mosaic build. Any of these aborts the whole build; there is no
/// partial output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MosaicError {
    /// A tile had to be selected but the bank holds no tiles.
    EmptyBank,
    /// A tile or cell dimension is zero.
    InvalidDimension {
        parameter: &'static str,
    },
    /// The mosaic would not fit in a `u32` by `u32` bitmap.
    OutputTooLarge {
        width: u64,
        height: u64,
    },
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBank => f.write_str("tile bank is empty; no source images could be loaded"),
            Self::InvalidDimension { parameter } => {
                write!(f, "`{parameter}` must be greater than zero")
            }
            Self::OutputTooLarge { width, height } => {
                write!(f, "mosaic of {width}x{height} pixels is too large")
            }
        }
    }
}

impl Error for MosaicError {}

//! the error type shared by every part of the simulator
//!
//! all errors are about configuration, data boundaries or the run budget, the datapath
//! itself never fails.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AccelError>;

#[derive(Debug, Error)]
pub enum AccelError {
    /// a width, row count, column count or derived dimension is not usable
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// a vector or element list crossing a pack/unpack boundary has the wrong size
    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    /// an element handed to `pack` does not fit in the declared width
    #[error("element {index} has value {value}, which does not fit in {width} bits")]
    ElementOutOfRange { index: usize, value: i64, width: u32 },

    /// `System::run` used up `max_cycles` with passes still pending
    #[error("max_cycles {max_cycles} reached with {finished_passes} of {passes} passes finished")]
    CycleBudgetExceeded {
        max_cycles: u64,
        finished_passes: usize,
        passes: usize,
    },

    #[error("parse error: {reason}")]
    Parse { reason: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("config error: {source}")]
    Config {
        #[from]
        source: config::ConfigError,
    },
}

impl AccelError {
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }
}

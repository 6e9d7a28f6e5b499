//! Error type for everything around the tree.
//!
//! The tree itself never fails: a missing key on removal is a no-op and
//! running out of memory aborts the process. What can fail is the benchmark
//! harness, which reads text files, writes reports and reads its
//! configuration from the environment.

use crate::wordtree::config::ConfigError;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum WordTreeError {
    /// Reading the input text or writing a report failed.
    Io(io::Error),

    /// The environment holds an unusable setting.
    Config(ConfigError),

    /// A sample could not be encoded as MessagePack.
    Encode(rmp_serde::encode::Error),
}

pub type Result<T> = std::result::Result<T, WordTreeError>;

impl fmt::Display for WordTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Encode(e) => write!(f, "encoding error: {e}"),
        }
    }
}

impl std::error::Error for WordTreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Encode(e) => Some(e),
        }
    }
}

impl From<io::Error> for WordTreeError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ConfigError> for WordTreeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<rmp_serde::encode::Error> for WordTreeError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        Self::Encode(e)
    }
}

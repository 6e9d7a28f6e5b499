//! Benchmark configuration, read from environment variables.
//!
//! # Environment Variables
//!
//! - `WORDTREE_INPUT`: text file to tokenize (default: `blivre.txt`)
//! - `WORDTREE_INSERT_LOG`: where insert samples go (default: `insert_times.csv`)
//! - `WORDTREE_DELETE_LOG`: where delete samples go (default: `delete_times.csv`)
//! - `WORDTREE_REPORT_FORMAT`: `csv` or `msgpack` (default: `csv`)
//! - `WORDTREE_SEED`: seed for the deletion shuffle (default: drawn from entropy)

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Csv,
    MsgPack,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "msgpack" | "messagepack" => Ok(Self::MsgPack),
            other => Err(format!("'{other}' is not a report format (expected csv or msgpack)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub input: PathBuf,
    pub insert_log: PathBuf,
    pub delete_log: PathBuf,
    pub format: ReportFormat,
    /// `None` means a fresh seed is drawn for every run.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { name: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(Self::DEFAULT_INPUT),
            insert_log: PathBuf::from(Self::DEFAULT_INSERT_LOG),
            delete_log: PathBuf::from(Self::DEFAULT_DELETE_LOG),
            format: ReportFormat::default(),
            seed: None,
        }
    }
}

impl BenchConfig {
    pub const DEFAULT_INPUT: &'static str = "blivre.txt";
    pub const DEFAULT_INSERT_LOG: &'static str = "insert_times.csv";
    pub const DEFAULT_DELETE_LOG: &'static str = "delete_times.csv";

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable lookup, falling back to the
    /// defaults for unset names.
    ///
    /// # Errors
    ///
    /// Returns an error if `WORDTREE_REPORT_FORMAT` or `WORDTREE_SEED` is set
    /// to something unparsable.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let path = |name: &str, default: PathBuf| lookup(name).map(PathBuf::from).unwrap_or(default);

        let format = match lookup("WORDTREE_REPORT_FORMAT") {
            Some(value) => value.parse().map_err(|message| ConfigError::InvalidValue {
                name: "WORDTREE_REPORT_FORMAT".to_string(),
                message,
            })?,
            None => defaults.format,
        };

        let seed = match lookup("WORDTREE_SEED") {
            Some(value) => Some(value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: "WORDTREE_SEED".to_string(),
                message: format!("'{value}' is not a u64"),
            })?),
            None => None,
        };

        Ok(Self {
            input: path("WORDTREE_INPUT", defaults.input),
            insert_log: path("WORDTREE_INSERT_LOG", defaults.insert_log),
            delete_log: path("WORDTREE_DELETE_LOG", defaults.delete_log),
            format,
            seed,
        })
    }
}

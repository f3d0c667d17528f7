//! Error types for kox-lister.
//!
//! Uses `thiserror` for structured error definitions that provide
//! clear context about what went wrong.

use thiserror::Error;

/// Main error type for extraction operations.
#[derive(Error, Debug)]
pub enum ListerError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// A field the landing page must carry is absent
    #[error("Required field missing: {0}")]
    RequiredFieldMissing(String),

    /// The landing page has no `<script language="javascript">` block
    #[error("No javascript script block found")]
    NoScriptFound,

    /// The data feed path could not be found in the script text
    #[error("Pattern not matched: {0}")]
    PatternNotMatched(String),

    /// A volinfo line has too few quote or comma delimited segments
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// An integer or float field did not parse
    #[error("Invalid numeric value for '{field}': {value}")]
    NumericParseFailure { field: &'static str, value: String },

    /// Unrecognized volume type label
    #[error("Unknown volume type: {0}")]
    InvalidEnumValue(String),
}

/// Error type for configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse config file
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Invalid configuration value
    #[error("Invalid config value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Config directory not found
    #[error("Could not determine config directory")]
    NoConfigDir,
}

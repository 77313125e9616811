//! # Error Handling
//!
//! Centralized error handling for `verstamp`, built on `thiserror`.
//!
//! The error taxonomy mirrors the tool's propagation policy:
//!
//! - **Argument errors** (`Arguments`) and **format errors**
//!   (`VersionFormat`) abort the whole run before any file is touched.
//! - **Per-file errors** (`Xml`, `Io`, and friends) are contained at the
//!   adapter boundary: a failing file is logged and excluded from the
//!   successfully-processed set, never propagated as a crash.
//!
//! The `Result<T>` alias is used throughout the library crate; the binary
//! translates outcomes into process exit codes.

use thiserror::Error;

/// Main error type for verstamp operations
#[derive(Error, Debug)]
pub enum Error {
    /// No usable version token was found among the command-line arguments.
    #[error("Argument error: {message}")]
    Arguments { message: String },

    /// The version string does not match the `MAJOR.MINOR.BUILD[.REVISION][-SUFFIX]` grammar.
    #[error("Version string does not match the required grammar: {input}")]
    VersionFormat { input: String },

    /// An error occurred while loading, mutating, or serializing an XML document.
    #[error("XML document error: {message}")]
    Xml { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

impl Error {
    /// Wrap an XML library failure with a uniform message.
    pub fn xml(err: impl std::fmt::Display) -> Self {
        Error::Xml {
            message: err.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

//! Fatal errors.
//!
//! Anything in here aborts the whole run with no partial output. Recoverable
//! documentation inconsistencies are reported as [`crate::dts::Diagnostic`]s
//! instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort declaration generation.
#[derive(Debug, Error)]
pub enum Error {
    /// The documentation directory could not be listed.
    #[error("failed to read documentation directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record file is not valid JSON for the documentation schema.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A top-level record is not a class; the export format is not the one we understand.
    #[error("unknown top level tagname '{tagname}' in {}", path.display())]
    UnknownTagname { path: PathBuf, tagname: String },

    /// The build configuration file could not be read or parsed.
    #[error("invalid configuration {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    /// The generated declarations could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The post-generation type check failed or could not run.
    #[error("type check of {} failed: {reason}", path.display())]
    Check { path: PathBuf, reason: String },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

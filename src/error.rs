//! Error types shared by every public operation.

use std::path::PathBuf;

/// Errors produced while normalising options, reading input, or diffing.
///
/// Internal invariant violations (a candidate pointing outside the valid
/// left-side range) are not represented here: they indicate a broken
/// candidate graph and abort the invocation via `panic!` instead, matching
/// the original engine's unconditional `Tcl_Panic`.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("bad argument: {message}")]
    BadArgument { message: String },

    #[error("bad file {path}")]
    BadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file {path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, DiffError>;

//! Hunt-McIlroy longest-common-subsequence diffing core, extended with
//! candidate scoring, equivalence-class forbidding, range/alignment
//! constraints, and a forbidden-match post-pass.
//!
//! The crate exposes five operations: [`files_equal`] (fast byte/character
//! identity check), [`diff_files`], [`diff_lists`], [`diff_strings`], and
//! [`diff_strings_chunks`]. All of them share the same three-stage engine
//! (hash -> vectors/LCS -> assemble); see the module docs of [`hash`],
//! [`vectors`], [`lcs`], and [`assemble`] for the pipeline internals.

pub mod align;
pub mod assemble;
pub mod candidate;
pub mod engine;
pub mod error;
pub mod hash;
pub mod lcs;
pub mod ops;
pub mod options;
pub mod vectors;

pub use assemble::{Chunk, DiffResult};
pub use error::{DiffError, Result};
pub use ops::files::{files_equal, FileEqualOptions};
pub use ops::files::diff_files;
pub use ops::lists::diff_lists;
pub use ops::strings::{diff_strings, diff_strings_chunks, StringChunk};
pub use options::{AlignPin, Ignore, Options, Range, Regsub, ResultStyle};

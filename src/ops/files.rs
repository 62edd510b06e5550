//! `files_equal`/`diff_files`: line-granularity diffing straight off disk.
//!
//! Grounded in `difffiles.c`'s `ReadAndHashFiles`/`CompareFiles` for
//! `diff_files` (range-slice on ingest, then hash/V/E/P/LCS/verify/assemble)
//! and `comparefiles.c`'s `CompareFilesObjCmd` for `files_equal` (metadata
//! short-circuit, then a byte- or character-chunked compare). The reader
//! itself keeps the teacher's `fill_buf`/`consume` shape (`reader.rs`)
//! rather than `std::io::Lines`, just propagating `io::Error` instead of
//! `expect`-ing it away.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::assemble::{self, DiffResult};
use crate::engine;
use crate::error::{DiffError, Result};
use crate::hash;
use crate::options::Options;

const READ_BUF_SIZE: usize = 64 * 1024;

/// Reads `path` as UTF-8 text and splits it into lines, dropping exactly
/// one trailing `\n` (and any `\r` before it) so a file ending in a newline
/// does not produce a spurious empty final line.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = read_all(path)?;
    let text = String::from_utf8(bytes).map_err(|_| DiffError::NotUtf8 { path: path.to_path_buf() })?;
    let mut lines: Vec<String> = text.split('\n').map(|s| s.strip_suffix('\r').unwrap_or(s).to_string()).collect();
    if text.ends_with('\n') {
        lines.pop();
    }
    Ok(lines)
}

fn read_all(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| DiffError::BadInput { path: path.to_path_buf(), source: e })?;
    let mut reader = BufReader::with_capacity(READ_BUF_SIZE, file);
    let mut data = Vec::new();
    loop {
        let buf = reader.fill_buf().map_err(|e| DiffError::BadInput { path: path.to_path_buf(), source: e })?;
        if buf.is_empty() {
            break;
        }
        data.extend_from_slice(buf);
        let len = buf.len();
        reader.consume(len);
    }
    Ok(data)
}

/// Line-granularity diff between two files, honouring `opts.range1`/`range2`
/// (lines outside the range are skipped on ingest, and the output's
/// coordinates are shifted back to the original file's numbering).
pub fn diff_files(path1: &Path, path2: &Path, opts: &Options) -> Result<DiffResult> {
    let mut opts = opts.clone();
    opts.normalise()?;

    let lines1 = read_lines(path1)?;
    let lines2 = read_lines(path2)?;
    let slice1 = opts.range1.slice(&lines1);
    let slice2 = opts.range2.slice(&lines2);

    let left: Vec<(u64, u64)> = slice1.iter().map(|l| hash::hash_element(l, &opts.regsub_left, opts.ignore)).collect();
    let right: Vec<(u64, u64)> = slice2.iter().map(|l| hash::hash_element(l, &opts.regsub_right, opts.ignore)).collect();

    let mut j = engine::run_lcs(&left, &right, &opts);
    assemble::verify_matches(slice1.len(), slice2.len(), &mut j, |i, jx| {
        hash::compare_elements(&slice1[i - 1], &slice2[jx - 1], &opts)
    });

    let base1 = opts.range1.effective_from() as i64 - 1;
    let base2 = opts.range2.effective_from() as i64 - 1;
    Ok(assemble::build_result(slice1.len(), slice2.len(), &j, &opts, base1, base2))
}

/// Options for [`files_equal`]: a byte/character-identity check, not a diff.
#[derive(Debug, Clone, Default)]
pub struct FileEqualOptions {
    /// Compare raw bytes rather than decoded text (skips the UTF-8 check
    /// and the case fold).
    pub binary: bool,
    pub no_case: bool,
    /// Treat `$Keyword$`/`$Keyword:...$` runs (RCS/CVS/SVN-style keyword
    /// expansion markers) as equal regardless of their expanded body.
    pub ignore_key: bool,
}

/// Whole-file identity check: directories never compare equal; a size
/// mismatch short-circuits unless `ignore_key` is set (a keyword expansion
/// can change a file's length); otherwise the content is compared in
/// fixed-size chunks.
pub fn files_equal(path1: &Path, path2: &Path, opts: &FileEqualOptions) -> Result<bool> {
    let meta1 = std::fs::metadata(path1).map_err(|e| DiffError::BadInput { path: path1.to_path_buf(), source: e })?;
    let meta2 = std::fs::metadata(path2).map_err(|e| DiffError::BadInput { path: path2.to_path_buf(), source: e })?;

    if meta1.is_dir() || meta2.is_dir() {
        return Ok(false);
    }
    if !opts.ignore_key && meta1.len() != meta2.len() {
        return Ok(false);
    }

    let data1 = read_all(path1)?;
    let data2 = read_all(path2)?;

    if opts.binary {
        return Ok(!opts.ignore_key && compare_bytes_chunked(&data1, &data2));
    }

    let text1 = String::from_utf8(data1).map_err(|_| DiffError::NotUtf8 { path: path1.to_path_buf() })?;
    let text2 = String::from_utf8(data2).map_err(|_| DiffError::NotUtf8 { path: path2.to_path_buf() })?;

    if opts.ignore_key {
        return Ok(compare_ignoring_keywords(&text1, &text2, opts.no_case));
    }
    Ok(compare_text_chunked(&text1, &text2, opts.no_case))
}

const CHUNK_SIZE: usize = 64 * 1024;

fn compare_bytes_chunked(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.chunks(CHUNK_SIZE).zip(b.chunks(CHUNK_SIZE)).all(|(x, y)| x == y)
}

fn compare_text_chunked(a: &str, b: &str, no_case: bool) -> bool {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len() != b.len() {
        return false;
    }
    a.chunks(CHUNK_SIZE).zip(b.chunks(CHUNK_SIZE)).all(|(x, y)| {
        if no_case {
            x.iter().zip(y.iter()).all(|(p, q)| p.to_lowercase().eq(q.to_lowercase()))
        } else {
            x == y
        }
    })
}

/// Scans both strings in lockstep, treating `$Word$`/`$Word:...$` runs as
/// equal regardless of their body. A narrow hand-rolled scanner rather than
/// a port: the one retrieved snapshot of the original's `ignoreKey` branch
/// was an empty stub, so this follows the design's spec-prose description
/// instead.
fn compare_ignoring_keywords(a: &str, b: &str, no_case: bool) -> bool {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut i = 0usize;
    let mut j = 0usize;
    loop {
        if i >= a.len() && j >= b.len() {
            return true;
        }
        if i >= a.len() || j >= b.len() {
            return false;
        }
        let (ca, cb) = (a[i], b[j]);
        let same = if no_case { ca.to_lowercase().eq(cb.to_lowercase()) } else { ca == cb };
        if same {
            i += 1;
            j += 1;
            continue;
        }
        if ca == '$' && cb == '$' {
            if let (Some(end_a), Some(end_b)) = (find_keyword_end(&a, i), find_keyword_end(&b, j)) {
                i = end_a + 1;
                j = end_b + 1;
                continue;
            }
        }
        return false;
    }
}

/// Given a `$` at `start`, returns the matching closing `$` if the run
/// looks like a version-control keyword marker (`$Word$` or `$Word:...$`),
/// never scanning past a newline.
fn find_keyword_end(chars: &[char], start: usize) -> Option<usize> {
    let mut k = start + 1;
    let mut saw_word = false;
    while k < chars.len() {
        match chars[k] {
            '$' if saw_word => return Some(k),
            '\n' => return None,
            ':' => {
                saw_word = true;
                k += 1;
                while k < chars.len() && chars[k] != '$' && chars[k] != '\n' {
                    k += 1;
                }
            }
            c if c.is_alphanumeric() || c == '_' => {
                saw_word = true;
                k += 1;
            }
            _ => return None,
        }
    }
    None
}

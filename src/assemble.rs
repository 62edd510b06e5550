//! Turns a `J` vector into the result shapes callers see: `Chunk`s (the
//! diff-style change blocks) or parallel matched-position lists.
//!
//! Grounded in the original's `NewChunk`/`AppendChunk` (align-pin splitting)
//! and `BuildResultFromJDiffStyle`/`BuildResultFromJMatchStyle`. Those
//! functions only ever read an already-verified `J`; the exact-match
//! verification pass (re-running `CompareElements` on every candidate match
//! and clearing the ones that only agreed by hash) lives in `verify_matches`
//! below and is run by the `ops` adapters before assembly, mirroring how the
//! original's `CompareFiles`/`CompareLists` do that scan themselves rather
//! than folding it into the assembler.

use crate::options::{AlignPin, Options, ResultStyle};

/// One change block: `n1` left-side lines starting at `start1` differ from
/// `n2` right-side lines starting at `start2`. Either `n1` or `n2` (never
/// both) may be 0, for a pure insertion or deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub start1: usize,
    pub n1: usize,
    pub start2: usize,
    pub n2: usize,
}

/// The result of a diff invocation: either change-block chunks or a pair of
/// parallel matched-position lists, per `Options::result_style`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffResult {
    Chunks(Vec<Chunk>),
    Matches { left: Vec<usize>, right: Vec<usize> },
}

/// Re-checks every candidate match in `J` with `compare`, clearing any pair
/// that agreed only by (possibly ignore-filtered) hash but not by the exact
/// comparison the caller supplies. Mirrors the original's re-read-and-verify
/// scan that runs just before result assembly.
pub fn verify_matches<F: FnMut(usize, usize) -> bool>(m: usize, n: usize, j: &mut [usize], mut compare: F) {
    let mut current1 = 0usize;
    let mut current2 = 0usize;
    while current1 < m || current2 < n {
        while current1 < m {
            current1 += 1;
            if j[current1] != 0 {
                break;
            }
        }
        while current2 < n {
            current2 += 1;
            if j[current1] == current2 {
                break;
            }
        }
        if j[current1] != current2 {
            continue;
        }
        if !compare(current1, current2) {
            j[current1] = 0;
        }
    }
}

/// Splits a chunk at any alignment pin it straddles, so a pin's own line
/// pair is always reported as its own one-line chunk rather than absorbed
/// into a larger change block.
fn append_chunk(chunks: &mut Vec<Chunk>, align: &[AlignPin], base1: i64, base2: i64, mut start1: usize, mut n1: usize, mut start2: usize, mut n2: usize) {
    for pin in align {
        let left_inside = start1 <= pin.i && pin.i < start1 + n1;
        let right_inside = start2 <= pin.j && pin.j < start2 + n2;
        if left_inside && right_inside {
            let pre_n1 = pin.i - start1;
            let pre_n2 = pin.j - start2;
            if pre_n1 > 0 || pre_n2 > 0 {
                chunks.push(new_chunk(base1, base2, start1, pre_n1, start2, pre_n2));
            }
            chunks.push(new_chunk(base1, base2, pin.i, 1, pin.j, 1));
            start1 = pin.i + 1;
            start2 = pin.j + 1;
            n1 -= pre_n1 + 1;
            n2 -= pre_n2 + 1;
        }
    }
    if n1 > 0 || n2 > 0 {
        chunks.push(new_chunk(base1, base2, start1, n1, start2, n2));
    }
}

/// Shifts a chunk's 1-based positions by the caller's coordinate base
/// (`rFrom - 1` in the original: 0 for an unranged side, `from - 1` for a
/// ranged file side, or -1 for `diff_lists`'s 0-based output).
fn new_chunk(base1: i64, base2: i64, start1: usize, n1: usize, start2: usize, n2: usize) -> Chunk {
    Chunk {
        start1: (start1 as i64 + base1) as usize,
        n1,
        start2: (start2 as i64 + base2) as usize,
        n2,
    }
}

/// Builds the diff-style chunk list from a verified `J`.
pub fn build_chunks(m: usize, n: usize, j: &[usize], align: &[AlignPin], base1: i64, base2: i64) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut start_block1 = 1usize;
    let mut start_block2 = 1usize;

    if m > 0 && n > 0 {
        let mut current1 = 0usize;
        let mut current2 = 0usize;
        while current1 < m || current2 < n {
            while current1 < m {
                current1 += 1;
                if j[current1] != 0 {
                    break;
                }
            }
            while current2 < n {
                current2 += 1;
                if j[current1] == current2 {
                    break;
                }
            }
            if j[current1] != current2 {
                continue;
            }
            let n1 = current1 - start_block1;
            let n2 = current2 - start_block2;
            if n1 > 0 || n2 > 0 {
                append_chunk(&mut chunks, align, base1, base2, start_block1, n1, start_block2, n2);
            }
            start_block1 = current1 + 1;
            start_block2 = current2 + 1;
        }
    }

    let n1 = (m + 1).saturating_sub(start_block1);
    let n2 = (n + 1).saturating_sub(start_block2);
    if n1 > 0 || n2 > 0 {
        append_chunk(&mut chunks, align, base1, base2, start_block1, n1, start_block2, n2);
    }
    chunks
}

/// Builds the match-style parallel position lists from a verified `J`.
pub fn build_matches(m: usize, n: usize, j: &[usize], base1: i64, base2: i64) -> (Vec<usize>, Vec<usize>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut current1 = 0usize;
    let mut current2 = 0usize;
    while current1 < m && current2 < n {
        while current1 < m {
            current1 += 1;
            if j[current1] != 0 {
                break;
            }
        }
        while current2 < n {
            current2 += 1;
            if j[current1] == current2 {
                break;
            }
        }
        if j[current1] != current2 {
            continue;
        }
        left.push((current1 as i64 + base1) as usize);
        right.push((current2 as i64 + base2) as usize);
    }
    (left, right)
}

/// Top-level assembler: dispatches on `opts.result_style`.
pub fn build_result(m: usize, n: usize, j: &[usize], opts: &Options, base1: i64, base2: i64) -> DiffResult {
    match opts.result_style {
        ResultStyle::Diff => DiffResult::Chunks(build_chunks(m, n, j, &opts.align, base1, base2)),
        ResultStyle::Match => {
            let (left, right) = build_matches(m, n, j, base1, base2);
            DiffResult::Matches { left, right }
        }
    }
}

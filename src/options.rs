//! Diff options: ignore flags, range, alignment pins, regex pre-substitution,
//! pivot, and result style.
//!
//! Mirrors the original `DiffOptions_T` / `InitDiffOptions_T` shape, but is
//! built declaratively (`Options::default()` plus setters) rather than
//! through one wide constructor, since most fields are independently
//! optional.

use crate::error::{DiffError, Result};

/// Bits controlling which differences `Hash`/`CompareElements` ignore.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ignore(u8);

impl Ignore {
    pub const NONE: Ignore = Ignore(0);
    pub const ALL_SPACE: Ignore = Ignore(1);
    pub const SPACE_CHANGE: Ignore = Ignore(2);
    pub const CASE: Ignore = Ignore(4);
    pub const NUMBERS: Ignore = Ignore(8);

    pub fn contains(self, flag: Ignore) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Ignore {
    type Output = Ignore;
    fn bitor(self, rhs: Ignore) -> Ignore {
        Ignore(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Ignore {
    fn bitor_assign(&mut self, rhs: Ignore) {
        self.0 |= rhs.0;
    }
}

/// Whether a diff invocation returns change-block chunks or a matched-pair
/// list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultStyle {
    #[default]
    Diff,
    Match,
}

/// A (pattern, replacement) pair applied before hashing, with Tcl-style
/// `&`/`\0`-`\9` backreferences in `replacement`.
#[derive(Debug, Clone)]
pub struct Regsub {
    pub pattern: String,
    pub replacement: String,
}

/// A user-supplied alignment pin: `L[i]` must align with `R[j]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignPin {
    pub i: usize,
    pub j: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    pub ignore: Ignore,
    pub noempty: bool,
    pub pivot: usize,
    pub range1: Range,
    pub range2: Range,
    pub align: Vec<AlignPin>,
    pub regsub_left: Vec<Regsub>,
    pub regsub_right: Vec<Regsub>,
    pub wordparse: bool,
    pub result_style: ResultStyle,
}

/// A 1-based, inclusive range; `to == 0` means "to end".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    pub from: usize,
    pub to: usize,
}

impl Range {
    pub const ALL: Range = Range { from: 0, to: 0 };

    /// Whether 1-based position `pos` lies in this range, given the side's
    /// total length `len` (needed to resolve `to == 0`).
    pub fn contains(self, pos: usize, len: usize) -> bool {
        let from = if self.from == 0 { 1 } else { self.from };
        let to = if self.to == 0 { len } else { self.to };
        pos >= from && pos <= to
    }

    pub fn effective_from(self) -> usize {
        if self.from == 0 {
            1
        } else {
            self.from
        }
    }

    /// Slices `items` (1-based `[from, to]`, `to == 0` meaning "to end") the
    /// same way the original skips lines outside `[rFrom, rTo]` on ingest:
    /// the filtered slice starts fresh at position 1, and callers recover
    /// original numbering by adding `effective_from() - 1` back at assembly
    /// time. An out-of-bounds or inverted range yields an empty slice.
    pub fn slice<T>(self, items: &[T]) -> &[T] {
        let len = items.len();
        let from = self.effective_from();
        let to = if self.to == 0 { len } else { self.to.min(len) };
        if from > len || from > to {
            return &items[0..0];
        }
        &items[(from - 1)..to]
    }
}

impl Options {
    pub fn new() -> Options {
        Options {
            pivot: 100,
            ..Default::default()
        }
    }

    pub fn with_ignore(mut self, ignore: Ignore) -> Self {
        self.ignore |= ignore;
        self
    }

    pub fn with_noempty(mut self, noempty: bool) -> Self {
        self.noempty = noempty;
        self
    }

    pub fn with_pivot(mut self, pivot: usize) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_range1(mut self, range: Range) -> Self {
        self.range1 = range;
        self
    }

    pub fn with_range2(mut self, range: Range) -> Self {
        self.range2 = range;
        self
    }

    pub fn with_align(mut self, align: Vec<AlignPin>) -> Self {
        self.align = align;
        self
    }

    pub fn with_result_style(mut self, style: ResultStyle) -> Self {
        self.result_style = style;
        self
    }

    pub fn with_regsub_left(mut self, regsub: Vec<Regsub>) -> Self {
        self.regsub_left = regsub;
        self
    }

    pub fn with_regsub_right(mut self, regsub: Vec<Regsub>) -> Self {
        self.regsub_right = regsub;
        self
    }

    pub fn with_wordparse(mut self, wordparse: bool) -> Self {
        self.wordparse = wordparse;
        self
    }

    /// Validates and normalises the options in place: sorts+dedupes align
    /// pins, shifts them by the range start, drops non-monotonic pins, and
    /// rejects a sub-1 pivot.
    pub fn normalise(&mut self) -> Result<()> {
        if self.pivot == 0 {
            return Err(DiffError::BadArgument {
                message: "pivot must be at least 1".to_string(),
            });
        }
        normalise_align(&mut self.align, self.range1, self.range2);
        Ok(())
    }
}

/// Sorts align pins by (i, j), shifts them into range-local coordinates, and
/// replaces any pin that is not strictly greater than its predecessor on
/// both axes with a duplicate of that predecessor — matching the original's
/// `NormaliseOpts` two-pass behaviour.
fn normalise_align(align: &mut Vec<AlignPin>, range1: Range, range2: Range) {
    align.sort_by_key(|p| (p.i, p.j));

    let from1 = range1.effective_from();
    let from2 = range2.effective_from();
    for pin in align.iter_mut() {
        pin.i = pin.i.saturating_sub(from1 - 1);
        pin.j = pin.j.saturating_sub(from2 - 1);
    }
    align.retain(|p| p.i > 0 && p.j > 0);
    align.sort_by_key(|p| (p.i, p.j));

    for idx in 1..align.len() {
        let prev = align[idx - 1];
        if align[idx].i <= prev.i || align[idx].j <= prev.j {
            align[idx] = prev;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pivot_zero_is_rejected() {
        let mut opts = Options::new().with_pivot(0);
        assert!(opts.normalise().is_err());
    }

    #[test]
    fn align_is_sorted_and_deduped_monotonically() {
        let mut opts = Options::new().with_align(vec![
            AlignPin { i: 5, j: 5 },
            AlignPin { i: 2, j: 2 },
            AlignPin { i: 3, j: 1 }, // non-monotonic on j: collapses to predecessor
        ]);
        opts.normalise().unwrap();
        assert_eq!(
            opts.align,
            vec![
                AlignPin { i: 2, j: 2 },
                AlignPin { i: 2, j: 2 },
                AlignPin { i: 5, j: 5 },
            ]
        );
    }

    #[test]
    fn align_shifts_by_range_start() {
        let mut opts = Options::new()
            .with_range1(Range { from: 3, to: 0 })
            .with_range2(Range { from: 2, to: 0 })
            .with_align(vec![AlignPin { i: 4, j: 5 }]);
        opts.normalise().unwrap();
        assert_eq!(opts.align, vec![AlignPin { i: 2, j: 4 }]);
    }

    #[test]
    fn range_slice_is_1_based_inclusive() {
        let items = vec!["a", "b", "c", "d", "e"];
        let r = Range { from: 2, to: 4 };
        assert_eq!(r.slice(&items), &["b", "c", "d"]);
    }

    #[test]
    fn range_slice_to_zero_means_to_end() {
        let items = vec!["a", "b", "c"];
        let r = Range { from: 2, to: 0 };
        assert_eq!(r.slice(&items), &["b", "c"]);
    }

    #[test]
    fn range_slice_out_of_bounds_is_empty() {
        let items = vec!["a", "b"];
        let r = Range { from: 5, to: 0 };
        assert_eq!(r.slice(&items), &[] as &[&str]);
    }

    #[test]
    fn range_contains_resolves_zero_to_end() {
        let r = Range { from: 0, to: 0 };
        assert!(r.contains(1, 10));
        assert!(r.contains(10, 10));
        let r2 = Range { from: 3, to: 5 };
        assert!(!r2.contains(2, 10));
        assert!(r2.contains(3, 10));
        assert!(!r2.contains(6, 10));
    }
}

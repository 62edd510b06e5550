//! Concrete diff scenarios (S1-S6) from the core's documented testable
//! properties: identical input, pure insertion, a single changed line, the
//! `IGNORE_CASE` flag, an alignment pin forcing a chunk split, and the
//! `noempty` forbidden-match post-pass. All scenarios go through
//! [`difflcs::diff_lists`], whose output coordinates are 0-based.

use pretty_assertions::assert_eq;

use difflcs::{AlignPin, Chunk, DiffResult, Ignore, Options};

fn strs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn chunks(a: &[&str], b: &[&str], opts: &Options) -> Vec<Chunk> {
    match difflcs::diff_lists(&strs(a), &strs(b), opts).unwrap() {
        DiffResult::Chunks(c) => c,
        DiffResult::Matches { .. } => panic!("expected chunk-style result"),
    }
}

#[test]
fn s1_identical_inputs_produce_no_chunks() {
    assert_eq!(chunks(&["a", "b", "c"], &["a", "b", "c"], &Options::new()), vec![]);
}

#[test]
fn s2_pure_insertion() {
    let got = chunks(&["a", "c"], &["a", "b", "c"], &Options::new());
    assert_eq!(got, vec![Chunk { start1: 1, n1: 0, start2: 1, n2: 1 }]);
}

#[test]
fn s3_single_changed_line() {
    let got = chunks(&["a", "X", "c"], &["a", "Y", "c"], &Options::new());
    assert_eq!(got, vec![Chunk { start1: 1, n1: 1, start2: 1, n2: 1 }]);
}

#[test]
fn s4_ignore_case_makes_inputs_equal() {
    let opts = Options::new().with_ignore(Ignore::CASE);
    assert_eq!(chunks(&["Hello"], &["hello"], &opts), vec![]);
}

#[test]
fn s5_align_pin_is_reported_as_its_own_one_row_chunk() {
    // No direct match exists between "c" and "y"; the align pin (3, 3)
    // still forces that pair to surface as its own isolated chunk, carved
    // out of what would otherwise be one contiguous change block.
    let opts = Options::new().with_align(vec![AlignPin { i: 3, j: 3 }]);
    let got = chunks(&["a", "b", "c", "d"], &["x", "b", "y", "d"], &opts);
    assert!(
        got.iter().any(|c| c.start1 == 2 && c.n1 == 1 && c.start2 == 2 && c.n2 == 1),
        "pin (3,3) (0-based: start1=2, start2=2) missing from {got:?}"
    );
}

#[test]
fn s6_noempty_forbidden_post_pass_recovers_the_shared_lines() {
    // With `noempty`, the initial pass forbids empty-line matches; the
    // forbidden post-pass then recovers the unambiguous one (L2's "" with
    // R3's ""), leaving only R1's leading blank line as a genuine
    // insertion.
    let opts = Options::new().with_noempty(true);
    let got = chunks(&["a", "", "b"], &["", "a", "", "b"], &opts);
    assert_eq!(got, vec![Chunk { start1: 0, n1: 0, start2: 0, n2: 1 }]);
}

#[test]
fn s7_empty_right_side_is_a_single_deletion_chunk() {
    let got = chunks(&["a", "b"], &[], &Options::new());
    assert_eq!(got, vec![Chunk { start1: 0, n1: 2, start2: 0, n2: 0 }]);
}

#[test]
fn s7_empty_left_side_is_a_single_insertion_chunk() {
    let got = chunks(&[], &["a", "b"], &Options::new());
    assert_eq!(got, vec![Chunk { start1: 0, n1: 0, start2: 0, n2: 2 }]);
}

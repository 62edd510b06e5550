//! `diff_lists`: element-granularity diffing over two in-memory sequences.
//!
//! Grounded in `difflists.c`'s `HashLists`/`CompareLists`. Two details
//! carried over deliberately: `diff_lists` never parses `-range` in the
//! original (it is a files-only option, set up by `SetOptsRange` which only
//! `DiffFilesObjCmd` calls), so `opts.range1`/`range2` are ignored here; and
//! `DiffListsObjCmd` force-sets `rFrom1 = rFrom2 = 0` before assembling,
//! which is exactly the "indexing is 0-based in the output" contract —
//! reproduced here as a fixed `-1` coordinate base rather than reading it
//! out of `opts.range1`.

use crate::assemble::{self, DiffResult};
use crate::engine;
use crate::error::Result;
use crate::hash;
use crate::options::Options;

/// Element-granularity diff between two lists, with 0-based output
/// positions regardless of `opts.range1`/`range2` (ignored for this
/// operation, matching the original's list command).
pub fn diff_lists(a: &[String], b: &[String], opts: &Options) -> Result<DiffResult> {
    let mut opts = opts.clone();
    opts.normalise()?;

    let left: Vec<(u64, u64)> = a.iter().map(|e| hash::hash_element(e, &opts.regsub_left, opts.ignore)).collect();
    let right: Vec<(u64, u64)> = b.iter().map(|e| hash::hash_element(e, &opts.regsub_right, opts.ignore)).collect();

    let mut j = engine::run_lcs(&left, &right, &opts);
    assemble::verify_matches(a.len(), b.len(), &mut j, |i, jx| hash::compare_elements(&a[i - 1], &b[jx - 1], &opts));

    Ok(assemble::build_result(a.len(), b.len(), &j, &opts, -1, -1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::DiffResult;
    use crate::options::ResultStyle;

    fn strs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn diff_style_reports_0_based_change_block() {
        let a = strs(&["a", "b", "c"]);
        let b = strs(&["a", "X", "c"]);
        let result = diff_lists(&a, &b, &Options::new()).unwrap();
        match result {
            DiffResult::Chunks(chunks) => {
                assert_eq!(chunks.len(), 1);
                assert_eq!(chunks[0].start1, 1);
                assert_eq!(chunks[0].start2, 1);
            }
            _ => panic!("expected chunks"),
        }
    }

    #[test]
    fn match_style_reports_0_based_positions() {
        let a = strs(&["a", "b", "c"]);
        let b = strs(&["a", "b", "c"]);
        let opts = Options::new().with_result_style(ResultStyle::Match);
        let result = diff_lists(&a, &b, &opts).unwrap();
        match result {
            DiffResult::Matches { left, right } => {
                assert_eq!(left, vec![0, 1, 2]);
                assert_eq!(right, vec![0, 1, 2]);
            }
            _ => panic!("expected matches"),
        }
    }

    #[test]
    fn empty_lists_produce_no_chunks() {
        let result = diff_lists(&[], &[], &Options::new()).unwrap();
        match result {
            DiffResult::Chunks(chunks) => assert!(chunks.is_empty()),
            _ => panic!("expected chunks"),
        }
    }
}

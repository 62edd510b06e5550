//! Property-based tests for the universally-quantified invariants: monotonic
//! matches, exact-match verification, idempotence on identical input, and
//! options-monotonicity of the hash/compare pipeline (adding an ignore flag
//! never turns an existing equality into an inequality).

use proptest::prelude::*;

use difflcs::{hash, DiffResult, Ignore, Options};

fn small_string() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d", ""]).prop_map(|s| s.to_string())
}

fn small_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(small_string(), 0..8)
}

proptest! {
    #[test]
    fn monotonic_matches(a in small_list(), b in small_list()) {
        let opts = Options::new();
        let result = difflcs::diff_lists(&a, &b, &opts.with_result_style(difflcs::ResultStyle::Match)).unwrap();
        let DiffResult::Matches { left, right } = result else { unreachable!() };
        for pair in left.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        for pair in right.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn exact_match_verification(a in small_list(), b in small_list()) {
        let opts = Options::new();
        let result = difflcs::diff_lists(&a, &b, &opts.with_result_style(difflcs::ResultStyle::Match)).unwrap();
        let DiffResult::Matches { left, right } = result else { unreachable!() };
        for (&l, &r) in left.iter().zip(right.iter()) {
            prop_assert_eq!(&a[l], &b[r]);
        }
    }

    #[test]
    fn idempotence(a in small_list()) {
        let opts = Options::new();
        let chunk_result = difflcs::diff_lists(&a, &a, &opts).unwrap();
        let DiffResult::Chunks(chunks) = chunk_result else { unreachable!() };
        prop_assert!(chunks.is_empty());

        let match_result = difflcs::diff_lists(&a, &a, &opts.with_result_style(difflcs::ResultStyle::Match)).unwrap();
        let DiffResult::Matches { left, right } = match_result else { unreachable!() };
        let expected: Vec<usize> = (0..a.len()).collect();
        prop_assert_eq!(left, expected.clone());
        prop_assert_eq!(right, expected);
    }

    #[test]
    fn options_monotonicity_of_ignore_case(a in small_string(), b in small_string()) {
        let base = Options::new();
        let with_case = Options::new().with_ignore(Ignore::CASE);
        if hash::compare_elements(&a, &b, &base) {
            prop_assert!(hash::compare_elements(&a, &b, &with_case));
        }
    }

    #[test]
    fn options_monotonicity_of_ignore_all_space(a in small_string(), b in small_string()) {
        let base = Options::new();
        let with_space = Options::new().with_ignore(Ignore::ALL_SPACE);
        if hash::compare_elements(&a, &b, &base) {
            prop_assert!(hash::compare_elements(&a, &b, &with_space));
        }
    }
}

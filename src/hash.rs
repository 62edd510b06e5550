//! Element hashing and comparison: the only place ignore flags, regex
//! pre-substitution, and Unicode-aware filtering are applied.
//!
//! Two hashes are produced per element: `realhash` over the raw
//! (post-regsub) bytes, used to break ties toward exact matches, and `hash`
//! over the ignore-filtered character sequence, used for equivalence-class
//! membership.

use crate::options::{Ignore, Options, Regsub};
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Space,
    Number,
    None,
}

/// `h <- h + (h << 7) + c`, the original's additive mixer, applied per
/// Unicode scalar value rather than per byte.
fn mixer_hash<I: Iterator<Item = char>>(chars: I) -> u64 {
    chars.fold(0u64, |h, c| h.wrapping_add(h << 7).wrapping_add(c as u64))
}

fn byte_mixer_hash(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |h, &b| h.wrapping_add(h << 7).wrapping_add(b as u64))
}

/// A single line's worth of input, up to (not including) the first `\n`.
fn first_line(text: &str) -> &str {
    text.split('\n').next().unwrap_or("")
}

/// Applies the ignore-flag character filter, collapsing whitespace/digit
/// runs and dropping case as configured. The leading state is `Space` so a
/// run of whitespace at the very start of the line is dropped under
/// `SPACE_CHANGE` (treating "start of line" as "already in a space run").
fn normalise_for_match(text: &str, ignore: Ignore) -> String {
    let line = first_line(text);
    if ignore.is_none() {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len());
    let mut state = RunState::Space;
    for raw in line.chars() {
        let c = if ignore.contains(Ignore::CASE) {
            raw.to_lowercase().next().unwrap_or(raw)
        } else {
            raw
        };
        if ignore.contains(Ignore::ALL_SPACE) && c.is_whitespace() {
            continue;
        }
        if c.is_whitespace() && ignore.contains(Ignore::SPACE_CHANGE) {
            if state == RunState::Space {
                continue;
            }
            state = RunState::Space;
            out.push(' ');
            continue;
        }
        if c.is_numeric() && ignore.contains(Ignore::NUMBERS) {
            if state == RunState::Number {
                continue;
            }
            state = RunState::Number;
            out.push('0');
            continue;
        }
        state = RunState::None;
        out.push(c);
    }
    out
}

/// Translates Tcl-style `&`/`\0`-`\9` backreferences (and literal `$`,
/// which must be escaped for the `regex` crate's replacement syntax) into
/// `regex`'s `${N}` replacement syntax.
fn translate_replacement(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len());
    let mut chars = replacement.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '&' => out.push_str("${0}"),
            '$' => out.push_str("$$"),
            '\\' => match chars.peek().copied() {
                Some(d) if d.is_ascii_digit() => {
                    chars.next();
                    out.push_str(&format!("${{{d}}}"));
                }
                Some('$') => {
                    chars.next();
                    out.push_str("$$");
                }
                Some(other) => {
                    chars.next();
                    out.push(other);
                }
                None => out.push('\\'),
            },
            other => out.push(other),
        }
    }
    out
}

/// Applies each (pattern, replacement) pair in order. A pattern that fails
/// to compile leaves that one substitution's text untouched; it does not
/// abort the remaining substitutions.
fn apply_regsub(text: &str, subs: &[Regsub]) -> String {
    let mut current = text.to_string();
    for sub in subs {
        if let Ok(re) = Regex::new(&sub.pattern) {
            let replacement = translate_replacement(&sub.replacement);
            current = re.replace_all(&current, replacement.as_str()).into_owned();
        }
    }
    current
}

/// Computes `(hash, realhash)` for one element's text.
pub fn hash_element(text: &str, regsubs: &[Regsub], ignore: Ignore) -> (u64, u64) {
    let substituted = apply_regsub(text, regsubs);
    let raw_line = first_line(&substituted);
    let realhash = byte_mixer_hash(raw_line.as_bytes());
    let normalised = normalise_for_match(&substituted, ignore);
    let hash = mixer_hash(normalised.chars());
    (hash, realhash)
}

/// Exact post-match verification: applies the same regsub + ignore-filter
/// pipeline to both sides and compares the result.
pub fn compare_elements(left: &str, right: &str, opts: &Options) -> bool {
    let l = apply_regsub(left, &opts.regsub_left);
    let r = apply_regsub(right, &opts.regsub_right);
    normalise_for_match(&l, opts.ignore) == normalise_for_match(&r, opts.ignore)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_hashes_to_zero() {
        let (hash, realhash) = hash_element("", &[], Ignore::NONE);
        assert_eq!(hash, 0);
        assert_eq!(realhash, 0);
    }

    #[test]
    fn ignore_case_makes_hashes_equal() {
        let (h1, _) = hash_element("Hello", &[], Ignore::CASE);
        let (h2, _) = hash_element("hello", &[], Ignore::CASE);
        assert_eq!(h1, h2);
    }

    #[test]
    fn ignore_case_does_not_affect_realhash() {
        let (_, r1) = hash_element("Hello", &[], Ignore::CASE);
        let (_, r2) = hash_element("hello", &[], Ignore::CASE);
        assert_ne!(r1, r2);
    }

    #[test]
    fn ignore_all_space_drops_every_space() {
        let (h1, _) = hash_element("a b  c", &[], Ignore::ALL_SPACE);
        let (h2, _) = hash_element("abc", &[], Ignore::ALL_SPACE);
        assert_eq!(h1, h2);
    }

    #[test]
    fn ignore_space_change_collapses_runs_and_drops_leading() {
        let (h1, _) = hash_element("   a   b", &[], Ignore::SPACE_CHANGE);
        let (h2, _) = hash_element("a b", &[], Ignore::SPACE_CHANGE);
        assert_eq!(h1, h2);
    }

    #[test]
    fn ignore_numbers_collapses_digit_runs() {
        let (h1, _) = hash_element("item42", &[], Ignore::NUMBERS);
        let (h2, _) = hash_element("item0", &[], Ignore::NUMBERS);
        assert_eq!(h1, h2);
        let (h3, _) = hash_element("item12345", &[], Ignore::NUMBERS);
        assert_eq!(h1, h3);
    }

    #[test]
    fn newline_terminates_hash_input() {
        let (h1, r1) = hash_element("abc\nXYZ", &[], Ignore::NONE);
        let (h2, r2) = hash_element("abc", &[], Ignore::NONE);
        assert_eq!(h1, h2);
        assert_eq!(r1, r2);
    }

    #[test]
    fn compare_elements_direct_path_is_byte_equality() {
        let opts = Options::new();
        assert!(compare_elements("abc", "abc", &opts));
        assert!(!compare_elements("abc", "abd", &opts));
    }

    #[test]
    fn compare_elements_honours_ignore_case() {
        let opts = Options::new().with_ignore(Ignore::CASE);
        assert!(compare_elements("Hello", "hello", &opts));
    }

    #[test]
    fn options_monotonicity_of_hashes() {
        // S8: two elements equal without a flag remain equal with it added.
        let base = Options::new();
        assert!(compare_elements("same", "same", &base));
        let with_case = Options::new().with_ignore(Ignore::CASE);
        assert!(compare_elements("same", "same", &with_case));
    }

    #[test]
    fn regsub_literal_backreference_and_ampersand() {
        let subs = vec![Regsub {
            pattern: "(foo)".to_string(),
            replacement: "[&]-\\1".to_string(),
        }];
        let substituted = apply_regsub("foobar", &subs);
        assert_eq!(substituted, "[foo]-foobar");
    }

    #[test]
    fn regsub_compile_error_is_swallowed() {
        let subs = vec![Regsub {
            pattern: "(unterminated".to_string(),
            replacement: "x".to_string(),
        }];
        let substituted = apply_regsub("abc", &subs);
        assert_eq!(substituted, "abc");
    }
}

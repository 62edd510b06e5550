//! Shared plumbing between the public operations: given two sides'
//! precomputed `(hash, realhash)` pairs, runs the V/E/P builders and the
//! LCS core to produce a `J` vector. Every `ops::*` adapter goes through
//! this one function so the phase-by-phase `tracing` instrumentation named
//! in the design (hash -> vectors -> core) lives in exactly one place.

use crate::lcs;
use crate::options::Options;
use crate::vectors;

/// Runs the full V/E/P/LCS pipeline and returns the raw (unverified) `J`
/// vector. `left`/`right` are already-hashed elements in original order;
/// callers own range filtering and element-text lookups.
pub fn run_lcs(left: &[(u64, u64)], right: &[(u64, u64)], opts: &Options) -> Vec<usize> {
    let m = left.len();
    let n = right.len();
    let _span = tracing::debug_span!("diff_core", m, n).entered();
    if m == 0 || n == 0 {
        return vec![0; m + 1];
    }

    let v = {
        let _span = tracing::trace_span!("build_v").entered();
        vectors::build_v(right)
    };
    let mut e = {
        let _span = tracing::trace_span!("build_e").entered();
        vectors::build_e(&v)
    };
    let p = {
        let _span = tracing::trace_span!("build_p").entered();
        vectors::build_p(left, &v, &mut e, opts)
    };
    let _span = tracing::trace_span!("lcs_core").entered();
    lcs::lcs_core(m, n, &p, &e, opts)
}

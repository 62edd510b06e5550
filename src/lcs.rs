//! The Hunt-McIlroy core: `merge` builds the candidate DAG one left-side
//! element at a time, `score_candidates` picks a path through it by a
//! depth-first traversal, and `lcs_core` wraps both together with the
//! forbidden-match post-pass.
//!
//! Ported from the original's `merge`/`ScoreCandidate(s)`/`LcsCoreInner`/
//! `LcsCore`/`PostProcessForbidden(Block)`. Candidates are `Option<CandidateId>`
//! handles into a `CandidateArena` rather than raw pointers; the DFS in
//! `score_candidates` uses a growable `Vec` as its explicit stack instead of
//! the original's manually resized array. All four `merge`/scoring
//! heuristics (same-column optimum, same-row optimum and its secondary
//! "close enough" relaxation, inexact-line scoring penalty) are permanently
//! enabled, matching the Open Question resolution recorded in DESIGN.md.

use crate::align::check_align;
use crate::candidate::{CandidateArena, CandidateId};
use crate::options::{AlignPin, Options};
use crate::vectors::{EEntry, PEntry};

/// Binary searches `K[r..=k]` for the slot whose `line2` brackets `j`,
/// returning `(s, K[s].line2, K[s+1].line2)`. Mirrors the original's inline
/// search in `merge`, where `s`/`b1`/`b2` keep their last-computed value
/// even when the loop falls out without an explicit `break`.
fn locate(arena: &CandidateArena, k_vec: &[CandidateId], r: usize, k: usize, j: usize) -> (usize, usize, usize) {
    let mut first = r;
    let mut last = k;
    let mut s = 0usize;
    let mut b1 = 0usize;
    let mut b2 = 0usize;
    loop {
        if first > last {
            break;
        }
        s = (first + last) / 2;
        b1 = arena.get(k_vec[s]).line2;
        b2 = arena.get(k_vec[s + 1]).line2;
        if (b1 < j && b2 > j) || b1 == j {
            break;
        }
        if b2 == j {
            s += 1;
            b1 = arena.get(k_vec[s]).line2;
            break;
        }
        if b2 < j {
            first = s + 1;
        } else {
            if s == 0 {
                break;
            }
            last = s - 1;
        }
    }
    (s, b1, b2)
}

/// Extends the candidate DAG with every right-side position equivalent to
/// left-side line `i`. `p0` is `P[i].eindex`, the class's first `E` slot.
#[allow(clippy::too_many_arguments)]
fn merge(
    arena: &mut CandidateArena,
    k_vec: &mut [CandidateId],
    k: &mut usize,
    i: usize,
    m: usize,
    p: &[PEntry],
    e: &[EEntry],
    p0: usize,
    align: &[AlignPin],
) {
    let mut c = k_vec[0];
    let mut ck = 0usize;
    let mut r = 0usize;
    let mut pidx = p0;

    loop {
        let j = e[pidx].serial;
        if !align.is_empty() && check_align(align, i, j) {
            if e[pidx].last {
                break;
            }
            pidx += 1;
            continue;
        }

        let (s, b1, b2) = locate(arena, k_vec, r, *k, j);

        if b1 < j && j < b2 {
            if ck == s + 1 {
                // Same-column peer: splice a new candidate into the row at c.
                let mut peer_id = c;
                loop {
                    let next = arena.get(peer_id).peer;
                    match next {
                        Some(np) if arena.get(np).line1 == arena.get(peer_id).line1 => {
                            peer_id = np;
                        }
                        _ => break,
                    }
                }
                let tail = arena.get(peer_id).peer;
                let prev = arena.get(c).prev;
                let newc = arena.alloc(i, j, e[pidx].realhash, prev, tail);
                arena.get_mut(peer_id).peer = Some(newc);
            } else {
                let mut peer_opt = Some(k_vec[s + 1]);
                if s >= *k {
                    k_vec[*k + 2] = k_vec[*k + 1];
                    *k += 1;
                    peer_opt = None;
                }
                let newc = arena.alloc(i, j, e[pidx].realhash, Some(k_vec[s]), peer_opt);
                k_vec[ck] = c;
                c = newc;
                ck = s + 1;

                let cand = *arena.get(c);
                let optimal = match cand.prev {
                    Some(prev_id) => {
                        let prev = *arena.get(prev_id);
                        let peer_ok = match prev.peer {
                            None => true,
                            Some(pp) => arena.get(pp).line1 < prev.line1,
                        };
                        cand.k > 1
                            && prev.realhash != 0
                            && p[cand.line1].realhash == cand.realhash
                            && cand.line1.saturating_sub(prev.line1) <= 1
                            && cand.line2.saturating_sub(prev.line2) <= 1
                            && peer_ok
                    }
                    None => false,
                };
                r = if optimal { s + 1 } else { s };
            }
        } else if b1 == j {
            // s >= 1 always holds here: K[0].line2 is 0 and j >= 1.
            if ck == s {
                let peer = arena.get(c).peer;
                let prev = arena.get(c).prev;
                let newc = arena.alloc(i, j, e[pidx].realhash, prev, peer);
                arena.get_mut(c).peer = Some(newc);
            } else {
                let ks = *arena.get(k_vec[s]);
                let ks_optimal = s > 1
                    && match ks.prev {
                        Some(pp) => {
                            let prevc = *arena.get(pp);
                            prevc.realhash != 0
                                && p[ks.line1].realhash == ks.realhash
                                && ks.line1.saturating_sub(prevc.line1) <= 1
                                && ks.line2.saturating_sub(prevc.line2) <= 1
                        }
                        None => false,
                    };
                let prev_slot = *arena.get(k_vec[s - 1]);
                if !ks_optimal || (i.saturating_sub(prev_slot.line1) <= 1 && j.saturating_sub(prev_slot.line2) <= 1) {
                    if (m - i) + s >= *k {
                        let mut tmp = Some(k_vec[s - 1]);
                        loop {
                            match tmp {
                                Some(tid) => {
                                    let t = *arena.get(tid);
                                    if t.line1 < i && t.line2 < j {
                                        break;
                                    }
                                    tmp = t.peer;
                                }
                                None => break,
                            }
                        }
                        let newc = arena.alloc(i, j, e[pidx].realhash, tmp, Some(k_vec[s]));
                        r = s;
                        k_vec[ck] = c;
                        ck = s;
                        c = newc;
                    }
                }
            }
        }

        if e[pidx].last {
            break;
        }
        pidx += 1;
    }
    k_vec[ck] = c;
}

/// Scores a single candidate by picking the best `prev` among its own
/// `prev`-then-`peer` row: the cheapest accumulated score, with jump
/// penalties for axis gaps and a bonus for moving on both axes at once.
fn score_candidate(arena: &mut CandidateArena, cand_id: CandidateId, p: &[PEntry]) {
    let cand = *arena.get(cand_id);
    let mut best_score: i64 = i64::MAX;
    let mut best_candidate = cand.prev;

    let mut prev_id = cand.prev;
    while let Some(pid) = prev_id {
        let prev = *arena.get(pid);
        if prev.line2 >= cand.line2 {
            break;
        }
        let mut score = prev.score as i64;
        if cand.k > 1 && prev.realhash != 0 {
            let jump1 = cand.line1 as i64 - prev.line1 as i64 > 1;
            let jump2 = cand.line2 as i64 - prev.line2 as i64 > 1;
            if jump1 {
                score += 2;
            }
            if jump2 {
                score += 2;
            }
            if jump1 && jump2 {
                score -= 1;
            }
        }
        let best_line2 = best_candidate.map(|b| arena.get(b).line2);
        if score < best_score || (score == best_score && best_line2 == Some(prev.line2)) {
            best_score = score;
            best_candidate = Some(pid);
        }
        prev_id = prev.peer;
    }

    let mut final_score = best_score.max(0);
    if p[cand.line1].realhash != cand.realhash {
        final_score += 5;
    }
    let c = arena.get_mut(cand_id);
    c.score = final_score as u64;
    c.prev = best_candidate;
}

/// Depth-first scores every candidate reachable from `K[k]`'s peer row,
/// via an explicit stack rather than recursion: a candidate is pushed
/// again whenever it is visited with unscored prevs still pending, so it
/// is revisited (and actually scored) only once all of those are done.
fn score_candidates(arena: &mut CandidateArena, k: usize, k_vec: &[CandidateId], p: &[PEntry]) {
    arena.get_mut(k_vec[0]).score = 1;
    if k == 0 {
        return;
    }

    let mut stack: Vec<CandidateId> = Vec::new();
    let mut cur = Some(k_vec[k]);
    while let Some(cid) = cur {
        stack.push(cid);
        cur = arena.get(cid).peer;
    }

    while let Some(&top) = stack.last() {
        if arena.get(top).score != 0 {
            stack.pop();
            continue;
        }
        let top_line2 = arena.get(top).line2;
        let mut ready = true;
        let mut prev = arena.get(top).prev;
        while let Some(pid) = prev {
            let p_cand = *arena.get(pid);
            if p_cand.line2 >= top_line2 {
                break;
            }
            if p_cand.score == 0 {
                stack.push(pid);
                ready = false;
            }
            prev = p_cand.peer;
        }
        if ready {
            score_candidate(arena, top, p);
            stack.pop();
        }
    }
}

/// Runs `merge` over every left-side line, scores the resulting DAG, and
/// walks the best end-point's `prev` chain into a 1-based `J` vector
/// (`J[i] == 0` means line `i` has no match). Returns `(J, any_forbidden)`,
/// where `any_forbidden` tells the caller whether the post-pass needs to
/// run.
pub fn lcs_core_inner(m: usize, n: usize, p: &[PEntry], e: &[EEntry], align: &[AlignPin]) -> (Vec<usize>, bool) {
    let mut arena = CandidateArena::new();
    let mut k_vec: Vec<CandidateId> = vec![0; m.min(n) + 2];
    let root = arena.alloc(0, 0, 0, None, None);
    let fence = arena.alloc(m + 1, n + 1, 0, None, None);
    k_vec[0] = root;
    k_vec[1] = fence;
    let mut k = 0usize;
    let mut any_forbidden = false;

    for i in 1..=m {
        let eindex = p[i].eindex;
        if eindex == 0 {
            continue;
        }
        if p[i].forbidden {
            any_forbidden = true;
        } else {
            merge(&mut arena, &mut k_vec, &mut k, i, m, p, e, eindex, align);
        }
    }

    score_candidates(&mut arena, k, &k_vec, p);

    let mut best = k_vec[k];
    if arena.get(best).peer.is_some() {
        let mut best_prim: i64 = i64::MAX;
        let mut best_sec: i64 = i64::MAX;
        let mut cur = Some(best);
        while let Some(cid) = cur {
            let cand = *arena.get(cid);
            let primscore = cand.score as i64;
            let axis_diff = (m as i64 - cand.line1 as i64) - (n as i64 - cand.line2 as i64);
            let mut secscore = axis_diff.abs();
            let diag = (cand.line1 as i64 - cand.line2 as i64).abs();
            if diag < secscore {
                secscore = diag;
            }
            if p[cand.line1].realhash != cand.realhash {
                secscore += 100;
            }
            if primscore < best_prim || (primscore == best_prim && secscore < best_sec) {
                best_prim = primscore;
                best_sec = secscore;
                best = cid;
            }
            cur = cand.peer;
        }
    }

    let mut j_vec = vec![0usize; m + 1];
    let mut cur = Some(best);
    while let Some(cid) = cur {
        let cand = *arena.get(cid);
        assert!(cand.line1 <= m, "candidate line1 out of range while building J");
        j_vec[cand.line1] = cand.line2;
        cur = cand.prev;
    }

    (j_vec, any_forbidden)
}

/// `IsLineMatch`: a candidate pairing is usable in the forbidden post-pass
/// only if the hashes agree and no alignment pin forbids it.
fn is_line_match(hash1: u64, hash2: u64, line1: usize, line2: usize, align: &[AlignPin]) -> bool {
    hash1 == hash2 && !check_align(align, line1, line2)
}

/// Resolves one gap between two already-matched lines: if either side of
/// the gap has exactly one forbidden candidate, pair it with any matching
/// candidate from the other side; otherwise pair off same-position
/// candidates one-for-one. Deliberately not optimal (it does not search for
/// the best alignment within the gap) — preserved as-is per the original's
/// own "FIXA" admission.
fn post_process_forbidden_block(j: &mut [usize], i_list: &[(usize, u64)], j_list: &[(usize, u64)], align: &[AlignPin]) {
    if i_list.len() == 1 {
        let (line1, hash1) = i_list[0];
        for &(line2, hash2) in j_list {
            if is_line_match(hash1, hash2, line1, line2, align) {
                j[line1] = line2;
                return;
            }
        }
        return;
    }
    if j_list.len() == 1 {
        let (line2, hash2) = j_list[0];
        for &(line1, hash1) in i_list {
            if is_line_match(hash1, hash2, line1, line2, align) {
                j[line1] = line2;
                return;
            }
        }
        return;
    }
    for t in 0..i_list.len().min(j_list.len()) {
        let (line1, hash1) = i_list[t];
        let (line2, hash2) = j_list[t];
        if is_line_match(hash1, hash2, line1, line2, align) {
            j[line1] = line2;
        }
    }
}

/// Walks the gaps between confirmed matches, collecting the forbidden
/// candidates on each side and handing every non-empty gap to
/// `post_process_forbidden_block`.
fn post_process_forbidden(m: usize, n: usize, p: &[PEntry], e: &[EEntry], j: &mut [usize], align: &[AlignPin]) {
    let mut last_line2 = 0usize;
    let mut i_list: Vec<(usize, u64)> = Vec::new();

    for i in 1..=(m + 1) {
        let matched = i <= m && j[i] != 0;
        if i > m || matched {
            if !i_list.is_empty() {
                let first_j = last_line2 + 1;
                let last_j = if i > m { n } else { j[i] - 1 };
                let mut j_list: Vec<(usize, u64)> = Vec::new();
                if first_j <= last_j {
                    for jj in 1..=n {
                        if e[jj].serial >= first_j && e[jj].serial <= last_j && e[jj].forbidden {
                            j_list.push((e[jj].serial, e[jj].hash));
                        }
                    }
                }
                if !j_list.is_empty() {
                    j_list.sort_by_key(|&(line, _)| line);
                    post_process_forbidden_block(j, &i_list, &j_list, align);
                }
            }
            if i <= m {
                last_line2 = j[i];
            }
            i_list.clear();
            continue;
        }
        if p[i].forbidden {
            i_list.push((i, p[i].hash));
        }
    }
}

/// Builds the match vector `J` for the left side against the right side,
/// running the forbidden-match post-pass whenever `build_p` forbade any
/// equivalence classes (`noempty`/`pivot`); the forbidding itself has
/// already happened in `vectors::build_p`, so this does not repeat it.
pub fn lcs_core(m: usize, n: usize, p: &[PEntry], e: &[EEntry], opts: &Options) -> Vec<usize> {
    let (mut j_vec, any_forbidden) = lcs_core_inner(m, n, p, e, &opts.align);
    if any_forbidden {
        post_process_forbidden(m, n, p, e, &mut j_vec, &opts.align);
    }
    j_vec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::vectors::{build_e, build_p, build_v};

    fn diff_hashes(left: &[u64], right: &[u64]) -> Vec<usize> {
        let left_hashes: Vec<(u64, u64)> = left.iter().map(|&h| (h, h)).collect();
        let right_hashes: Vec<(u64, u64)> = right.iter().map(|&h| (h, h)).collect();
        let opts = Options::new();
        let v = build_v(&right_hashes);
        let mut e = build_e(&v);
        let p = build_p(&left_hashes, &v, &mut e, &opts);
        lcs_core(left.len(), right.len(), &p, &e, &opts)
    }

    #[test]
    fn identical_sequences_match_every_position() {
        let j = diff_hashes(&[1, 2, 3], &[1, 2, 3]);
        assert_eq!(j, vec![0, 1, 2, 3]);
    }

    #[test]
    fn disjoint_sequences_match_nothing() {
        let j = diff_hashes(&[1, 2, 3], &[4, 5, 6]);
        assert_eq!(j, vec![0, 0, 0, 0]);
    }

    #[test]
    fn single_insertion_shifts_the_tail() {
        // left: a b c, right: a x b c -> a matches 1, b matches 3, c matches 4
        let j = diff_hashes(&[1, 2, 3], &[1, 9, 2, 3]);
        assert_eq!(j, vec![0, 1, 3, 4]);
    }

    #[test]
    fn single_deletion_shifts_the_tail() {
        // left: a x b c, right: a b c
        let j = diff_hashes(&[1, 9, 2, 3], &[1, 2, 3]);
        assert_eq!(j, vec![0, 1, 0, 2, 3]);
    }

    #[test]
    fn common_subsequence_is_monotonic() {
        let j = diff_hashes(&[1, 2, 3, 4, 5], &[5, 4, 3, 2, 1]);
        let matched: Vec<usize> = j.iter().skip(1).copied().filter(|&x| x != 0).collect();
        for pair in matched.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn empty_left_matches_nothing() {
        let j = diff_hashes(&[], &[1, 2, 3]);
        assert_eq!(j, vec![0]);
    }
}

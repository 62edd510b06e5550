//! V/E/P vector construction (§4.2, §4.3): sorting the right side into
//! equivalence classes and locating each left-side element's class.

use crate::options::Options;

/// One (originally-sorted) entry of the right-side element table.
#[derive(Debug, Clone, Copy)]
pub struct VEntry {
    pub serial: usize,
    pub hash: u64,
    pub realhash: u64,
}

/// One entry of the equivalence-class vector; index 0 is the sentinel.
#[derive(Debug, Clone, Copy)]
pub struct EEntry {
    pub serial: usize,
    pub hash: u64,
    pub realhash: u64,
    pub last: bool,
    pub count: usize,
    pub forbidden: bool,
}

/// One entry per left-side element; index 0 is the sentinel.
#[derive(Debug, Clone, Copy)]
pub struct PEntry {
    pub eindex: usize,
    pub hash: u64,
    pub realhash: u64,
    pub forbidden: bool,
}

/// Builds V from the right side's precomputed `(hash, realhash)` pairs,
/// sorted by `(hash, serial)`.
pub fn build_v(hashes: &[(u64, u64)]) -> Vec<VEntry> {
    let mut v: Vec<VEntry> = hashes
        .iter()
        .enumerate()
        .map(|(idx, &(hash, realhash))| VEntry {
            serial: idx + 1,
            hash,
            realhash,
        })
        .collect();
    v.sort_by(|a, b| a.hash.cmp(&b.hash).then(a.serial.cmp(&b.serial)));
    v
}

/// Builds E from sorted V: one sentinel at index 0, then one entry per V
/// entry, with `last`/`count` marking equivalence-class boundaries.
pub fn build_e(v: &[VEntry]) -> Vec<EEntry> {
    let n = v.len();
    let mut e = Vec::with_capacity(n + 1);
    e.push(EEntry {
        serial: 0,
        hash: 0,
        realhash: 0,
        last: true,
        count: 0,
        forbidden: true,
    });
    let mut class_start = 0usize;
    for j in 1..=n {
        let entry = v[j - 1];
        let is_last = j == n || entry.hash != v[j].hash;
        e.push(EEntry {
            serial: entry.serial,
            hash: entry.hash,
            realhash: entry.realhash,
            last: is_last,
            count: 0,
            forbidden: false,
        });
        if class_start == 0 {
            class_start = j;
        }
        if is_last {
            e[class_start].count = j - class_start + 1;
            class_start = 0;
        }
    }
    e
}

/// Builds P from the left side's precomputed `(hash, realhash)` pairs,
/// binary-searching sorted V for each one's equivalence class, then applies
/// the `noempty` and `pivot` forbidding rules to P and E together.
pub fn build_p(left_hashes: &[(u64, u64)], v: &[VEntry], e: &mut [EEntry], opts: &Options) -> Vec<PEntry> {
    let mut p = Vec::with_capacity(left_hashes.len() + 1);
    p.push(PEntry {
        eindex: 0,
        hash: 0,
        realhash: 0,
        forbidden: false,
    });
    for &(hash, realhash) in left_hashes {
        let eindex = match v.binary_search_by(|entry| entry.hash.cmp(&hash)) {
            Ok(idx) => {
                let mut e_idx = idx + 1;
                while e_idx > 1 && !e[e_idx - 1].last {
                    e_idx -= 1;
                }
                e_idx
            }
            Err(_) => 0,
        };
        p.push(PEntry {
            eindex,
            hash,
            realhash,
            forbidden: false,
        });
    }

    for i in 1..p.len() {
        let eidx = p[i].eindex;
        if eidx == 0 {
            continue;
        }
        let noempty_forbid = opts.noempty && p[i].hash == 0;
        let pivot_forbid = e[eidx].count > opts.pivot;
        if noempty_forbid || pivot_forbid {
            p[i].forbidden = true;
            forbid_class(eidx, e);
        }
    }
    p
}

/// Marks every E entry in the equivalence class starting at `eidx` as
/// forbidden, walking forward until (and including) the class's `last`
/// entry.
fn forbid_class(eidx: usize, e: &mut [EEntry]) {
    let mut j = eidx;
    loop {
        if e[j].forbidden {
            break;
        }
        e[j].forbidden = true;
        if e[j].last {
            break;
        }
        j += 1;
    }
}

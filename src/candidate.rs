//! Candidate arena: the (i, j) match graph built by the `merge` step.
//!
//! The original links candidates by raw pointer into a slab arena freed as
//! one unit. The Rust port keeps the same "bump-allocate, free as a unit"
//! shape but represents handles as indices into a single growable `Vec`,
//! dropped whole when the owning `CandidateArena` goes out of scope —
//! there is no separate per-candidate destructor to run.

/// A handle into a `CandidateArena`. Stable for the lifetime of one diff
/// invocation.
pub type CandidateId = u32;

/// ≈64 KiB worth of candidates per growth step, matching the original's
/// slab block size; `Vec::reserve` below is what actually gives us this a
/// chunk at a time rather than growing one candidate at a time.
const CANDIDATES_PER_BLOCK: usize = 64 * 1024 / std::mem::size_of::<Candidate>();

#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub line1: usize,
    pub line2: usize,
    pub realhash: u64,
    pub k: usize,
    pub prev: Option<CandidateId>,
    pub peer: Option<CandidateId>,
    /// 0 means "not yet scored"; `K[0]` is seeded to 1 so it never collides
    /// with that sentinel meaning.
    pub score: u64,
}

pub struct CandidateArena {
    candidates: Vec<Candidate>,
}

impl CandidateArena {
    pub fn new() -> Self {
        CandidateArena {
            candidates: Vec::with_capacity(CANDIDATES_PER_BLOCK),
        }
    }

    pub fn alloc(
        &mut self,
        line1: usize,
        line2: usize,
        realhash: u64,
        prev: Option<CandidateId>,
        peer: Option<CandidateId>,
    ) -> CandidateId {
        if self.candidates.len() == self.candidates.capacity() {
            self.candidates.reserve(CANDIDATES_PER_BLOCK);
        }
        let k = prev.map(|p| self.candidates[p as usize].k + 1).unwrap_or(0);
        let id = self.candidates.len() as CandidateId;
        self.candidates.push(Candidate {
            line1,
            line2,
            realhash,
            k,
            prev,
            peer,
            score: 0,
        });
        id
    }

    pub fn get(&self, id: CandidateId) -> &Candidate {
        &self.candidates[id as usize]
    }

    pub fn get_mut(&mut self, id: CandidateId) -> &mut Candidate {
        &mut self.candidates[id as usize]
    }
}

impl Default for CandidateArena {
    fn default() -> Self {
        Self::new()
    }
}

//! Clause storage.
//!
//! Clauses are stored by value in a flat arena and referenced by index. Deleted clauses are
//! tombstoned in place rather than compacted: the header is marked deleted and the clause's two
//! watch list entries are dropped, but the slot itself is never reused. This keeps every
//! `ClauseRef` — including the ones held as antecedents on the trail — valid for the lifetime of
//! the solver, at the cost of never reclaiming a deleted clause's slot.

use satformula::Lit;

/// Opaque reference to a stored clause. Stable for the lifetime of the `ClauseDb` it was
/// obtained from.
pub type ClauseRef = usize;

#[derive(Clone, Copy, Debug)]
struct ClauseHeader {
    learned: bool,
    deleted: bool,
    lbd: u32,
}

/// Storage for both original and learned clauses.
#[derive(Default)]
pub struct ClauseDb {
    literals: Vec<Vec<Lit>>,
    headers: Vec<ClauseHeader>,
    original_count: usize,
}

impl ClauseDb {
    /// Add an original (non-learned) clause. Must not be called after the first learned clause
    /// has been added.
    pub fn add_original_clause(&mut self, lits: Vec<Lit>) -> ClauseRef {
        debug_assert_eq!(
            self.literals.len(),
            self.original_count,
            "original clauses must all be added before any learned clause"
        );
        let cref = self.push(lits, false, 0);
        self.original_count = self.literals.len();
        cref
    }

    /// Add a clause learned from conflict analysis, with its computed LBD.
    pub fn add_learned_clause(&mut self, lits: Vec<Lit>, lbd: u32) -> ClauseRef {
        self.push(lits, true, lbd)
    }

    fn push(&mut self, lits: Vec<Lit>, learned: bool, lbd: u32) -> ClauseRef {
        let cref = self.literals.len();
        self.literals.push(lits);
        self.headers.push(ClauseHeader {
            learned,
            deleted: false,
            lbd,
        });
        cref
    }

    pub fn literals(&self, cref: ClauseRef) -> &[Lit] {
        &self.literals[cref]
    }

    pub fn literals_mut(&mut self, cref: ClauseRef) -> &mut Vec<Lit> {
        &mut self.literals[cref]
    }

    pub fn len(&self, cref: ClauseRef) -> usize {
        self.literals[cref].len()
    }

    pub fn is_learned(&self, cref: ClauseRef) -> bool {
        self.headers[cref].learned
    }

    pub fn is_deleted(&self, cref: ClauseRef) -> bool {
        self.headers[cref].deleted
    }

    pub fn lbd(&self, cref: ClauseRef) -> u32 {
        self.headers[cref].lbd
    }

    pub fn set_lbd(&mut self, cref: ClauseRef, lbd: u32) {
        if lbd < self.headers[cref].lbd {
            self.headers[cref].lbd = lbd;
        }
    }

    pub fn mark_deleted(&mut self, cref: ClauseRef) {
        self.headers[cref].deleted = true;
    }

    pub fn original_count(&self) -> usize {
        self.original_count
    }

    /// Number of clauses ever stored, including tombstoned ones.
    pub fn count(&self) -> usize {
        self.literals.len()
    }

    /// Learned clause references that have not been tombstoned.
    pub fn live_learned_refs(&self) -> impl Iterator<Item = ClauseRef> + '_ {
        let original_count = self.original_count;
        (original_count..self.literals.len()).filter(move |&cref| !self.headers[cref].deleted)
    }
}

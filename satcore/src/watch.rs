//! Watchlists used to detect clauses that became unit or falsified.
//!
//! Each long clause (length >= 2) keeps its first two literals as its watched pair. A clause
//! watching literal `w` is registered in the bucket for `!w`, so that when `w` is asserted false
//! (i.e. `!w` becomes true) the clause shows up for re-examination. `watched_by(lit)` is therefore
//! queried with the literal that was *just asserted true*.
//!
//! Unlike the propagator this is grounded on, there is no blocking-literal optimization here: every
//! scan re-reads the clause's literals from the `ClauseDb` rather than caching one alongside the
//! watch entry.

use satformula::Lit;

use crate::clause::ClauseRef;

#[derive(Default)]
pub struct Watchlists {
    watches: Vec<Vec<ClauseRef>>,
}

impl Watchlists {
    pub fn set_var_count(&mut self, count: usize) {
        self.watches.resize(count * 2, Vec::new());
    }

    /// Start watching a clause on its first two literals.
    pub fn watch_clause(&mut self, cref: ClauseRef, lits: [Lit; 2]) {
        for &lit in &lits {
            self.watches[(!lit).code()].push(cref);
        }
    }

    /// Stop watching a clause on the given literal, if present.
    pub fn remove_watch(&mut self, lit: Lit, cref: ClauseRef) {
        let bucket = &mut self.watches[(!lit).code()];
        if let Some(pos) = bucket.iter().position(|&w| w == cref) {
            bucket.swap_remove(pos);
        }
    }

    /// Clauses that must be re-examined now that `lit` has just been asserted true.
    pub fn watched_by(&self, lit: Lit) -> &[ClauseRef] {
        &self.watches[lit.code()]
    }

    pub fn watched_by_mut(&mut self, lit: Lit) -> &mut Vec<ClauseRef> {
        &mut self.watches[lit.code()]
    }
}

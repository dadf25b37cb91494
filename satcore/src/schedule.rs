//! Scheduling of restarts and learned clause deletion.
//!
//! Deletion runs only at restart boundaries, for clauses learned since the previous restart,
//! exactly as laid out for the policy this is grounded on.

pub mod luby;

use log::info;

use self::luby::LubySequence;
use crate::clause::ClauseDb;
use crate::config::SolverConfig;
use crate::decision::vsids::Vsids;
use crate::proof::Proof;
use crate::propagate::backtrack;
use crate::statistics::Statistics;
use crate::trail::Trail;
use crate::variables::{Antecedent, Variables};
use crate::watch::Watchlists;

/// Tracks when the next restart is due and which learned clauses are in scope for deletion.
pub struct Schedule {
    conflicts_since_restart: u64,
    next_restart: u64,
    luby: LubySequence,
    /// Clause count at the previous restart boundary: deletion only considers clauses learned
    /// since then.
    clauses_at_last_restart: usize,
    lbd_limit: u32,
}

impl Default for Schedule {
    fn default() -> Schedule {
        Schedule {
            conflicts_since_restart: 0,
            next_restart: 0,
            luby: LubySequence::default(),
            clauses_at_last_restart: 0,
            lbd_limit: 10,
        }
    }
}

impl Schedule {
    pub fn new(config: &SolverConfig) -> Schedule {
        let mut luby = LubySequence::default();
        let next_restart = config.luby_scale * luby.advance();
        Schedule {
            next_restart,
            luby,
            lbd_limit: config.lbd_limit_initial,
            ..Schedule::default()
        }
    }

    /// Called once per conflict, after the learned clause from that conflict has been added.
    /// Triggers a restart (and, if due, a deletion pass) when the Luby-scheduled threshold is
    /// reached.
    pub fn after_conflict(
        &mut self,
        config: &SolverConfig,
        variables: &mut Variables,
        trail: &mut Trail,
        clauses: &mut ClauseDb,
        watches: &mut Watchlists,
        vsids: &mut Vsids,
        proof: &mut Proof,
        stats: &mut Statistics,
    ) {
        self.conflicts_since_restart += 1;

        if config.use_restarts && self.conflicts_since_restart > self.next_restart {
            backtrack(variables, trail, vsids, 0);
            stats.restarts += 1;
            self.conflicts_since_restart = 0;
            self.next_restart = config.luby_scale * self.luby.advance();

            let mut deleted_this_pass = 0;
            if config.use_deletion {
                deleted_this_pass = delete_high_lbd_clauses(
                    clauses,
                    watches,
                    variables,
                    self.clauses_at_last_restart,
                    self.lbd_limit,
                    proof,
                    stats,
                );
                self.lbd_limit = (self.lbd_limit as f64 * config.lbd_growth) as u32;
            }
            self.clauses_at_last_restart = clauses.count();

            info!(
                "confl: {}k rest: {} learned: {} deleted: {}",
                stats.conflicts / 1000,
                stats.restarts,
                stats.learned_clauses,
                deleted_this_pass
            );
        }
    }
}

/// A clause currently serving as the antecedent of an assigned variable must survive a
/// deletion pass.
fn is_locked(cref: crate::clause::ClauseRef, clauses: &ClauseDb, variables: &Variables) -> bool {
    let lits = clauses.literals(cref);
    if lits.is_empty() {
        return false;
    }
    let var = lits[0].var();
    variables.is_assigned(var) && variables.antecedent(var) == Antecedent::Clause(cref)
}

/// Returns the number of clauses deleted in this pass.
fn delete_high_lbd_clauses(
    clauses: &mut ClauseDb,
    watches: &mut Watchlists,
    variables: &Variables,
    since: usize,
    lbd_limit: u32,
    proof: &mut Proof,
    stats: &mut Statistics,
) -> usize {
    let victims: Vec<_> = clauses
        .live_learned_refs()
        .filter(|&cref| cref >= since)
        .filter(|&cref| clauses.lbd(cref) > lbd_limit)
        .filter(|&cref| !is_locked(cref, clauses, variables))
        .collect();

    for &cref in &victims {
        let lits = clauses.literals(cref).to_vec();
        if lits.len() >= 2 {
            watches.remove_watch(lits[0], cref);
            watches.remove_watch(lits[1], cref);
        }
        proof.delete_clause(&lits);
        clauses.mark_deleted(cref);
        stats.deleted_clauses += 1;
    }

    victims.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use satformula::Lit;

    fn l(n: isize) -> Lit {
        Lit::from_dimacs(n)
    }

    #[test]
    fn locked_clause_survives_deletion() {
        let mut variables = Variables::default();
        variables.set_var_count(2);
        let mut clauses = ClauseDb::default();
        clauses.add_original_clause(vec![l(1), l(2)]);
        let learned = clauses.add_learned_clause(vec![l(1), l(2)], 99);
        variables.assign(l(1), 1, Antecedent::Clause(learned));

        let mut watches = Watchlists::default();
        watches.set_var_count(2);
        watches.watch_clause(learned, [l(1), l(2)]);
        let mut proof = Proof::default();
        let mut stats = Statistics::default();

        delete_high_lbd_clauses(&mut clauses, &mut watches, &variables, 0, 1, &mut proof, &mut stats);

        assert!(!clauses.is_deleted(learned));
        assert_eq!(stats.deleted_clauses, 0);
    }

    #[test]
    fn unlocked_high_lbd_clause_is_deleted() {
        let mut variables = Variables::default();
        variables.set_var_count(2);
        let mut clauses = ClauseDb::default();
        clauses.add_original_clause(vec![l(1), l(2)]);
        let learned = clauses.add_learned_clause(vec![l(1), l(2)], 99);

        let mut watches = Watchlists::default();
        watches.set_var_count(2);
        watches.watch_clause(learned, [l(1), l(2)]);
        let mut proof = Proof::default();
        let mut stats = Statistics::default();

        delete_high_lbd_clauses(&mut clauses, &mut watches, &variables, 0, 1, &mut proof, &mut stats);

        assert!(clauses.is_deleted(learned));
        assert_eq!(stats.deleted_clauses, 1);
    }
}

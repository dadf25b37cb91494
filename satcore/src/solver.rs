//! The public solver API.

use std::io::{self, Write};

use rand::SeedableRng;
use satformula::{CnfFormula, Lit};

use crate::analyze_conflict::AnalyzeConflict;
use crate::cdcl::{search, SearchState};
use crate::clause::ClauseDb;
use crate::config::SolverConfig;
use crate::decision::vsids::Vsids;
use crate::model::Model;
use crate::proof::Proof;
use crate::propagate::enqueue_assignment;
use crate::schedule::Schedule;
use crate::state::SatState;
use crate::statistics::Statistics;
use crate::trail::Trail;
use crate::variables::Antecedent;
use crate::variables::Variables;
use crate::watch::Watchlists;

/// A CDCL SAT solver.
///
/// Clauses are added with [`Solver::add_formula`] or [`Solver::add_clause`], then
/// [`Solver::solve`] runs the search to completion. Which parts of the algorithm run is
/// controlled by the [`SolverConfig`] passed to [`Solver::new`].
pub struct Solver {
    config: SolverConfig,
    variables: Variables,
    trail: Trail,
    clauses: ClauseDb,
    watches: Watchlists,
    vsids: Vsids,
    analyze: AnalyzeConflict,
    schedule: Schedule,
    proof: Proof,
    stats: Statistics,
    rng: rand::rngs::StdRng,
    sat_state: SatState,
    model: Option<Model>,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Solver {
        let rng = rand::rngs::StdRng::seed_from_u64(config.random_seed);
        let schedule = Schedule::new(&config);
        let mut vsids = Vsids::default();
        vsids.set_bump(config.vsids_initial_bump);
        vsids.set_bump_factor(config.vsids_bump_factor);
        vsids.set_rescale_threshold(config.vsids_rescale_threshold);
        Solver {
            config,
            variables: Variables::default(),
            trail: Trail::default(),
            clauses: ClauseDb::default(),
            watches: Watchlists::default(),
            vsids,
            analyze: AnalyzeConflict::default(),
            schedule,
            proof: Proof::default(),
            stats: Statistics::default(),
            rng,
            sat_state: SatState::Unknown,
            model: None,
        }
    }

    /// Enable DRAT proof recording. Must be called before any clause is added.
    pub fn enable_proof_logging(&mut self) {
        self.proof.enable();
    }

    fn set_var_count(&mut self, count: usize) {
        if count > self.variables.var_count() {
            self.variables.set_var_count(count);
            self.watches.set_var_count(count);
            self.vsids.set_var_count(count);
            self.analyze.set_var_count(count);
        }
    }

    /// Add every clause of a formula.
    pub fn add_formula(&mut self, formula: &CnfFormula) {
        self.set_var_count(formula.var_count());
        for clause in formula.iter() {
            self.add_clause(clause.iter().copied());
        }
    }

    /// Add a single clause, given as its literals in any order.
    ///
    /// Duplicate literals are removed and tautological clauses (containing both a literal and
    /// its negation) are dropped. Unlike propagation during search, this does not simplify a
    /// clause against the literals already on the trail: every forced consequence is discovered
    /// by the real propagator, so statistics stay accurate.
    pub fn add_clause(&mut self, lits: impl IntoIterator<Item = Lit>) {
        if self.sat_state == SatState::Unsat {
            return;
        }

        let mut lits: Vec<Lit> = lits.into_iter().collect();
        let max_index = lits.iter().map(|lit| lit.index() + 1).max().unwrap_or(0);
        self.set_var_count(max_index.max(self.variables.var_count()));

        lits.sort_unstable();
        lits.dedup();

        for pair in lits.windows(2) {
            if pair[0] == !pair[1] {
                return; // tautology: drop the clause
            }
        }

        self.proof.add_clause(&lits);

        match lits.len() {
            0 => {
                self.sat_state = SatState::Unsat;
            }
            1 => match self.variables.lit_value(lits[0]) {
                Some(true) => {}
                Some(false) => {
                    self.proof.add_clause(&[]);
                    self.sat_state = SatState::Unsat;
                }
                None => {
                    let cref = self.clauses.add_original_clause(lits.clone());
                    enqueue_assignment(
                        &mut self.variables,
                        &mut self.trail,
                        &mut self.vsids,
                        lits[0],
                        0,
                        Antecedent::Clause(cref),
                    );
                }
            },
            _ => {
                let watched = [lits[0], lits[1]];
                let cref = self.clauses.add_original_clause(lits);
                self.watches.watch_clause(cref, watched);
            }
        }
    }

    /// Run the search to completion.
    pub fn solve(&mut self) -> SatState {
        if self.sat_state != SatState::Unknown {
            return self.sat_state;
        }

        let mut state = SearchState {
            config: &self.config,
            variables: &mut self.variables,
            trail: &mut self.trail,
            clauses: &mut self.clauses,
            watches: &mut self.watches,
            vsids: &mut self.vsids,
            analyze: &mut self.analyze,
            schedule: &mut self.schedule,
            proof: &mut self.proof,
            stats: &mut self.stats,
            rng: &mut self.rng,
        };

        self.sat_state = search(&mut state);

        if self.sat_state == SatState::Sat {
            self.model = Some(Model::extract(&self.variables));
        }

        self.sat_state
    }

    pub fn state(&self) -> SatState {
        self.sat_state
    }

    /// The satisfying assignment, if `solve` returned `SatState::Sat`.
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Write the recorded DRAT proof. Only meaningful after `solve` returned `SatState::Unsat`
    /// with proof logging enabled.
    pub fn write_proof(&self, target: &mut impl Write) -> io::Result<()> {
        self.proof.write(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satformula::Lit;

    fn l(n: isize) -> Lit {
        Lit::from_dimacs(n)
    }

    #[test]
    fn trivial_sat() {
        let mut solver = Solver::new(SolverConfig::default());
        solver.add_clause(vec![l(1), l(2)]);
        solver.add_clause(vec![l(-1), l(2)]);
        assert_eq!(solver.solve(), SatState::Sat);
        let model = solver.model().unwrap();
        assert!(model.value(l(2).var()));
    }

    #[test]
    fn trivial_unsat() {
        let mut solver = Solver::new(SolverConfig::default());
        solver.add_clause(vec![l(1)]);
        solver.add_clause(vec![l(-1)]);
        assert_eq!(solver.solve(), SatState::Unsat);
    }

    #[test]
    fn empty_clause_is_immediately_unsat() {
        let mut solver = Solver::new(SolverConfig::default());
        solver.add_clause(Vec::new());
        assert_eq!(solver.solve(), SatState::Unsat);
    }

    #[test]
    fn tautological_clause_is_dropped() {
        let mut solver = Solver::new(SolverConfig::default());
        solver.add_clause(vec![l(1), l(-1)]);
        solver.add_clause(vec![l(2)]);
        assert_eq!(solver.solve(), SatState::Sat);
    }

    #[test]
    fn all_features_disabled_still_solves() {
        let config = SolverConfig {
            use_vsids: false,
            use_restarts: false,
            use_learning: false,
            use_deletion: false,
            use_minimization: false,
            ..SolverConfig::default()
        };
        let mut solver = Solver::new(config);
        solver.add_clause(vec![l(1), l(2), l(3)]);
        solver.add_clause(vec![l(-1), l(2)]);
        solver.add_clause(vec![l(-2), l(3)]);
        assert_eq!(solver.solve(), SatState::Sat);
    }

    #[test]
    fn all_features_disabled_finds_unsat() {
        let config = SolverConfig {
            use_vsids: false,
            use_restarts: false,
            use_learning: false,
            use_deletion: false,
            use_minimization: false,
            ..SolverConfig::default()
        };
        let mut solver = Solver::new(config);
        solver.add_clause(vec![l(1), l(2)]);
        solver.add_clause(vec![l(1), l(-2)]);
        solver.add_clause(vec![l(-1), l(2)]);
        solver.add_clause(vec![l(-1), l(-2)]);
        assert_eq!(solver.solve(), SatState::Unsat);
    }
}

//! Conflict driven clause learning: the main search loop.

use crate::analyze_conflict::{analyze, AnalyzeConflict};
use crate::clause::ClauseDb;
use crate::config::SolverConfig;
use crate::decision::{make_decision, vsids::Vsids};
use crate::proof::Proof;
use crate::propagate::{backtrack, enqueue_assignment, propagate};
use crate::schedule::Schedule;
use crate::state::SatState;
use crate::statistics::Statistics;
use crate::trail::Trail;
use crate::variables::{Antecedent, Variables};
use crate::watch::Watchlists;

/// Everything the search loop threads through on every step.
pub struct SearchState<'a> {
    pub config: &'a SolverConfig,
    pub variables: &'a mut Variables,
    pub trail: &'a mut Trail,
    pub clauses: &'a mut ClauseDb,
    pub watches: &'a mut Watchlists,
    pub vsids: &'a mut Vsids,
    pub analyze: &'a mut AnalyzeConflict,
    pub schedule: &'a mut Schedule,
    pub proof: &'a mut Proof,
    pub stats: &'a mut Statistics,
    pub rng: &'a mut rand::rngs::StdRng,
}

/// Run the search until a satisfying assignment or a proof of unsatisfiability is found.
pub fn search(state: &mut SearchState) -> SatState {
    loop {
        match find_conflict(state) {
            Ok(()) => return SatState::Sat,
            Err(conflict) => {
                if resolve_conflict(state, conflict) == SatState::Unsat {
                    return SatState::Unsat;
                }
            }
        }
    }
}

/// Propagate and decide until either every variable is assigned or a conflict is found.
fn find_conflict(state: &mut SearchState) -> Result<(), crate::propagate::Conflict> {
    loop {
        propagate(
            state.variables,
            state.trail,
            state.clauses,
            state.watches,
            state.vsids,
            state.stats,
        )?;

        if !make_decision(
            state.config,
            state.vsids,
            state.rng,
            state.variables,
            state.trail,
        ) {
            return Ok(());
        }
        state.stats.decisions += 1;
    }
}

/// Analyze a conflict, learn a clause (if enabled), backjump and enqueue the asserting literal.
/// Returns `SatState::Unsat` if the empty clause was derived.
fn resolve_conflict(state: &mut SearchState, conflict: crate::propagate::Conflict) -> SatState {
    state.stats.conflicts += 1;

    if state.trail.current_level() == 0 {
        state.proof.add_clause(&[]);
        return SatState::Unsat;
    }

    if !state.config.use_learning {
        return chronological_backtrack(state);
    }

    let backtrack_to = analyze(
        state.analyze,
        state.config.use_minimization,
        state.variables,
        state.trail,
        state.clauses,
        state.vsids,
        conflict,
        &mut state.stats.minimizations,
    );

    backtrack(state.variables, state.trail, state.vsids, backtrack_to);

    let clause = state.analyze.clause().to_vec();
    state.proof.add_clause(&clause);

    match clause.len() {
        0 => return SatState::Unsat,
        1 => {
            let cref = state.clauses.add_learned_clause(clause.clone(), 1);
            state.stats.record_learned_clause(1);
            enqueue_assignment(
                state.variables,
                state.trail,
                state.vsids,
                clause[0],
                backtrack_to,
                Antecedent::Clause(cref),
            );
        }
        _ => {
            let lbd = state.analyze.lbd(state.variables);
            let cref = state.clauses.add_learned_clause(clause.clone(), lbd);
            state.watches.watch_clause(cref, [clause[0], clause[1]]);
            state.stats.record_learned_clause(clause.len());
            enqueue_assignment(
                state.variables,
                state.trail,
                state.vsids,
                clause[0],
                backtrack_to,
                Antecedent::Clause(cref),
            );
        }
    }

    state.schedule.after_conflict(
        state.config,
        state.variables,
        state.trail,
        state.clauses,
        state.watches,
        state.vsids,
        state.proof,
        state.stats,
    );

    SatState::Unknown
}

/// Chronological backtracking used when clause learning is disabled: undo the most recent
/// decision and retry it with the opposite polarity; if that polarity was already tried (the
/// decision was itself a retry), keep undoing further decisions instead.
fn chronological_backtrack(state: &mut SearchState) -> SatState {
    loop {
        let level = state.trail.current_level();
        if level == 0 {
            state.proof.add_clause(&[]);
            return SatState::Unsat;
        }

        let decision_lit = state.trail.decision_literal(level);
        let already_flipped = matches!(
            state.variables.antecedent(decision_lit.var()),
            Antecedent::FlippedDecision
        );

        backtrack(state.variables, state.trail, state.vsids, level - 1);

        if !already_flipped {
            state.trail.new_decision_level();
            enqueue_assignment(
                state.variables,
                state.trail,
                state.vsids,
                !decision_lit,
                level,
                Antecedent::FlippedDecision,
            );
            return SatState::Unknown;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::ClauseDb;
    use rand::SeedableRng;
    use satformula::Lit;

    fn l(n: isize) -> Lit {
        Lit::from_dimacs(n)
    }

    fn load(
        clauses: &mut ClauseDb,
        watches: &mut Watchlists,
        variables: &mut Variables,
        trail: &mut Trail,
        vsids: &mut Vsids,
        lits: Vec<Lit>,
    ) {
        match lits.len() {
            0 => {}
            1 => {
                if variables.lit_value(lits[0]).is_none() {
                    let cref = clauses.add_original_clause(lits.clone());
                    enqueue_assignment(variables, trail, vsids, lits[0], 0, Antecedent::Clause(cref));
                }
            }
            _ => {
                let cref = clauses.add_original_clause(lits.clone());
                watches.watch_clause(cref, [lits[0], lits[1]]);
            }
        }
    }

    #[test]
    fn unit_chain_propagates_without_deciding() {
        let mut variables = Variables::default();
        variables.set_var_count(5);
        let mut trail = Trail::default();
        let mut clauses = ClauseDb::default();
        let mut watches = Watchlists::default();
        watches.set_var_count(5);
        let mut vsids = Vsids::default();
        vsids.set_var_count(5);
        let mut analyze_scratch = AnalyzeConflict::default();
        analyze_scratch.set_var_count(5);
        let mut schedule = Schedule::default();
        let mut proof = Proof::default();
        let mut stats = Statistics::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let config = SolverConfig::default();

        load(&mut clauses, &mut watches, &mut variables, &mut trail, &mut vsids, vec![l(1)]);
        load(&mut clauses, &mut watches, &mut variables, &mut trail, &mut vsids, vec![l(-1), l(2)]);
        load(&mut clauses, &mut watches, &mut variables, &mut trail, &mut vsids, vec![l(-2), l(3)]);
        load(&mut clauses, &mut watches, &mut variables, &mut trail, &mut vsids, vec![l(-3), l(4)]);
        load(&mut clauses, &mut watches, &mut variables, &mut trail, &mut vsids, vec![l(-4), l(-5)]);

        let mut state = SearchState {
            config: &config,
            variables: &mut variables,
            trail: &mut trail,
            clauses: &mut clauses,
            watches: &mut watches,
            vsids: &mut vsids,
            analyze: &mut analyze_scratch,
            schedule: &mut schedule,
            proof: &mut proof,
            stats: &mut stats,
            rng: &mut rng,
        };

        let result = search(&mut state);
        assert_eq!(result, SatState::Sat);
        assert!(stats.unit_propagations >= 4);
        assert!(stats.decisions <= 1);
    }
}

//! Boolean constraint propagation via the two-watched-literal scheme.

use satformula::Lit;

use crate::clause::{ClauseDb, ClauseRef};
use crate::decision::vsids::Vsids;
use crate::statistics::Statistics;
use crate::trail::Trail;
use crate::variables::{Antecedent, Variables};
use crate::watch::Watchlists;

/// A clause found to have no non-false literals.
#[derive(Debug, Clone, Copy)]
pub struct Conflict(pub ClauseRef);

/// Assign `lit` true at `level`, recording `antecedent`, pushing it onto the trail and removing
/// its variable from the decision heuristic's pool of unassigned variables.
pub fn enqueue_assignment(
    variables: &mut Variables,
    trail: &mut Trail,
    vsids: &mut Vsids,
    lit: Lit,
    level: usize,
    antecedent: Antecedent,
) {
    variables.assign(lit, level as u32, antecedent);
    trail.push(lit);
    vsids.remove_available(lit.var());
}

/// Undo every assignment made at a decision level deeper than `level`, making the freed variables
/// available to the decision heuristic again.
pub fn backtrack(variables: &mut Variables, trail: &mut Trail, vsids: &mut Vsids, level: usize) {
    for lit in trail.unwind_to(level) {
        variables.unassign(lit.var());
        vsids.make_available(lit.var());
    }
}

/// Drain the propagation queue, moving watches and enqueuing forced assignments until either the
/// queue empties or a clause with no non-false literal is found.
pub fn propagate(
    variables: &mut Variables,
    trail: &mut Trail,
    clauses: &mut ClauseDb,
    watches: &mut Watchlists,
    vsids: &mut Vsids,
    stats: &mut Statistics,
) -> Result<(), Conflict> {
    while let Some(lit) = trail.next_to_propagate() {
        let false_lit = !lit;
        let level = trail.current_level();

        let mut i = 0;
        while i < watches.watched_by(lit).len() {
            let cref = watches.watched_by(lit)[i];

            if clauses.is_deleted(cref) {
                watches.watched_by_mut(lit).swap_remove(i);
                continue;
            }

            {
                let lits = clauses.literals_mut(cref);
                if lits[0] == false_lit {
                    lits.swap(0, 1);
                }
            }

            let other = clauses.literals(cref)[0];
            if variables.lit_value(other) == Some(true) {
                i += 1;
                continue;
            }

            let len = clauses.len(cref);
            let mut found_replacement = false;
            for j in 2..len {
                let candidate = clauses.literals(cref)[j];
                if variables.lit_value(candidate) != Some(false) {
                    clauses.literals_mut(cref).swap(1, j);
                    watches.watched_by_mut(lit).swap_remove(i);
                    watches.watched_by_mut(!candidate).push(cref);
                    found_replacement = true;
                    break;
                }
            }

            if found_replacement {
                continue;
            }

            if variables.lit_value(other) == Some(false) {
                return Err(Conflict(cref));
            }

            enqueue_assignment(variables, trail, vsids, other, level, Antecedent::Clause(cref));
            stats.unit_propagations += 1;
            i += 1;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::Variables;

    fn l(n: isize) -> Lit {
        Lit::from_dimacs(n)
    }

    fn setup(var_count: usize) -> (Variables, Trail, ClauseDb, Watchlists, Vsids, Statistics) {
        let mut variables = Variables::default();
        variables.set_var_count(var_count);
        let mut watches = Watchlists::default();
        watches.set_var_count(var_count);
        let mut vsids = Vsids::default();
        vsids.set_var_count(var_count);
        (
            variables,
            Trail::default(),
            ClauseDb::default(),
            watches,
            vsids,
            Statistics::default(),
        )
    }

    #[test]
    fn chain_of_binary_clauses_propagates_fully() {
        let (mut variables, mut trail, mut clauses, mut watches, mut vsids, mut stats) = setup(5);

        let chain = [
            vec![l(-1), l(2)],
            vec![l(-2), l(3)],
            vec![l(-3), l(4)],
            vec![l(-4), l(-5)],
        ];
        for lits in chain {
            let cref = clauses.add_original_clause(lits.clone());
            watches.watch_clause(cref, [lits[0], lits[1]]);
        }

        enqueue_assignment(&mut variables, &mut trail, &mut vsids, l(1), 0, Antecedent::Decision);

        propagate(
            &mut variables,
            &mut trail,
            &mut clauses,
            &mut watches,
            &mut vsids,
            &mut stats,
        )
        .unwrap();

        assert_eq!(variables.lit_value(l(2)), Some(true));
        assert_eq!(variables.lit_value(l(3)), Some(true));
        assert_eq!(variables.lit_value(l(4)), Some(true));
        assert_eq!(variables.lit_value(l(5)), Some(false));
        assert_eq!(stats.unit_propagations, 4);
        assert!(!vsids.is_available(l(5).var()));
    }

    #[test]
    fn detects_conflict_when_both_watches_turn_false() {
        let (mut variables, mut trail, mut clauses, mut watches, mut vsids, mut stats) = setup(2);

        let cref = clauses.add_original_clause(vec![l(1), l(2)]);
        watches.watch_clause(cref, [l(1), l(2)]);

        enqueue_assignment(&mut variables, &mut trail, &mut vsids, l(-1), 0, Antecedent::Decision);
        enqueue_assignment(&mut variables, &mut trail, &mut vsids, l(-2), 0, Antecedent::Decision);

        let result = propagate(
            &mut variables,
            &mut trail,
            &mut clauses,
            &mut watches,
            &mut vsids,
            &mut stats,
        );
        assert!(matches!(result, Err(Conflict(c)) if c == cref));
    }
}

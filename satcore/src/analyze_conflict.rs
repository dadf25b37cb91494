//! Learns a clause from a conflict via first unique implication point (1-UIP) analysis.
//!
//! Starting from the conflicting clause's literals, the trail is walked backwards, resolving away
//! every literal of the current decision level except the last one found — the 1-UIP. The
//! resulting clause asserts that literal's negation once the search backjumps past every other
//! literal's level.

use satformula::{Lit, Var};

use crate::clause::{ClauseDb, ClauseRef};
use crate::decision::vsids::Vsids;
use crate::propagate::Conflict;
use crate::trail::Trail;
use crate::variables::{Antecedent, Variables};

/// Scratch space for conflict analysis, reused across conflicts.
#[derive(Default)]
pub struct AnalyzeConflict {
    clause: Vec<Lit>,
    current_level_count: usize,
    in_clause: Vec<bool>,
    to_clean: Vec<Var>,
    involved: Vec<ClauseRef>,
}

impl AnalyzeConflict {
    pub fn set_var_count(&mut self, count: usize) {
        self.in_clause.resize(count, false);
    }

    /// The clause learned by the most recent call to [`analyze`]. The asserting literal is in
    /// position 0.
    pub fn clause(&self) -> &[Lit] {
        &self.clause
    }

    /// Clauses resolved against while deriving the learned clause.
    pub fn involved(&self) -> &[ClauseRef] {
        &self.involved
    }

    /// Literal block distance: the number of distinct decision levels among the clause's
    /// literals.
    pub fn lbd(&self, variables: &Variables) -> u32 {
        let mut levels: Vec<u32> = self
            .clause
            .iter()
            .map(|&lit| variables.level(lit.var()))
            .collect();
        levels.sort_unstable();
        levels.dedup();
        levels.len() as u32
    }
}

/// Analyze `conflict`, leaving the learned clause in `analyze.clause()`, and return the decision
/// level the search should backjump to.
pub fn analyze(
    analyze: &mut AnalyzeConflict,
    use_minimization: bool,
    variables: &Variables,
    trail: &Trail,
    clauses: &ClauseDb,
    vsids: &mut Vsids,
    conflict: Conflict,
    minimizations: &mut u64,
) -> usize {
    analyze.clause.clear();
    analyze.involved.clear();
    analyze.current_level_count = 0;

    if trail.current_level() == 0 {
        // A conflict with no decisions means the formula is unsatisfiable; the empty clause is
        // the result.
        return 0;
    }

    for &lit in clauses.literals(conflict.0) {
        add_literal(analyze, variables, vsids, trail, lit);
    }
    analyze.involved.push(conflict.0);

    for &lit in trail.history().iter().rev() {
        let present = &mut analyze.in_clause[lit.index()];
        if !*present {
            continue;
        }
        *present = false;
        analyze.current_level_count -= 1;

        if analyze.current_level_count == 0 {
            // `lit` is the last current-level literal still in the clause: the 1-UIP. The
            // learned clause asserts its negation, kept in position 0.
            analyze.clause.push(!lit);
            let end = analyze.clause.len() - 1;
            analyze.clause.swap(0, end);
            break;
        } else if let Antecedent::Clause(cref) = variables.antecedent(lit.var()) {
            for &reason_lit in clauses.literals(cref) {
                if reason_lit != lit {
                    add_literal(analyze, variables, vsids, trail, reason_lit);
                }
            }
            analyze.involved.push(cref);
        }
    }

    if use_minimization {
        let removed = minimize(&mut analyze.clause, &analyze.in_clause, variables, clauses);
        if removed > 0 {
            *minimizations += 1;
        }
    }

    for var in analyze.to_clean.drain(..) {
        analyze.in_clause[var.index()] = false;
    }

    // Move the literal with the highest level besides the asserting one into position 1, so
    // watching positions 0 and 1 remains correct immediately after backtracking.
    let mut backtrack_to = 0;
    if analyze.clause.len() > 1 {
        let (prefix, rest) = analyze.clause.split_at_mut(2);
        let second = &mut prefix[1];
        backtrack_to = variables.level(second.var()) as usize;
        for lit in rest.iter_mut() {
            let level = variables.level(lit.var()) as usize;
            if level > backtrack_to {
                backtrack_to = level;
                std::mem::swap(second, lit);
            }
        }
    }

    vsids.decay();

    backtrack_to
}

fn add_literal(
    analyze: &mut AnalyzeConflict,
    variables: &Variables,
    vsids: &mut Vsids,
    trail: &Trail,
    lit: Lit,
) {
    let level = variables.level(lit.var());
    // Literals forced by unit clauses (level 0) can never be part of the learned clause.
    if level == 0 || analyze.in_clause[lit.index()] {
        return;
    }
    vsids.bump(lit.var());
    analyze.in_clause[lit.index()] = true;
    if level as usize == trail.current_level() {
        analyze.current_level_count += 1;
    } else {
        analyze.clause.push(lit);
        analyze.to_clean.push(lit.var());
    }
}

/// Single-pass self-subsuming minimization: drop a literal if every other literal of its
/// antecedent clause is already implied by the clause being built.
fn minimize(clause: &mut Vec<Lit>, in_clause: &[bool], variables: &Variables, clauses: &ClauseDb) -> usize {
    let mut removed = 0;
    let mut write = 1;
    for read in 1..clause.len() {
        let lit = clause[read];
        let redundant = match variables.antecedent(lit.var()) {
            Antecedent::Decision => false,
            Antecedent::Clause(cref) => clauses
                .literals(cref)
                .iter()
                .all(|&other| other == lit || in_clause[other.index()]),
        };
        if redundant {
            removed += 1;
        } else {
            clause[write] = lit;
            write += 1;
        }
    }
    clause.truncate(write);
    removed
}

//! Per-variable assignment state.

use satformula::{Lit, Var};

use crate::clause::ClauseRef;

/// What forced a trail literal to its current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Antecedent {
    /// Chosen by the decision heuristic.
    Decision,
    /// Forced by unit propagation of the given clause. Also used for clauses of length one,
    /// which force their sole literal without ever being watched.
    Clause(ClauseRef),
    /// A decision literal re-tried with the opposite polarity after chronological backtracking
    /// (used only when clause learning is disabled).
    FlippedDecision,
}

#[derive(Debug, Clone, Copy)]
struct VarRecord {
    value: Option<bool>,
    level: u32,
    antecedent: Antecedent,
    last_polarity: bool,
}

impl Default for VarRecord {
    fn default() -> VarRecord {
        VarRecord {
            value: None,
            level: 0,
            antecedent: Antecedent::Decision,
            last_polarity: true,
        }
    }
}

/// Current value, decision level, antecedent and last-seen polarity of every variable.
#[derive(Default)]
pub struct Variables {
    data: Vec<VarRecord>,
}

impl Variables {
    pub fn set_var_count(&mut self, count: usize) {
        self.data.resize(count, VarRecord::default());
    }

    pub fn var_count(&self) -> usize {
        self.data.len()
    }

    pub fn value_of(&self, var: Var) -> Option<bool> {
        self.data[var.index()].value
    }

    pub fn lit_value(&self, lit: Lit) -> Option<bool> {
        self.value_of(lit.var()).map(|value| value ^ lit.is_negative())
    }

    pub fn is_assigned(&self, var: Var) -> bool {
        self.data[var.index()].value.is_some()
    }

    pub fn level(&self, var: Var) -> u32 {
        self.data[var.index()].level
    }

    pub fn antecedent(&self, var: Var) -> Antecedent {
        self.data[var.index()].antecedent
    }

    pub fn last_polarity(&self, var: Var) -> bool {
        self.data[var.index()].last_polarity
    }

    /// Assign the variable underlying `lit` so that `lit` becomes true. The variable must
    /// currently be unassigned.
    pub fn assign(&mut self, lit: Lit, level: u32, antecedent: Antecedent) {
        let record = &mut self.data[lit.index()];
        debug_assert!(record.value.is_none(), "variable assigned while already assigned");
        record.value = Some(lit.is_positive());
        record.level = level;
        record.antecedent = antecedent;
    }

    /// Unassign a variable, remembering its polarity for the next time it is decided on.
    pub fn unassign(&mut self, var: Var) {
        let record = &mut self.data[var.index()];
        if let Some(value) = record.value {
            record.last_polarity = value;
        }
        record.value = None;
    }

    /// Whether every variable currently has a value.
    pub fn all_assigned(&self) -> bool {
        self.data.iter().all(|record| record.value.is_some())
    }
}

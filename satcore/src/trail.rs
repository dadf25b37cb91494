//! The trail of assigned literals, in assignment order.
//!
//! There is no need to touch the watchlists on backtracking: unassigning a variable cannot
//! invalidate the two-watched-literal invariant, only assigning one can.

use satformula::Lit;

#[derive(Default)]
pub struct Trail {
    trail: Vec<Lit>,
    /// Index of the next trail entry that still needs to be handed to the propagator.
    queue_head: usize,
    /// Trail length at the start of each decision level beyond level 0.
    level_starts: Vec<usize>,
}

impl Trail {
    pub fn push(&mut self, lit: Lit) {
        self.trail.push(lit);
    }

    pub fn new_decision_level(&mut self) {
        self.level_starts.push(self.trail.len());
    }

    pub fn current_level(&self) -> usize {
        self.level_starts.len()
    }

    /// Pop the next literal that the propagator has not yet processed.
    pub fn next_to_propagate(&mut self) -> Option<Lit> {
        if self.queue_head < self.trail.len() {
            let lit = self.trail[self.queue_head];
            self.queue_head += 1;
            Some(lit)
        } else {
            None
        }
    }

    pub fn is_fully_propagated(&self) -> bool {
        self.queue_head == self.trail.len()
    }

    pub fn history(&self) -> &[Lit] {
        &self.trail
    }

    pub fn top_level_len(&self) -> usize {
        self.level_starts.first().copied().unwrap_or(self.trail.len())
    }

    /// The decision literal that opened `level` (1-based). The first trail entry of a decision
    /// level is always its decision, since propagation only ever appends afterwards.
    pub fn decision_literal(&self, level: usize) -> Lit {
        self.trail[self.level_starts[level - 1]]
    }

    /// Remove every trail entry belonging to a decision level greater than `level`, returning the
    /// removed literals in the order they were assigned.
    pub fn unwind_to(&mut self, level: usize) -> Vec<Lit> {
        if level >= self.current_level() {
            return Vec::new();
        }
        let cut = self.level_starts[level];
        self.level_starts.truncate(level);
        let removed = self.trail.split_off(cut);
        self.queue_head = cut;
        removed
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
    fn unwind_removes_higher_levels_and_resets_queue() {
        let mut trail = Trail::default();
        trail.push(l(1));
        trail.new_decision_level();
        trail.push(l(2));
        trail.push(l(3));
        trail.new_decision_level();
        trail.push(l(4));

        assert_eq!(trail.current_level(), 2);

        let removed = trail.unwind_to(1);
        assert_eq!(removed, vec![l(4)]);
        assert_eq!(trail.current_level(), 1);
        assert_eq!(trail.history(), &[l(1), l(2), l(3)]);
        assert!(trail.is_fully_propagated());
    }

    #[test]
    fn propagation_queue_drains_in_order() {
        let mut trail = Trail::default();
        trail.push(l(1));
        trail.push(l(2));
        assert_eq!(trail.next_to_propagate(), Some(l(1)));
        assert_eq!(trail.next_to_propagate(), Some(l(2)));
        assert_eq!(trail.next_to_propagate(), None);
    }
}

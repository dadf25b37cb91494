//! The VSIDS branching heuristic, and the binary heap of unassigned variables it doubles as.
//!
//! For each conflict, every variable that took part in resolving it is bumped: its activity
//! increases by a constant. That constant itself grows every conflict (instead of decaying every
//! activity) which is equivalent up to a common scaling factor and only costs a multiply per
//! conflict instead of one per variable. Activities are rescaled down whenever they would
//! otherwise overflow, and the bump resets to `1` at the same time.
//!
//! When VSIDS decisions are disabled, the same heap is used purely as the set of unassigned
//! variables: `pick_random` removes a uniformly chosen entry without needing the heap order to
//! mean anything.

use ordered_float::OrderedFloat;
use rand::Rng;

use satformula::Var;

/// Tracks variable activity and which variables are currently unassigned.
pub struct Vsids {
    activity: Vec<OrderedFloat<f32>>,
    heap: Vec<Var>,
    position: Vec<Option<usize>>,
    bump: f32,
    bump_factor: f32,
    rescale_threshold: f32,
}

impl Default for Vsids {
    fn default() -> Vsids {
        Vsids {
            activity: Vec::new(),
            heap: Vec::new(),
            position: Vec::new(),
            bump: 2.0,
            bump_factor: 1.05,
            rescale_threshold: 1e30,
        }
    }
}

impl Vsids {
    pub fn set_var_count(&mut self, count: usize) {
        let old_count = self.activity.len();
        self.activity.resize(count, OrderedFloat(0.0));
        self.position.resize(count, None);
        for i in old_count..count {
            self.make_available(Var::from_index(i));
        }
    }

    pub fn set_bump_factor(&mut self, bump_factor: f32) {
        assert!(bump_factor > 1.0);
        self.bump_factor = bump_factor;
    }

    pub fn set_bump(&mut self, bump: f32) {
        self.bump = bump;
    }

    pub fn set_rescale_threshold(&mut self, threshold: f32) {
        self.rescale_threshold = threshold;
    }

    /// Increase a variable's activity, called once per variable involved in a conflict.
    pub fn bump(&mut self, var: Var) {
        let rescale = {
            let value = &mut self.activity[var.index()];
            value.0 += self.bump;
            value.0 >= self.rescale_threshold
        };
        if rescale {
            self.rescale();
        }
        if let Some(pos) = self.position[var.index()] {
            self.sift_up(pos);
        }
    }

    /// Grow the bump value, called once per conflict. On overflow the activities are rescaled
    /// down and the bump resets to its initial value rather than being scaled proportionally.
    pub fn decay(&mut self) {
        self.bump *= self.bump_factor;
        if self.bump >= self.rescale_threshold {
            self.rescale();
        }
    }

    fn rescale(&mut self) {
        let factor = 1.0 / self.rescale_threshold;
        for activity in &mut self.activity {
            activity.0 *= factor;
        }
        self.bump = 1.0;
    }

    /// Insert a variable into the heap of unassigned variables, if not already present.
    pub fn make_available(&mut self, var: Var) {
        if self.position[var.index()].is_none() {
            let position = self.heap.len();
            self.position[var.index()] = Some(position);
            self.heap.push(var);
            self.sift_up(position);
        }
    }

    /// Remove a specific variable from the available set, if present. Used when a variable is
    /// assigned by a means other than `pop_best`/`pop_random` (chronological re-decision).
    pub fn remove_available(&mut self, var: Var) {
        if let Some(pos) = self.position[var.index()] {
            let last = self.heap.len() - 1;
            self.position[var.index()] = None;
            if pos != last {
                self.heap[pos] = self.heap[last];
                self.position[self.heap[pos].index()] = Some(pos);
            }
            self.heap.pop();
            if pos < self.heap.len() {
                self.sift_down(pos);
                self.sift_up(pos);
            }
        }
    }

    fn sift_up(&mut self, mut pos: usize) {
        let var = self.heap[pos];
        loop {
            if pos == 0 {
                return;
            }
            let parent_pos = (pos - 1) / 2;
            let parent_var = self.heap[parent_pos];
            if self.activity[parent_var.index()] >= self.activity[var.index()] {
                return;
            }
            self.position[var.index()] = Some(parent_pos);
            self.heap[parent_pos] = var;
            self.position[parent_var.index()] = Some(pos);
            self.heap[pos] = parent_var;
            pos = parent_pos;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let var = self.heap[pos];
        loop {
            let mut largest_pos = pos;
            let mut largest_var = var;

            let left_pos = pos * 2 + 1;
            if left_pos < self.heap.len() {
                let left_var = self.heap[left_pos];
                if self.activity[largest_var.index()] < self.activity[left_var.index()] {
                    largest_pos = left_pos;
                    largest_var = left_var;
                }
            }

            let right_pos = pos * 2 + 2;
            if right_pos < self.heap.len() {
                let right_var = self.heap[right_pos];
                if self.activity[largest_var.index()] < self.activity[right_var.index()] {
                    largest_pos = right_pos;
                    largest_var = right_var;
                }
            }

            if largest_pos == pos {
                return;
            }

            self.position[var.index()] = Some(largest_pos);
            self.heap[largest_pos] = var;
            self.position[largest_var.index()] = Some(pos);
            self.heap[pos] = largest_var;
            pos = largest_pos;
        }
    }

    /// Remove and return the highest-activity unassigned variable.
    pub fn pop_best(&mut self) -> Option<Var> {
        if self.heap.is_empty() {
            return None;
        }
        let var = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            let top_var = self.heap[0];
            self.position[top_var.index()] = Some(0);
            self.sift_down(0);
        }
        self.position[var.index()] = None;
        Some(var)
    }

    /// Remove and return a uniformly random unassigned variable. Does not preserve heap order,
    /// which is fine since a solve never mixes this with `pop_best`.
    pub fn pop_random(&mut self, rng: &mut impl Rng) -> Option<Var> {
        if self.heap.is_empty() {
            return None;
        }
        let index = rng.gen_range(0, self.heap.len());
        let var = self.heap.swap_remove(index);
        self.position[var.index()] = None;
        if index < self.heap.len() {
            self.position[self.heap[index].index()] = Some(index);
        }
        Some(var)
    }

    pub fn is_available(&self, var: Var) -> bool {
        self.position[var.index()].is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_sorts_by_activity() {
        let mut vsids = Vsids::default();
        vsids.set_var_count(8);

        for i in 0..8 {
            for _ in 0..i {
                vsids.bump(Var::from_index(i));
            }
        }

        for i in (0..8).rev() {
            assert_eq!(vsids.pop_best(), Some(Var::from_index(i)));
        }
        assert_eq!(vsids.pop_best(), None);
    }

    #[test]
    fn make_available_reinserts_popped_variable() {
        let mut vsids = Vsids::default();
        vsids.set_var_count(2);
        let v = vsids.pop_best().unwrap();
        assert!(!vsids.is_available(v));
        vsids.make_available(v);
        assert!(vsids.is_available(v));
    }

    #[test]
    fn pop_random_drains_every_variable_exactly_once() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut vsids = Vsids::default();
        vsids.set_var_count(6);

        let mut seen = Vec::new();
        while let Some(var) = vsids.pop_random(&mut rng) {
            seen.push(var);
        }
        seen.sort();
        let expected: Vec<_> = (0..6).map(Var::from_index).collect();
        assert_eq!(seen, expected);
    }
}

//! Extracting a satisfying assignment once the search reports SAT.

use satformula::Var;

use crate::variables::Variables;

/// A complete satisfying assignment, indexed by internal variable.
#[derive(Debug, Clone)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    pub(crate) fn extract(variables: &Variables) -> Model {
        let values = (0..variables.var_count())
            .map(|index| {
                variables
                    .value_of(Var::from_index(index))
                    .expect("model requested before every variable was assigned")
            })
            .collect();
        Model { values }
    }

    /// The value assigned to a variable.
    pub fn value(&self, var: Var) -> bool {
        self.values[var.index()]
    }

    /// Number of variables in the model.
    pub fn var_count(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Var, bool)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(index, &value)| (Var::from_index(index), value))
    }
}

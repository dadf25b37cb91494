//! CNF formulas.
use std::cmp::max;
use std::fmt;
use std::iter::Extend;
use std::ops::Range;

use crate::lit::Lit;

/// A formula in conjunctive normal form (CNF).
///
/// Equivalent to `Vec<Vec<Lit>>` but more efficient, as it uses a single buffer for all
/// literals.
#[derive(Default, Eq)]
pub struct CnfFormula {
    var_count: usize,
    literals: Vec<Lit>,
    clause_ranges: Vec<Range<usize>>,
}

impl CnfFormula {
    /// Create an empty CNF formula.
    pub fn new() -> CnfFormula {
        CnfFormula::default()
    }

    /// Number of variables in the formula.
    ///
    /// This also counts missing variables if a variable with a higher index is present. A
    /// vector of this length can be indexed with the variable indices present.
    pub fn var_count(&self) -> usize {
        self.var_count
    }

    /// Increase the number of variables in the formula.
    ///
    /// If the parameter is less than the current variable count, do nothing.
    pub fn set_var_count(&mut self, count: usize) {
        self.var_count = max(self.var_count, count)
    }

    /// Number of clauses in the formula.
    pub fn len(&self) -> usize {
        self.clause_ranges.len()
    }

    /// Whether the formula has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clause_ranges.is_empty()
    }

    /// Appends a clause to the formula.
    ///
    /// `literals` can be an `IntoIterator<Item = Lit>` or `IntoIterator<Item = &Lit>`.
    pub fn add_clause<L>(&mut self, literals: impl IntoIterator<Item = L>)
    where
        Vec<Lit>: Extend<L>,
    {
        let begin = self.literals.len();
        self.literals.extend(literals);
        let end = self.literals.len();

        for &lit in self.literals[begin..end].iter() {
            self.var_count = max(lit.index() + 1, self.var_count);
        }

        self.clause_ranges.push(begin..end);
    }

    /// Iterator over all clauses.
    pub fn iter(&self) -> impl Iterator<Item = &[Lit]> {
        let literals = &self.literals;
        self.clause_ranges
            .iter()
            .map(move |range| &literals[range.clone()])
    }
}

/// Convert any iterable of `Lit` iterables into a `CnfFormula`.
impl<F, I, L> From<F> for CnfFormula
where
    F: IntoIterator<Item = I>,
    I: IntoIterator<Item = L>,
    Vec<Lit>: Extend<L>,
{
    fn from(formula: F) -> CnfFormula {
        let mut cnf_formula = CnfFormula::new();
        for clause in formula {
            cnf_formula.add_clause(clause);
        }
        cnf_formula
    }
}

impl fmt::Debug for CnfFormula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.var_count(), f)?;
        f.debug_list().entries(self.iter()).finish()
    }
}

impl PartialEq for CnfFormula {
    fn eq(&self, other: &CnfFormula) -> bool {
        self.var_count() == other.var_count()
            && self.clause_ranges.len() == other.clause_ranges.len()
            && self
                .clause_ranges
                .iter()
                .zip(other.clause_ranges.iter())
                .all(|(range_a, range_b)| {
                    self.literals[range_a.clone()] == other.literals[range_b.clone()]
                })
    }
}

#[cfg(any(test, feature = "proptest-strategies"))]
#[doc(hidden)]
pub mod strategy {
    use proptest::{prelude::*, *};

    use rand::distributions::Bernoulli;
    use rand::seq::SliceRandom;

    use super::CnfFormula;
    use crate::lit::Lit;

    /// Generate small hard unsat instances.
    ///
    /// Implementation of http://www.cs.qub.ac.uk/~i.spence/sgen/ but with random partitions
    pub fn sgen_unsat_formula(
        blocks: impl Strategy<Value = usize>,
    ) -> impl Strategy<Value = CnfFormula> {
        blocks.prop_flat_map(|blocks| {
            collection::vec(bool::ANY, blocks * 4 + 1).prop_perturb(|polarity, mut rng| {
                let mut clauses: Vec<Vec<Lit>> = vec![];
                let mut lits = polarity
                    .into_iter()
                    .enumerate()
                    .map(|(index, polarity)| Lit::from_index(index, polarity))
                    .collect::<Vec<_>>();

                for &invert in [false, true].iter() {
                    lits.shuffle(&mut rng);
                    for block in lits.chunks_exact(4) {
                        for a in 0..4 {
                            for b in 0..a {
                                for c in 0..b {
                                    let mut clause =
                                        vec![block[a] ^ invert, block[b] ^ invert, block[c] ^ invert];
                                    clause.shuffle(&mut rng);
                                    clauses.push(clause);
                                }
                            }
                        }
                    }
                    let &lit_a = lits.last().unwrap();
                    for b in 0..4 {
                        for c in 0..b {
                            let mut clause = vec![lit_a ^ invert, lits[b] ^ invert, lits[c] ^ invert];
                            clause.shuffle(&mut rng);
                            clauses.push(clause);
                        }
                    }
                }

                clauses.shuffle(&mut rng);
                CnfFormula::from(clauses)
            })
        })
    }

    /// Generate a sat instance.
    ///
    /// This generates a random full assignment and then only generates clauses compatible with
    /// that assignment.
    pub fn sat_formula(
        vars: impl Strategy<Value = usize>,
        clause_count: impl Strategy<Value = usize>,
        density: impl Strategy<Value = f64>,
        polarity_dist: impl Strategy<Value = f64>,
    ) -> impl Strategy<Value = CnfFormula> {
        (vars, clause_count, density, polarity_dist).prop_flat_map(
            |(vars, clause_count, density, polarity_dist)| {
                let density = Bernoulli::new(density);
                let polarity_dist = Bernoulli::new(polarity_dist);

                collection::vec(bool::ANY, vars).prop_perturb(move |polarity, mut rng| {
                    let mut clauses: Vec<Vec<Lit>> = vec![];
                    let lits = polarity
                        .into_iter()
                        .enumerate()
                        .map(|(index, polarity)| Lit::from_index(index, polarity))
                        .collect::<Vec<_>>();

                    for _ in 0..clause_count {
                        let &fixed_lit = lits.choose(&mut rng).unwrap();
                        let mut clause = vec![fixed_lit];
                        for &lit in lits.iter() {
                            if lit != fixed_lit && rng.sample(density) {
                                clause.push(lit ^ rng.sample(polarity_dist));
                            }
                        }
                        clause.shuffle(&mut rng);
                        clauses.push(clause);
                    }

                    clauses.shuffle(&mut rng);
                    CnfFormula::from(clauses)
                })
            },
        )
    }
}

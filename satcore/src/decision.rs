//! Decision heuristics.

pub mod vsids;

use rand::Rng;
use satformula::{Lit, Var};

use self::vsids::Vsids;
use crate::config::SolverConfig;
use crate::variables::{Antecedent, Variables};
use crate::propagate::enqueue_assignment;
use crate::trail::Trail;

/// Pick the next decision variable, assign it, open a new decision level and enqueue the
/// resulting literal. Returns `false` (making no decision) if every variable is already assigned.
pub fn make_decision(
    config: &SolverConfig,
    vsids: &mut Vsids,
    rng: &mut impl Rng,
    variables: &mut Variables,
    trail: &mut Trail,
) -> bool {
    let var = if config.use_vsids {
        vsids.pop_best()
    } else {
        vsids.pop_random(rng)
    };

    let var = match var {
        Some(var) => var,
        None => return false,
    };

    let polarity = choose_polarity(config, variables, rng, var);
    let lit = Lit::from_var(var, polarity);

    trail.new_decision_level();
    enqueue_assignment(
        variables,
        trail,
        vsids,
        lit,
        trail.current_level(),
        Antecedent::Decision,
    );

    true
}

fn choose_polarity(
    config: &SolverConfig,
    variables: &Variables,
    rng: &mut impl Rng,
    var: Var,
) -> bool {
    if config.use_vsids {
        variables.last_polarity(var)
    } else {
        rng.gen()
    }
}

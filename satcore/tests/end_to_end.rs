//! End-to-end solver scenarios, exercised against every feature-flag combination the command
//! line front end exposes.

use satcore::{SatState, Solver, SolverConfig};
use satformula::{CnfFormula, Lit};

fn l(n: isize) -> Lit {
    Lit::from_dimacs(n)
}

fn all_configs() -> Vec<SolverConfig> {
    let mut configs = vec![];
    for use_vsids in [false, true] {
        for use_restarts in [false, true] {
            for use_learning in [false, true] {
                for use_deletion in [false, true] {
                    for use_minimization in [false, true] {
                        configs.push(SolverConfig {
                            use_vsids,
                            use_restarts,
                            use_learning,
                            use_deletion,
                            use_minimization,
                            ..SolverConfig::default()
                        });
                    }
                }
            }
        }
    }
    configs
}

fn assert_model_satisfies(solver: &Solver, formula: &CnfFormula) {
    let model = solver.model().expect("model present after SAT result");
    for clause in formula.iter() {
        assert!(
            clause.iter().any(|&lit| model.value(lit.var()) == lit.is_positive()),
            "clause {:?} not satisfied by model",
            clause
        );
    }
}

#[test]
fn trivial_sat_under_every_feature_combination() {
    for config in all_configs() {
        let mut formula = CnfFormula::new();
        formula.add_clause(vec![l(1), l(2)]);
        formula.add_clause(vec![l(-1), l(2)]);

        let mut solver = Solver::new(config);
        solver.add_formula(&formula);
        assert_eq!(solver.solve(), SatState::Sat);
        assert_model_satisfies(&solver, &formula);
    }
}

#[test]
fn trivial_unsat_under_every_feature_combination() {
    for config in all_configs() {
        let mut formula = CnfFormula::new();
        formula.add_clause(vec![l(1)]);
        formula.add_clause(vec![l(-1)]);

        let mut solver = Solver::new(config);
        solver.enable_proof_logging();
        solver.add_formula(&formula);
        assert_eq!(solver.solve(), SatState::Unsat);
    }
}

#[test]
fn three_clause_sat_example() {
    // (x1 | x2 | x3) & (-x1 | x2) & (-x2 | x3)
    let mut formula = CnfFormula::new();
    formula.add_clause(vec![l(1), l(2), l(3)]);
    formula.add_clause(vec![l(-1), l(2)]);
    formula.add_clause(vec![l(-2), l(3)]);

    for config in all_configs() {
        let mut solver = Solver::new(config);
        solver.add_formula(&formula);
        assert_eq!(solver.solve(), SatState::Sat);
        assert_model_satisfies(&solver, &formula);
    }
}

/// Pigeonhole principle: 5 pigeons into 4 holes, unsatisfiable. Variable `p * 4 + h` means
/// "pigeon `p` sits in hole `h`" (0-based, 20 variables).
fn pigeon_hole(pigeons: usize, holes: usize) -> CnfFormula {
    let mut formula = CnfFormula::new();
    let var = |p: usize, h: usize| Lit::from_index(p * holes + h, true);

    for p in 0..pigeons {
        formula.add_clause((0..holes).map(|h| var(p, h)));
    }

    for h in 0..holes {
        for p1 in 0..pigeons {
            for p2 in (p1 + 1)..pigeons {
                formula.add_clause(vec![!var(p1, h), !var(p2, h)]);
            }
        }
    }

    formula
}

#[test]
fn pigeon_hole_five_into_four_is_unsat() {
    let formula = pigeon_hole(5, 4);
    assert_eq!(formula.var_count(), 20);

    for config in all_configs() {
        let mut solver = Solver::new(config);
        solver.enable_proof_logging();
        solver.add_formula(&formula);
        assert_eq!(solver.solve(), SatState::Unsat);
    }
}

#[test]
fn five_clause_unit_chain_resolves_without_conflict() {
    let mut formula = CnfFormula::new();
    formula.add_clause(vec![l(1)]);
    formula.add_clause(vec![l(-1), l(2)]);
    formula.add_clause(vec![l(-2), l(3)]);
    formula.add_clause(vec![l(-3), l(4)]);
    formula.add_clause(vec![l(-4), l(-5)]);

    let mut solver = Solver::new(SolverConfig::default());
    solver.add_formula(&formula);
    assert_eq!(solver.solve(), SatState::Sat);

    let model = solver.model().unwrap();
    for v in 1..=4 {
        assert!(model.value(l(v).var()));
    }
    assert!(!model.value(l(5).var()));

    let stats = solver.statistics();
    assert!(stats.unit_propagations >= 4);
    assert!(stats.decisions <= 1);
}

/// Same `CnfFormula` and `SolverConfig` must produce identical statistics: nothing in the
/// search may depend on external randomness beyond the seeded PRNG.
#[test]
fn search_is_deterministic_given_the_same_seed() {
    let mut formula = CnfFormula::new();
    formula.add_clause(vec![l(1), l(2), l(3), l(4)]);
    formula.add_clause(vec![l(-1), l(2)]);
    formula.add_clause(vec![l(-2), l(3)]);
    formula.add_clause(vec![l(-3), l(-4)]);
    formula.add_clause(vec![l(1), l(-3)]);
    formula.add_clause(vec![l(-1), l(-2), l(4)]);

    for config in all_configs() {
        let mut first = Solver::new(config.clone());
        first.add_formula(&formula);
        let first_result = first.solve();

        let mut second = Solver::new(config);
        second.add_formula(&formula);
        let second_result = second.solve();

        assert_eq!(first_result, second_result);
        assert_eq!(first.statistics(), second.statistics());
    }
}

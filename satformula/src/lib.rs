//! Literal, variable and CNF formula types shared by the parser, the solver core and the
//! command line front end.

pub mod cnf;
pub mod lit;

pub use cnf::CnfFormula;
pub use lit::{Lit, LitIdx, Var};

//! Accumulates a DRAT proof of unsatisfiability.
//!
//! Steps are buffered in memory for the whole search and only serialized once the search
//! terminates UNSAT, so no I/O happens on the hot path.

pub mod drat;

use std::io::{self, Write};

use satformula::Lit;

use self::drat::{write_proof, ProofStep};

#[derive(Default)]
pub struct Proof {
    enabled: bool,
    steps: Vec<ProofStep>,
}

impl Proof {
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn add_clause(&mut self, lits: &[Lit]) {
        if self.enabled {
            self.steps.push(ProofStep::Addition(lits.to_vec()));
        }
    }

    pub fn delete_clause(&mut self, lits: &[Lit]) {
        if self.enabled {
            self.steps.push(ProofStep::Deletion(lits.to_vec()));
        }
    }

    pub fn write(&self, target: &mut impl Write) -> io::Result<()> {
        write_proof(target, &self.steps)
    }
}

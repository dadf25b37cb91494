//! DRAT proof serialization.
//!
//! DRAT (Deletion Resolution Asymmetric Tautology) proofs are a sequence of clause additions and
//! deletions. A checker can replay them to certify an UNSAT result without trusting the solver. We
//! only emit the textual format: one line per step, `d` prefixing deletions, literals terminated
//! by a trailing `0`.

use std::io::{self, Write};

use satformula::Lit;

/// A single step of a DRAT proof.
#[derive(Debug, Clone)]
pub enum ProofStep {
    /// A clause was learned (or is an original clause being re-asserted after deletion).
    Addition(Vec<Lit>),
    /// A clause is no longer needed and may be forgotten by the checker.
    Deletion(Vec<Lit>),
}

/// Write a full proof in DRAT text format.
pub fn write_proof(target: &mut impl Write, steps: &[ProofStep]) -> io::Result<()> {
    for step in steps {
        match step {
            ProofStep::Addition(lits) => write_clause(target, lits, false)?,
            ProofStep::Deletion(lits) => write_clause(target, lits, true)?,
        }
    }
    Ok(())
}

fn write_clause(target: &mut impl Write, lits: &[Lit], deletion: bool) -> io::Result<()> {
    if deletion {
        write!(target, "d ")?;
    }
    for &lit in lits {
        itoa::write(&mut *target, lit.to_dimacs())?;
        write!(target, " ")?;
    }
    writeln!(target, "0")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l(n: isize) -> Lit {
        Lit::from_dimacs(n)
    }

    #[test]
    fn formats_additions_and_deletions() {
        let steps = vec![
            ProofStep::Addition(vec![l(1), l(-2)]),
            ProofStep::Deletion(vec![l(1), l(-2)]),
            ProofStep::Addition(vec![]),
        ];
        let mut out = Vec::new();
        write_proof(&mut out, &steps).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1 -2 0\nd 1 -2 0\n0\n");
    }
}

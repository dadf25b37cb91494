//! DIMACS CNF parser and writer for the satcore SAT solver.
//!
//! This is deliberately the least elaborate crate in the workspace: it exists so the command
//! line front end has something to call, not because its own design is the point of the
//! exercise. It renumbers whatever variables it encounters into a contiguous `1..n'` range in
//! first-occurrence order and remembers the mapping so callers can translate a solver's
//! internal assignment back into the caller's original numbering.

use std::io::{self, BufRead, Write};

use rustc_hash::FxHashMap;
use thiserror::Error;

use satformula::{CnfFormula, Lit, Var};

/// Errors produced while parsing a DIMACS CNF file.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("line {line}: invalid literal token '{token}'")]
    InvalidToken { line: usize, token: String },
    #[error("line {line}: invalid header syntax: '{header}'")]
    InvalidHeader { line: usize, header: String },
    #[error("line {line}: clause is not terminated by a trailing 0")]
    UnterminatedClause { line: usize },
    #[error("formula has {var_count} variables but the header declares {header_var_count}")]
    VarCount {
        var_count: usize,
        header_var_count: usize,
    },
    #[error("formula has {clause_count} clauses but the header declares {header_clause_count}")]
    ClauseCount {
        clause_count: usize,
        header_clause_count: usize,
    },
    #[error("I/O error while reading DIMACS input")]
    Io(#[from] io::Error),
}

/// Variable and clause counts declared by a DIMACS `p cnf` header line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DimacsHeader {
    pub var_count: usize,
    pub clause_count: usize,
}

/// Maps between a caller's original (possibly sparse) DIMACS variable numbers and the
/// contiguous `1..n'` numbering the solver works with internally.
///
/// Variables are assigned internal indices in the order they are first seen.
#[derive(Default, Debug, Clone)]
pub struct VarRenumbering {
    to_internal: FxHashMap<i64, Var>,
    to_original: Vec<i64>,
}

impl VarRenumbering {
    /// Look up (or allocate) the internal variable for an original 1-based DIMACS number.
    fn intern(&mut self, original: i64) -> Var {
        if let Some(&var) = self.to_internal.get(&original) {
            return var;
        }
        let var = Var::from_index(self.to_original.len());
        self.to_original.push(original);
        self.to_internal.insert(original, var);
        var
    }

    /// The original DIMACS number for an internal variable, or its 1-based internal index if
    /// the variable was never seen by the parser (e.g. it only appears in a learned clause).
    pub fn original_of(&self, var: Var) -> isize {
        self.to_original
            .get(var.index())
            .copied()
            .unwrap_or_else(|| var.to_dimacs() as i64) as isize
    }

    /// The internal variable for an original DIMACS number, if it was ever parsed.
    pub fn internal_of(&self, original: isize) -> Option<Var> {
        self.to_internal.get(&(original as i64)).copied()
    }

    /// Number of distinct variables renumbered so far.
    pub fn len(&self) -> usize {
        self.to_original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_original.is_empty()
    }
}

/// Parse a complete DIMACS CNF document.
///
/// Comment lines start with `c`, the optional header line starts with `p cnf <vars> <clauses>`,
/// and every other non-blank line lists space-separated nonzero integer literals terminated by
/// a literal `0`. Tautological clauses (containing both `x` and `-x`) are dropped.
pub fn parse(input: impl io::Read) -> Result<(CnfFormula, VarRenumbering), ParserError> {
    let reader = io::BufReader::new(input);
    let mut formula = CnfFormula::new();
    let mut renumbering = VarRenumbering::default();
    let mut header = None;
    let mut clause_count = 0usize;

    let mut partial_clause: Vec<Lit> = Vec::new();

    for (line_index, line) in reader.lines().enumerate() {
        let line_number = line_index + 1;
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('c') {
            continue;
        }

        if trimmed.starts_with('p') {
            header = Some(parse_header(trimmed, line_number)?);
            continue;
        }

        partial_clause.clear();
        let mut tautological = false;

        for token in trimmed.split_whitespace() {
            let value: i64 = token.parse().map_err(|_| ParserError::InvalidToken {
                line: line_number,
                token: token.to_string(),
            })?;

            if value == 0 {
                if !tautological {
                    formula.add_clause(partial_clause.iter().copied());
                    clause_count += 1;
                }
                partial_clause.clear();
                break;
            }

            let var = renumbering.intern(value.abs());
            let lit = var.lit(value > 0);

            if partial_clause.iter().any(|&seen| seen == !lit) {
                tautological = true;
            }
            if !partial_clause.contains(&lit) {
                partial_clause.push(lit);
            }
        }

        if !partial_clause.is_empty() {
            return Err(ParserError::UnterminatedClause { line: line_number });
        }
    }

    if let Some(header) = header {
        formula.set_var_count(header.var_count.max(renumbering.len()));
        if renumbering.len() > header.var_count {
            return Err(ParserError::VarCount {
                var_count: renumbering.len(),
                header_var_count: header.var_count,
            });
        }
        if clause_count != header.clause_count {
            return Err(ParserError::ClauseCount {
                clause_count,
                header_clause_count: header.clause_count,
            });
        }
    } else {
        formula.set_var_count(renumbering.len());
    }

    Ok((formula, renumbering))
}

fn parse_header(line: &str, line_number: usize) -> Result<DimacsHeader, ParserError> {
    let invalid = || ParserError::InvalidHeader {
        line: line_number,
        header: line.to_string(),
    };

    let mut fields = line.split_whitespace();
    if fields.next() != Some("p") {
        return Err(invalid());
    }
    if fields.next() != Some("cnf") {
        return Err(invalid());
    }
    let var_count: usize = fields.next().and_then(|v| v.parse().ok()).ok_or_else(invalid)?;
    let clause_count: usize = fields.next().and_then(|v| v.parse().ok()).ok_or_else(invalid)?;
    if fields.next().is_some() {
        return Err(invalid());
    }

    Ok(DimacsHeader {
        var_count,
        clause_count,
    })
}

/// Write a formula as DIMACS CNF, using the caller's original numbering where known.
pub fn write_dimacs(
    target: &mut impl Write,
    formula: &CnfFormula,
    renumbering: &VarRenumbering,
) -> io::Result<()> {
    writeln!(target, "p cnf {} {}", formula.var_count(), formula.len())?;
    for clause in formula.iter() {
        for &lit in clause {
            let original = renumbering.original_of(lit.var());
            let signed = if lit.is_negative() { -original } else { original };
            itoa::write(&mut *target, signed)?;
            write!(target, " ")?;
        }
        writeln!(target, "0")?;
    }
    Ok(())
}

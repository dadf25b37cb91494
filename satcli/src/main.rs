use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::fmt::Formatter;
use log::{info, Level, LevelFilter, Record};

use satcore::{SatState, Solver, SolverConfig, Statistics};
use satdimacs::VarRenumbering;

/// A CDCL based SAT solver.
#[derive(Parser, Debug)]
#[command(name = "satcli", version)]
struct Args {
    /// DIMACS CNF file to read.
    #[arg(long, default_value = "input.cnf")]
    input: PathBuf,

    /// Use VSIDS for decisions instead of uniformly random choices.
    #[arg(long)]
    vsids: bool,

    /// Trigger Luby-scheduled restarts.
    #[arg(long)]
    restarts: bool,

    /// Learn a clause from every conflict via 1-UIP analysis.
    #[arg(long)]
    learn: bool,

    /// Delete high-LBD learned clauses at restart boundaries.
    #[arg(long)]
    delete: bool,

    /// Apply single-pass self-subsuming minimization to learned clauses.
    #[arg(long)]
    minimize: bool,

    /// Raise the log verbosity. `RUST_LOG`/`SATCORE_LOG` still take precedence.
    #[arg(short, long)]
    verbose: bool,

    /// Seed for the PRNG backing random decisions.
    #[arg(long, default_value_t = 0xc0ffee)]
    seed: u64,

    /// Where to write the DRAT proof on UNSAT.
    #[arg(long, default_value = "unsat.drat")]
    proof: PathBuf,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    banner();

    let exit_code = match run(&args) {
        Ok(code) => code,
        Err(err) => {
            log::error!("{:#}", err);
            1
        }
    };
    std::process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let format = |buf: &mut Formatter, record: &Record| {
        if record.level() == Level::Info {
            writeln!(buf, "c {}", record.args())
        } else {
            writeln!(buf, "c {}: {}", record.level(), record.args())
        }
    };

    let default_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    let mut builder = env_logger::Builder::new();
    builder.format(format).filter(None, default_level);

    if let Ok(env_var) = std::env::var("SATCORE_LOG") {
        builder.parse_filters(&env_var);
    } else if let Ok(env_var) = std::env::var("RUST_LOG") {
        builder.parse_filters(&env_var);
    }

    builder.init();
}

fn banner() {
    info!("This is satcli {}", env!("CARGO_PKG_VERSION"));
}

fn config_from_args(args: &Args) -> SolverConfig {
    SolverConfig {
        use_vsids: args.vsids,
        use_restarts: args.restarts,
        use_learning: args.learn,
        use_deletion: args.delete,
        use_minimization: args.minimize,
        random_seed: args.seed,
        ..SolverConfig::default()
    }
}

fn run(args: &Args) -> Result<i32> {
    let start = Instant::now();

    let file = File::open(&args.input)
        .with_context(|| format!("failed to open input file '{}'", args.input.display()))?;
    info!("reading '{}'", args.input.display());

    let (formula, renumbering) =
        satdimacs::parse(file).with_context(|| format!("failed to parse '{}'", args.input.display()))?;
    info!(
        "parsed formula with {} variables and {} clauses",
        formula.var_count(),
        formula.len()
    );

    let mut solver = Solver::new(config_from_args(args));
    solver.enable_proof_logging();
    solver.add_formula(&formula);

    match solver.solve() {
        SatState::Sat => {
            println!("s SATISFIABLE");
            print_assignment(&solver, &renumbering);
            print_statistics(solver.statistics(), start);
            Ok(10)
        }
        SatState::Unsat => {
            println!("s UNSATISFIABLE");
            print_statistics(solver.statistics(), start);
            write_proof(&solver, &args.proof)?;
            Ok(20)
        }
        SatState::Unknown => {
            println!("s UNKNOWN");
            print_statistics(solver.statistics(), start);
            Ok(0)
        }
    }
}

fn print_assignment(solver: &Solver, renumbering: &VarRenumbering) {
    let model = solver.model().expect("model present after SAT result");
    print!("v");
    for (var, value) in model.iter() {
        let original = renumbering.original_of(var);
        let signed = if value { original } else { -original };
        print!(" {}", signed);
    }
    println!(" 0");
}

fn write_proof(solver: &Solver, path: &std::path::Path) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create proof file '{}'", path.display()))?;
    solver
        .write_proof(&mut file)
        .with_context(|| format!("failed to write proof file '{}'", path.display()))
}

fn print_statistics(stats: &Statistics, start: Instant) {
    println!("c time: {:.3}s", start.elapsed().as_secs_f64());
    println!("c peak RSS: {} MB", peak_rss_mb());
    println!("c unit propagations: {}", stats.unit_propagations);
    println!("c decisions: {}", stats.decisions);
    println!("c conflicts: {}", stats.conflicts);
    println!("c restarts: {}", stats.restarts);
    println!("c learned clauses: {}", stats.learned_clauses);
    println!("c deleted clauses: {}", stats.deleted_clauses);
    println!("c minimizations: {}", stats.minimizations);
    println!("c max learned clause length: {}", stats.max_learned_clause_len);
}

/// Peak resident set size in megabytes, read from `/proc/self/status`. Returns `0` on platforms
/// without procfs, or if the field cannot be found.
fn peak_rss_mb() -> u64 {
    read_peak_rss_kb().map(|kb| kb / 1024).unwrap_or(0)
}

fn read_peak_rss_kb() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmHWM:") {
            return rest.trim().split_whitespace().next()?.parse().ok();
        }
    }
    None
}


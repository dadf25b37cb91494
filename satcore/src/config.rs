//! Solver configuration.

/// Configurable parameters and feature toggles used during solving.
///
/// The five `use_*` flags are independent; any subset may be enabled. With all of them off the
/// solver degrades to chronological backtracking with uniformly random decisions and no learning.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Use VSIDS for decisions instead of a uniformly random unassigned variable.
    pub use_vsids: bool,
    /// Trigger Luby-scheduled restarts.
    pub use_restarts: bool,
    /// Learn a clause from every conflict via 1-UIP analysis instead of plain chronological
    /// backtracking to the conflicting decision.
    pub use_learning: bool,
    /// Delete high-LBD learned clauses at restart boundaries.
    pub use_deletion: bool,
    /// Apply single-pass self-subsuming minimization to learned clauses.
    pub use_minimization: bool,

    /// Initial VSIDS bump value (`b_0`).
    pub vsids_initial_bump: f32,
    /// Growth factor applied to the bump once per conflict (`c`). Must be greater than 1.
    pub vsids_bump_factor: f32,
    /// Activities and the bump are rescaled down once the bump reaches this threshold.
    pub vsids_rescale_threshold: f32,
    /// Scale factor for the Luby restart sequence: a restart is triggered every
    /// `luby_scale * luby.advance()` conflicts.
    pub luby_scale: u64,
    /// Initial LBD limit: learned clauses at or below it survive a deletion pass.
    pub lbd_limit_initial: u32,
    /// Factor the LBD limit grows by after each deletion pass.
    pub lbd_growth: f64,
    /// Seed for the PRNG backing the random decision heuristic.
    pub random_seed: u64,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            use_vsids: true,
            use_restarts: true,
            use_learning: true,
            use_deletion: true,
            use_minimization: true,
            vsids_initial_bump: 2.0,
            vsids_bump_factor: 1.05,
            vsids_rescale_threshold: 1e30,
            luby_scale: 100,
            lbd_limit_initial: 10,
            lbd_growth: 1.1,
            random_seed: 0xc0ffee,
        }
    }
}

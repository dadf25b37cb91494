//! Top level search status.

/// Current status of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatState {
    /// Search is still in progress.
    Unknown,
    /// A satisfying assignment has been found.
    Sat,
    /// The formula has been refuted.
    Unsat,
}

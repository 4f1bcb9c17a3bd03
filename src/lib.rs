// # Treespec: A Judge for the Tree Speculation Problem
//
// A hidden labeled tree is known to Alice only through its preorder. Alice
// compresses it into a small intermediate tree; Bob then reconstructs the
// original edge set using adjacency queries plus a short walk on Alice's tree.
//
// This crate contains the judging engine that mediates that interaction:
// ground truth loading, the query oracle, the intermediate-tree registry,
// the exploration engine, per-run sessions, verification and scoring.
// Participants may run in-process (see `participant`) or as child processes
// speaking newline-delimited JSON (see `protocol` and `process`).

/// Hard ceiling on the size of Alice's tree. Anything outside `[1, K_HARD_LIMIT]` is a protocol error.
pub const K_HARD_LIMIT: usize = 10000;
/// Advertised bound on the size of Alice's tree. Only affects the score.
pub const K_SOFT_LIMIT: usize = 150;
/// Hard ceiling on queries per run. Query number `QUERY_HARD_LIMIT + 1` is a protocol error.
pub const QUERY_HARD_LIMIT: usize = 5000;
/// Advertised query budget per run. Only affects the score.
pub const QUERY_SOFT_LIMIT: usize = 400;
/// Maximum number of moves after `explore`.
pub const MOVE_LIMIT: usize = 5;
/// Seed used to pick the starting node when none is requested.
pub const DEFAULT_SEED: u64 = 42;

/// A trait for conveniently updating a value to its minimum or maximum.
pub trait SetMinMax {
    /// If `v` is less than `self`, updates `self` to `v` and returns `true`.
    /// Otherwise, returns `false`.
    fn setmin(&mut self, v: Self) -> bool;
    /// If `v` is greater than `self`, updates `self` to `v` and returns `true`.
    /// Otherwise, returns `false`.
    fn setmax(&mut self, v: Self) -> bool;
}
impl<T> SetMinMax for T
where
    T: PartialOrd,
{
    fn setmin(&mut self, v: T) -> bool {
        *self > v && {
            *self = v;
            true
        }
    }
    fn setmax(&mut self, v: T) -> bool {
        *self < v && {
            *self = v;
            true
        }
    }
}

/// An undirected edge as submitted by a participant. Orientation is not significant.
pub type Edge = (usize, usize);

/// Protocol errors raised by the judge.
pub mod error;

/// The original tree (ground truth) and its text format.
pub mod problem;

/// Alice's intermediate tree and the registry that accepts it exactly once.
pub mod registry;

/// Adjacency queries against the original tree.
pub mod oracle;

/// Bob's walk over the intermediate tree.
pub mod explore;

/// Per-run state for Bob: counters, exploration cursor and the submitted answer.
pub mod session;

/// Participant-facing traits and the reference participants.
pub mod participant;

/// Request/response messages for out-of-process participants.
pub mod protocol;

/// Participants running as child processes.
pub mod process;

/// Answer verification.
pub mod verify;

/// Scoring and verdicts.
pub mod score;

/// The protocol coordinator.
pub mod judge;

/// Test-case generation.
pub mod treegen {
    /// Generators for the named tree shapes.
    pub mod shapes;
}

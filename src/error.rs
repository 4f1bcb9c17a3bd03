use thiserror::Error;

/// A violation of the interaction contract.
///
/// Every variant is fatal to the whole judging run. Registries and sessions
/// remember the first error they raised and keep returning it, so a
/// participant cannot recover from one by ignoring the `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("setTree() called more than once")]
    DuplicateSubmission,
    #[error("K={k} out of range [1, {max}]")]
    SizeOutOfRange { k: usize, max: usize },
    #[error("{got} edges for K={k} (expected {expected})")]
    EdgeCountMismatch {
        k: usize,
        got: usize,
        expected: usize,
    },
    #[error("edge ({u},{v}) has label outside [1,{k}]")]
    LabelOutOfRange { u: usize, v: usize, k: usize },
    #[error("intermediate tree is not connected ({reachable}/{k} reachable)")]
    Disconnected { reachable: usize, k: usize },
    #[error("exceeded {limit} queries (query #{query})")]
    QueryBudgetExceeded { query: usize, limit: usize },
    #[error("A and B not disjoint (element {label})")]
    NonDisjointSets { label: usize },
    #[error("explore() called more than once")]
    DoubleExplore,
    #[error("move() called before explore()")]
    MoveBeforeExplore,
    #[error("exceeded {limit} moves (move #{mv})")]
    MoveBudgetExceeded { mv: usize, limit: usize },
    #[error("{target} is not a neighbor of {current}")]
    NotAdjacent { target: usize, current: usize },
    #[error("ask() called after explore()")]
    AskAfterExplore,
    #[error("answer() called more than once")]
    DuplicateAnswer,
    #[error("{op}() called after answer()")]
    CallAfterAnswer { op: &'static str },
    #[error("Alice did not call setTree()")]
    NoTreeSubmitted,
    #[error("Bob did not call answer()")]
    NoAnswerSubmitted,
    #[error("{op} is not allowed in the {phase} phase")]
    WrongPhase {
        op: &'static str,
        phase: &'static str,
    },
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("judge reported: {0}")]
    Remote(String),
}

impl ProtocolError {
    /// Records `err` into `slot` unless an earlier error is already there,
    /// and returns the error that should be reported.
    pub(crate) fn poison(slot: &mut Option<ProtocolError>, err: ProtocolError) -> ProtocolError {
        slot.get_or_insert(err).clone()
    }
}

use crate::Edge;
use crate::problem::{Problem, normalize};

/// How a single run ended, from the verifier's point of view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Accepted,
    /// Bob returned without calling `answer`.
    NoAnswer,
    WrongEdgeCount { got: usize, expected: usize },
    /// Edge counts match but the sets differ. Edges are normalized to `(min, max)`.
    WrongAnswer { missing: Vec<Edge>, extra: Vec<Edge> },
}

impl RunOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RunOutcome::Accepted)
    }
}

/// Compares Bob's answer to the original edge set, ignoring order and orientation.
pub fn check_answer(problem: &Problem, answer: &[Edge]) -> RunOutcome {
    let expected = problem.num_nodes().saturating_sub(1);
    if answer.len() != expected {
        return RunOutcome::WrongEdgeCount {
            got: answer.len(),
            expected,
        };
    }
    let truth = problem.edge_set();
    let given = normalize(answer);
    if truth == given {
        RunOutcome::Accepted
    } else {
        RunOutcome::WrongAnswer {
            missing: truth.difference(&given).copied().collect(),
            extra: given.difference(&truth).copied().collect(),
        }
    }
}

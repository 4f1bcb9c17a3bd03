use crate::MOVE_LIMIT;
use crate::error::ProtocolError;
use crate::registry::IntermediateTree;
use serde::{Deserialize, Serialize};

/// What Bob sees at the cursor: the current node and its neighbors, ascending.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub node: usize,
    pub neighbors: Vec<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    NotStarted,
    Active { cursor: usize },
}

/// A token walk over Alice's tree.
///
/// Call ordering relative to queries is the session's business, not this type's.
pub struct Explorer<'a> {
    tree: &'a IntermediateTree,
    state: State,
    moves: usize,
}

impl<'a> Explorer<'a> {
    pub fn new(tree: &'a IntermediateTree) -> Self {
        Self {
            tree,
            state: State::NotStarted,
            moves: 0,
        }
    }

    pub fn is_started(&self) -> bool {
        self.state != State::NotStarted
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn cursor(&self) -> Option<usize> {
        match self.state {
            State::NotStarted => None,
            State::Active { cursor } => Some(cursor),
        }
    }

    pub fn start(&mut self, at: usize) -> Result<View, ProtocolError> {
        if self.is_started() {
            return Err(ProtocolError::DoubleExplore);
        }
        self.state = State::Active { cursor: at };
        let view = self.view(at);
        log::debug!("  explore() -> node={} deg={}", at, view.neighbors.len());
        Ok(view)
    }

    pub fn move_to(&mut self, target: usize) -> Result<View, ProtocolError> {
        let State::Active { cursor } = self.state else {
            return Err(ProtocolError::MoveBeforeExplore);
        };
        self.moves += 1;
        if self.moves > MOVE_LIMIT {
            return Err(ProtocolError::MoveBudgetExceeded {
                mv: self.moves,
                limit: MOVE_LIMIT,
            });
        }
        if !self.tree.adjacent(cursor, target) {
            return Err(ProtocolError::NotAdjacent {
                target,
                current: cursor,
            });
        }
        self.state = State::Active { cursor: target };
        let view = self.view(target);
        log::debug!("  move({}) -> deg={}", target, view.neighbors.len());
        Ok(view)
    }

    fn view(&self, node: usize) -> View {
        View {
            node,
            neighbors: self.tree.neighbors(node).to_vec(),
        }
    }
}

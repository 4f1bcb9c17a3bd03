use crate::Edge;
use crate::error::ProtocolError;
use crate::explore::{Explorer, View};
use crate::oracle::QueryOracle;
use crate::participant::BobJudge;
use crate::problem::Problem;
use crate::registry::IntermediateTree;

/// Everything Bob can touch during one run, built fresh for each starting node.
///
/// Enforces the call order `ask* explore? move* answer`. The first protocol
/// error poisons the session: every later call returns it again.
pub struct Session<'a> {
    problem: &'a Problem,
    start: usize,
    oracle: QueryOracle<'a>,
    explorer: Explorer<'a>,
    answer: Option<Vec<Edge>>,
    error: Option<ProtocolError>,
}

/// The counters and answer left behind by a finished session.
#[derive(Clone, Debug)]
pub struct SessionSummary {
    pub start: usize,
    pub queries: usize,
    pub moves: usize,
    pub answer: Option<Vec<Edge>>,
}

impl SessionSummary {
    /// The submitted edges, or `NoAnswerSubmitted` if Bob never answered.
    pub fn submitted_answer(&self) -> Result<&[Edge], ProtocolError> {
        self.answer
            .as_deref()
            .ok_or(ProtocolError::NoAnswerSubmitted)
    }
}

impl<'a> Session<'a> {
    pub fn new(problem: &'a Problem, tree: &'a IntermediateTree, start: usize) -> Self {
        Self {
            problem,
            start,
            oracle: QueryOracle::new(problem),
            explorer: Explorer::new(tree),
            answer: None,
            error: None,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn queries(&self) -> usize {
        self.oracle.count()
    }

    pub fn moves(&self) -> usize {
        self.explorer.moves()
    }

    pub fn error(&self) -> Option<&ProtocolError> {
        self.error.as_ref()
    }

    /// Closes the session. Fails with the first protocol error seen, if any.
    pub fn finish(self) -> Result<SessionSummary, ProtocolError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(SessionSummary {
            start: self.start,
            queries: self.oracle.count(),
            moves: self.explorer.moves(),
            answer: self.answer,
        })
    }

    fn guard(&self, op: &'static str) -> Result<(), ProtocolError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if self.answer.is_some() {
            return Err(if op == "answer" {
                ProtocolError::DuplicateAnswer
            } else {
                ProtocolError::CallAfterAnswer { op }
            });
        }
        Ok(())
    }

    fn record<T>(&mut self, result: Result<T, ProtocolError>) -> Result<T, ProtocolError> {
        result.map_err(|e| {
            if self.error.is_none() {
                log::debug!("[start={}] protocol error: {}", self.start, e);
            }
            ProtocolError::poison(&mut self.error, e)
        })
    }
}

impl BobJudge for Session<'_> {
    fn num_nodes(&self) -> usize {
        self.problem.num_nodes()
    }

    fn ask(&mut self, a_set: &[usize], b_set: &[usize]) -> Result<bool, ProtocolError> {
        let result = self.guard("ask").and_then(|()| {
            if self.explorer.is_started() {
                Err(ProtocolError::AskAfterExplore)
            } else {
                self.oracle.ask(a_set, b_set)
            }
        });
        self.record(result)
    }

    fn explore(&mut self) -> Result<View, ProtocolError> {
        let start = self.start;
        let result = self
            .guard("explore")
            .and_then(|()| self.explorer.start(start));
        self.record(result)
    }

    fn move_to(&mut self, target: usize) -> Result<View, ProtocolError> {
        let result = self
            .guard("move")
            .and_then(|()| self.explorer.move_to(target));
        self.record(result)
    }

    fn answer(&mut self, edges: Vec<Edge>) -> Result<(), ProtocolError> {
        let result = self.guard("answer");
        self.record(result)?;
        self.answer = Some(edges);
        Ok(())
    }
}

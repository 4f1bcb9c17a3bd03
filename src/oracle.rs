use crate::QUERY_HARD_LIMIT;
use crate::error::ProtocolError;
use crate::problem::Problem;
use rustc_hash::FxHashSet;

/// Answers "is there an edge between A and B?" against the original tree.
pub struct QueryOracle<'a> {
    problem: &'a Problem,
    count: usize,
}

impl<'a> QueryOracle<'a> {
    pub fn new(problem: &'a Problem) -> Self {
        Self { problem, count: 0 }
    }

    /// Number of queries issued so far, including the one that failed, if any.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn ask(&mut self, a: &[usize], b: &[usize]) -> Result<bool, ProtocolError> {
        self.count += 1;
        if self.count > QUERY_HARD_LIMIT {
            return Err(ProtocolError::QueryBudgetExceeded {
                query: self.count,
                limit: QUERY_HARD_LIMIT,
            });
        }

        let set_b: FxHashSet<usize> = b.iter().copied().collect();
        if let Some(&label) = a.iter().find(|&&x| set_b.contains(&x)) {
            return Err(ProtocolError::NonDisjointSets { label });
        }

        let found = a
            .iter()
            .any(|&u| self.problem.neighbors(u).any(|v| set_b.contains(&v)));
        log::debug!("  ask(|A|={},|B|={}) -> {}", a.len(), b.len(), found as u8);
        Ok(found)
    }
}

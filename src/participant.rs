use crate::Edge;
use crate::error::ProtocolError;
use crate::explore::View;
use crate::registry::Registry;

/// Operations available to Alice.
pub trait AliceJudge {
    fn set_tree(&mut self, k: usize, edges: &[Edge]) -> Result<(), ProtocolError>;
}

/// Operations available to Bob.
pub trait BobJudge {
    fn num_nodes(&self) -> usize;
    /// Is there an edge `(a, b)` in the original tree with `a` in `a_set` and `b` in `b_set`?
    fn ask(&mut self, a_set: &[usize], b_set: &[usize]) -> Result<bool, ProtocolError>;
    /// Starts the walk on Alice's tree. At most once, after all queries.
    fn explore(&mut self) -> Result<View, ProtocolError>;
    /// Moves to a neighbor of the current node. At most `MOVE_LIMIT` times.
    fn move_to(&mut self, target: usize) -> Result<View, ProtocolError>;
    /// Submits the reconstructed edge set. Exactly once.
    fn answer(&mut self, edges: Vec<Edge>) -> Result<(), ProtocolError>;
}

/// The compressing participant.
pub trait Alice {
    fn compress(
        &mut self,
        n: usize,
        preorder: &[usize],
        judge: &mut dyn AliceJudge,
    ) -> anyhow::Result<()>;
}

/// The reconstructing participant.
pub trait Bob {
    fn reconstruct(&mut self, n: usize, judge: &mut dyn BobJudge) -> anyhow::Result<()>;
}

impl AliceJudge for Registry {
    fn set_tree(&mut self, k: usize, edges: &[Edge]) -> Result<(), ProtocolError> {
        self.accept(k, edges)
    }
}

/// Submits a single node and nothing else.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleNodeAlice;

impl Alice for SingleNodeAlice {
    fn compress(
        &mut self,
        _n: usize,
        _preorder: &[usize],
        judge: &mut dyn AliceJudge,
    ) -> anyhow::Result<()> {
        judge.set_tree(1, &[])?;
        Ok(())
    }
}

/// Asks about every pair `{i}, {j}` with `i < j`. Never explores.
///
/// Needs `N(N-1)/2` queries, so it stays inside the soft budget only for `N <= 28`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BruteForceBob;

impl Bob for BruteForceBob {
    fn reconstruct(&mut self, n: usize, judge: &mut dyn BobJudge) -> anyhow::Result<()> {
        let mut found = vec![];
        for i in 1..=n {
            for j in i + 1..=n {
                if judge.ask(&[i], &[j])? {
                    found.push((i, j));
                }
            }
        }
        judge.answer(found)?;
        Ok(())
    }
}

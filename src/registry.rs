use crate::error::ProtocolError;
use crate::{Edge, K_HARD_LIMIT};
use std::collections::VecDeque;

/// Alice's compressed tree. Labels are `1..=k`.
#[derive(Clone, Debug)]
pub struct IntermediateTree {
    k: usize,
    /// Sorted, deduplicated neighbor lists indexed by label (index 0 unused).
    adj: Vec<Vec<usize>>,
}

impl IntermediateTree {
    /// Validates a submission and builds the tree.
    pub fn new(k: usize, edges: &[Edge]) -> Result<Self, ProtocolError> {
        if !(1..=K_HARD_LIMIT).contains(&k) {
            return Err(ProtocolError::SizeOutOfRange {
                k,
                max: K_HARD_LIMIT,
            });
        }
        if edges.len() != k - 1 {
            return Err(ProtocolError::EdgeCountMismatch {
                k,
                got: edges.len(),
                expected: k - 1,
            });
        }
        let mut adj = vec![vec![]; k + 1];
        for &(u, v) in edges {
            if !(1..=k).contains(&u) || !(1..=k).contains(&v) {
                return Err(ProtocolError::LabelOutOfRange { u, v, k });
            }
            adj[u].push(v);
            adj[v].push(u);
        }
        for list in &mut adj {
            list.sort_unstable();
            list.dedup();
        }

        let mut visited = vec![false; k + 1];
        visited[1] = true;
        let mut reachable = 1;
        let mut queue = VecDeque::from([1]);
        while let Some(u) = queue.pop_front() {
            for &v in &adj[u] {
                if !visited[v] {
                    visited[v] = true;
                    reachable += 1;
                    queue.push_back(v);
                }
            }
        }
        if reachable != k {
            return Err(ProtocolError::Disconnected { reachable, k });
        }

        Ok(Self {
            k,
            adj,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.k
    }

    /// Neighbors of `u` in ascending order. Empty for labels outside the tree.
    pub fn neighbors(&self, u: usize) -> &[usize] {
        self.adj.get(u).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn adjacent(&self, u: usize, v: usize) -> bool {
        self.neighbors(u).binary_search(&v).is_ok()
    }
}

/// Accepts Alice's tree exactly once.
#[derive(Debug, Default)]
pub struct Registry {
    tree: Option<IntermediateTree>,
    error: Option<ProtocolError>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, k: usize, edges: &[Edge]) -> Result<(), ProtocolError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let result = if self.tree.is_some() {
            Err(ProtocolError::DuplicateSubmission)
        } else {
            IntermediateTree::new(k, edges)
        };
        match result {
            Ok(tree) => {
                log::debug!("setTree(K={}) accepted", k);
                self.tree = Some(tree);
                Ok(())
            }
            Err(e) => Err(ProtocolError::poison(&mut self.error, e)),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tree.is_some()
    }

    /// The first protocol error raised through this registry, if any.
    pub fn error(&self) -> Option<&ProtocolError> {
        self.error.as_ref()
    }

    /// Hands over the accepted tree, or the reason there is none.
    pub fn finish(self) -> Result<IntermediateTree, ProtocolError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        self.tree.ok_or(ProtocolError::NoTreeSubmitted)
    }
}

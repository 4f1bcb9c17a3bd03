use crate::Edge;
use anyhow::{Context, bail, ensure};
use itertools::Itertools;
use proconio::input;
use proconio::source::once::OnceSource;
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;
use std::path::Path;

/// The original tree: ground truth for queries and verification.
///
/// Test files are authored by the generator and are trusted, so nothing here
/// validates that the edges really form a tree or that the preorder matches.
#[derive(Clone, Debug)]
pub struct Problem {
    n: usize,
    preorder: Vec<usize>,
    edges: Vec<Edge>,
    adj: Vec<FxHashSet<usize>>,
}

impl Problem {
    pub fn new(preorder: Vec<usize>, edges: Vec<Edge>) -> Self {
        let n = preorder.len();
        let max_label = edges.iter().map(|&(u, v)| u.max(v)).max().unwrap_or(0);
        let mut adj = vec![FxHashSet::default(); n.max(max_label) + 1];
        for &(u, v) in &edges {
            adj[u].insert(v);
            adj[v].insert(u);
        }
        Self {
            n,
            preorder,
            edges,
            adj,
        }
    }

    /// Parses the test-file layout: `N`, then `N` preorder labels, then `N-1` edges.
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        // `input!` panics on a short or garbled file, so check the tokens first.
        let mut tokens = input.split_whitespace();
        let Some(first) = tokens.next() else {
            bail!("Empty test file");
        };
        let n: usize = first
            .parse()
            .with_context(|| format!("Invalid node count: {}", first))?;
        let needed = n.saturating_add(n.saturating_sub(1).saturating_mul(2));
        let mut found = 0;
        for t in tokens.take(needed) {
            t.parse::<usize>()
                .with_context(|| format!("Invalid label: {}", t))?;
            found += 1;
        }
        ensure!(
            found == needed,
            "Truncated test file: {} labels after N={}, expected {}",
            found,
            n,
            needed
        );
        let mut src = OnceSource::from(input);
        input! { from &mut src,
            n: usize,
            preorder: [usize; n],
            edges: [(usize, usize); n.saturating_sub(1)],
        }
        Ok(Self::new(preorder, edges))
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open: {}", path.display()))?;
        Self::parse(&input).with_context(|| format!("Cannot parse: {}", path.display()))
    }

    pub fn num_nodes(&self) -> usize {
        self.n
    }

    pub fn preorder(&self) -> &[usize] {
        &self.preorder
    }

    /// Edges in file order, as given.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Labels outside the tree have no neighbors.
    pub fn adjacent(&self, u: usize, v: usize) -> bool {
        self.adj.get(u).is_some_and(|s| s.contains(&v))
    }

    pub fn neighbors(&self, u: usize) -> impl Iterator<Item = usize> + '_ {
        self.adj.get(u).into_iter().flatten().copied()
    }

    /// The undirected edge set, each edge stored as `(min, max)`.
    pub fn edge_set(&self) -> BTreeSet<Edge> {
        normalize(&self.edges)
    }

    /// Renders the problem back into the test-file layout.
    pub fn to_input_string(&self) -> String {
        let mut out = format!("{}\n{}\n", self.n, self.preorder.iter().join(" "));
        for &(u, v) in &self.edges {
            out.push_str(&format!("{} {}\n", u, v));
        }
        out
    }
}

/// Normalizes undirected edges to `(min, max)` and collects them into a set.
pub fn normalize(edges: &[Edge]) -> BTreeSet<Edge> {
    edges.iter().map(|&(u, v)| (u.min(v), u.max(v))).collect()
}

//! # Test Tree Generation
//!
//! Builds original trees of a few named shapes and derives the preorder by
//! rooting at node 1 (children visited in ascending label order). The output
//! is a [`Problem`], which renders to the test-file layout.

use crate::Edge;
use crate::problem::Problem;
use once_cell::sync::Lazy;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::collections::{HashMap, VecDeque};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeKind {
    /// Uniform random parent among earlier nodes.
    Random,
    /// 1-2-...-N.
    Path,
    /// Node 1 adjacent to every other node.
    Star,
    /// Complete binary tree, parent of `i` is `i / 2`.
    Binary,
    /// A spine of `max(2, N/3)` nodes with the rest as leaves on random spine nodes.
    Caterpillar,
    /// About `sqrt(N)` equal legs around node 1.
    Spider,
    /// A path of `N/2` nodes ending in a star.
    Broom,
    /// Two adjacent hubs sharing the remaining nodes.
    DoubleStar,
    /// A spine of `N/2` nodes, one leaf per spine node.
    Comb,
    /// Nodes 1..=3 get three children, everyone after that one.
    Deep,
    /// Root, up to 10 middle nodes, and random leaves under them.
    Wide,
    /// Random parent among the last `sqrt(i)` nodes.
    RandomDeep,
}

const KIND_NAMES: &[(&str, TreeKind)] = &[
    ("random", TreeKind::Random),
    ("path", TreeKind::Path),
    ("star", TreeKind::Star),
    ("binary", TreeKind::Binary),
    ("caterpillar", TreeKind::Caterpillar),
    ("spider", TreeKind::Spider),
    ("broom", TreeKind::Broom),
    ("doublestar", TreeKind::DoubleStar),
    ("comb", TreeKind::Comb),
    ("deep", TreeKind::Deep),
    ("wide", TreeKind::Wide),
    ("random_deep", TreeKind::RandomDeep),
];

static KIND_MAP: Lazy<HashMap<&'static str, TreeKind>> =
    Lazy::new(|| KIND_NAMES.iter().copied().collect());

impl TreeKind {
    pub fn from_name(name: &str) -> Option<Self> {
        KIND_MAP.get(name).copied()
    }

    pub fn name(self) -> &'static str {
        KIND_NAMES
            .iter()
            .find(|&&(_, k)| k == self)
            .map_or("random", |&(name, _)| name)
    }

    pub fn all() -> impl Iterator<Item = TreeKind> {
        KIND_NAMES.iter().map(|&(_, k)| k)
    }
}

/// Generates the edge list of a tree on `1..=n` in generation order.
pub fn generate_edges(n: usize, kind: TreeKind, seed: u64) -> Vec<Edge> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut edges = Vec::with_capacity(n.saturating_sub(1));
    if n <= 1 {
        return edges;
    }
    let isqrt = |x: usize| (x as f64).sqrt() as usize;
    match kind {
        TreeKind::Path => edges.extend((1..n).map(|i| (i, i + 1))),
        TreeKind::Star => edges.extend((2..=n).map(|i| (1, i))),
        TreeKind::Binary => edges.extend((2..=n).map(|i| (i / 2, i))),
        TreeKind::Caterpillar => {
            let spine = (n / 3).max(2);
            edges.extend((1..spine).map(|i| (i, i + 1)));
            for i in spine + 1..=n {
                edges.push((rng.random_range(1..=spine), i));
            }
        }
        TreeKind::Spider => {
            let legs = isqrt(n).max(2);
            let leg_len = ((n - 1) / legs).max(1);
            let mut cur = 2;
            for _ in 0..legs {
                if cur > n {
                    break;
                }
                edges.push((1, cur));
                for _ in 1..leg_len {
                    if cur + 1 > n {
                        break;
                    }
                    edges.push((cur, cur + 1));
                    cur += 1;
                }
                cur += 1;
            }
            edges.extend((cur..=n).map(|i| (1, i)));
        }
        TreeKind::Broom => {
            let handle = n / 2;
            edges.extend((1..handle).map(|i| (i, i + 1)));
            edges.extend((handle + 1..=n).map(|i| (handle, i)));
        }
        TreeKind::DoubleStar => {
            edges.push((1, 2));
            edges.extend((3..=n).map(|i| (if i % 2 == 1 { 1 } else { 2 }, i)));
        }
        TreeKind::Comb => {
            let spine = n / 2;
            edges.extend((1..spine).map(|i| (i, i + 1)));
            let mut cur = spine + 1;
            for i in 1..=spine {
                if cur > n {
                    break;
                }
                edges.push((i, cur));
                cur += 1;
            }
            // Odd N leaves one node over; it hangs off the end of the spine.
            edges.extend((cur..=n).map(|i| (spine, i)));
        }
        TreeKind::Deep => {
            let mut cur = 2;
            let mut i = 1;
            while cur <= n {
                let children = if i <= 3 { 3 } else { 1 };
                for _ in 0..children {
                    if cur > n {
                        break;
                    }
                    edges.push((i, cur));
                    cur += 1;
                }
                i += 1;
            }
        }
        TreeKind::Wide => {
            let mid = 10.min(n - 1);
            edges.extend((2..=mid + 1).map(|i| (1, i)));
            for i in mid + 2..=n {
                edges.push((rng.random_range(2..=mid + 1), i));
            }
        }
        TreeKind::RandomDeep => {
            for i in 2..=n {
                let lo = i.saturating_sub(isqrt(i)).max(1);
                edges.push((rng.random_range(lo..i), i));
            }
        }
        TreeKind::Random => {
            for i in 2..=n {
                edges.push((rng.random_range(1..i), i));
            }
        }
    }
    edges
}

/// Preorder of the tree rooted at node 1, children in ascending order.
pub fn preorder(n: usize, edges: &[Edge]) -> Vec<usize> {
    let mut adj = vec![vec![]; n + 1];
    for &(u, v) in edges {
        adj[u].push(v);
        adj[v].push(u);
    }
    // Orient away from the root first, then walk.
    let mut children = vec![vec![]; n + 1];
    let mut visited = vec![false; n + 1];
    visited[1] = true;
    let mut queue = VecDeque::from([1]);
    while let Some(u) = queue.pop_front() {
        for &v in &adj[u] {
            if !visited[v] {
                visited[v] = true;
                children[u].push(v);
                queue.push_back(v);
            }
        }
    }
    let mut order = Vec::with_capacity(n);
    let mut stack = vec![1];
    while let Some(u) = stack.pop() {
        order.push(u);
        children[u].sort_unstable();
        stack.extend(children[u].iter().rev());
    }
    order
}

/// Generates a complete test case.
pub fn generate(n: usize, kind: TreeKind, seed: u64) -> Problem {
    let edges = generate_edges(n, kind, seed);
    let order = if n == 0 { vec![] } else { preorder(n, &edges) };
    Problem::new(order, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::normalize;

    fn is_tree(n: usize, edges: &[Edge]) -> bool {
        edges.len() == n - 1 && preorder(n, edges).len() == n
    }

    #[test]
    fn every_kind_builds_a_tree() {
        for kind in TreeKind::all() {
            for n in [1, 2, 3, 5, 10, 28, 101] {
                let edges = generate_edges(n, kind, 7);
                assert!(is_tree(n, &edges), "{} n={} edges={:?}", kind.name(), n, edges);
                assert!(edges.iter().all(|&(u, v)| u != v && u <= n && v <= n));
            }
        }
    }

    #[test]
    fn names_round_trip() {
        for kind in TreeKind::all() {
            assert_eq!(TreeKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(TreeKind::all().count(), 12);
        assert_eq!(TreeKind::from_name("hexagon"), None);
    }

    #[test]
    fn same_seed_same_tree() {
        assert_eq!(
            generate_edges(50, TreeKind::Random, 42),
            generate_edges(50, TreeKind::Random, 42)
        );
    }

    #[test]
    fn preorder_visits_children_in_order() {
        // 1 has children 2 and 5; 2 has children 3 and 4.
        let edges = [(1, 5), (2, 4), (1, 2), (3, 2)];
        assert_eq!(preorder(5, &edges), vec![1, 2, 3, 4, 5]);
        assert_eq!(preorder(4, &[(1, 2), (2, 3), (3, 4)]), vec![1, 2, 3, 4]);
    }

    #[test]
    fn file_round_trip_preserves_edge_set() {
        for kind in TreeKind::all() {
            let problem = generate(40, kind, 3);
            let reparsed = Problem::parse(&problem.to_input_string()).unwrap();
            assert_eq!(reparsed.edge_set(), problem.edge_set());
            assert_eq!(reparsed.preorder(), problem.preorder());

            // Same file with the edge lines reversed and flipped.
            let mut flipped: Vec<Edge> = problem.edges().iter().map(|&(u, v)| (v, u)).collect();
            flipped.reverse();
            let shuffled = Problem::new(problem.preorder().to_vec(), flipped);
            let reparsed = Problem::parse(&shuffled.to_input_string()).unwrap();
            assert_eq!(reparsed.edge_set(), normalize(problem.edges()));
        }
    }
}

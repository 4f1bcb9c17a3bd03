use crate::error::ProtocolError;
use crate::participant::{Alice, Bob};
use crate::problem::Problem;
use crate::registry::{IntermediateTree, Registry};
use crate::score::{self, Verdict};
use crate::session::Session;
use crate::verify::{RunOutcome, check_answer};
use crate::{DEFAULT_SEED, SetMinMax};
use anyhow::bail;
use indicatif::ProgressBar;
use itertools::Itertools;
use rand::prelude::*;

/// Which starting nodes of Alice's tree Bob is run from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartSelection {
    /// One node drawn from `[1, K]` by a generator seeded with `seed`.
    Random { seed: u64 },
    Fixed(usize),
    All,
}

impl Default for StartSelection {
    fn default() -> Self {
        StartSelection::Random { seed: DEFAULT_SEED }
    }
}

#[derive(Clone, Debug, Default)]
pub struct JudgeConfig {
    pub starts: StartSelection,
}

#[derive(Clone, Debug)]
pub struct RunRecord {
    pub start: usize,
    pub queries: usize,
    pub moves: usize,
    pub outcome: RunOutcome,
}

impl RunRecord {
    pub fn passed(&self) -> bool {
        self.outcome.is_accepted()
    }
}

/// Aggregated result of one judging invocation.
#[derive(Clone, Debug)]
pub struct Report {
    pub k: usize,
    pub runs: Vec<RunRecord>,
    pub max_queries: usize,
    pub score: f64,
    pub verdict: Verdict,
}

impl Report {
    fn new(k: usize, runs: Vec<RunRecord>) -> Self {
        let mut max_queries = 0;
        for r in &runs {
            max_queries.setmax(r.queries);
        }
        let all_passed = runs.iter().all(RunRecord::passed);
        let score = if all_passed {
            score::score(k, max_queries)
        } else {
            0.0
        };
        Self {
            k,
            runs,
            max_queries,
            score,
            verdict: Verdict::classify(all_passed, score),
        }
    }

    pub fn passed(&self) -> usize {
        self.runs.iter().filter(|r| r.passed()).count()
    }

    pub fn is_full_credit(&self) -> bool {
        self.verdict == Verdict::Accepted
    }

    pub fn summary_line(&self, name: &str) -> String {
        score::summary_line(
            name,
            self.verdict,
            Some(self.k),
            Some(self.max_queries),
            Some((self.passed(), self.runs.len())),
            self.score,
        )
    }
}

/// The protocol coordinator: Alice once, then Bob once per starting node.
///
/// Any protocol error ends the whole invocation with `Err`. A wrong answer
/// only fails its own run.
pub struct Judge {
    problem: Problem,
    tree: Option<IntermediateTree>,
}

impl Judge {
    pub fn new(problem: Problem) -> Self {
        Self {
            problem,
            tree: None,
        }
    }

    /// Alice's tree, once she has submitted one.
    pub fn tree(&self) -> Option<&IntermediateTree> {
        self.tree.as_ref()
    }

    pub fn run_alice(&mut self, alice: &mut dyn Alice) -> anyhow::Result<&IntermediateTree> {
        if self.tree.is_some() {
            return Err(ProtocolError::DuplicateSubmission.into());
        }
        let mut registry = Registry::new();
        let result = alice.compress(
            self.problem.num_nodes(),
            self.problem.preorder(),
            &mut registry,
        );
        if let Some(err) = registry.error() {
            return Err(err.clone().into());
        }
        result?;
        let tree = registry.finish()?;
        log::info!("Alice submitted K={}", tree.num_nodes());
        Ok(self.tree.insert(tree))
    }

    pub fn select_starts(&self, selection: StartSelection) -> anyhow::Result<Vec<usize>> {
        let Some(tree) = &self.tree else {
            return Err(ProtocolError::NoTreeSubmitted.into());
        };
        let k = tree.num_nodes();
        Ok(match selection {
            StartSelection::Random { seed } => {
                let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(seed);
                vec![rng.random_range(1..=k)]
            }
            StartSelection::Fixed(s) => {
                if !(1..=k).contains(&s) {
                    bail!("Starting node {} out of range [1, {}]", s, k);
                }
                vec![s]
            }
            StartSelection::All => (1..=k).collect(),
        })
    }

    /// Runs Bob once from `start` in a fresh session.
    pub fn run_bob(&self, bob: &mut dyn Bob, start: usize) -> anyhow::Result<RunRecord> {
        let Some(tree) = &self.tree else {
            return Err(ProtocolError::NoTreeSubmitted.into());
        };
        let mut session = Session::new(&self.problem, tree, start);
        let result = bob.reconstruct(self.problem.num_nodes(), &mut session);
        let summary = session.finish()?;
        result?;

        // A missing answer fails this run only.
        let outcome = match summary.submitted_answer() {
            Ok(edges) => check_answer(&self.problem, edges),
            Err(err) => {
                log::info!("  [start={}] {}", start, err);
                RunOutcome::NoAnswer
            }
        };
        let (q, m) = (summary.queries, summary.moves);
        match &outcome {
            RunOutcome::Accepted => log::info!("  [start={}] ACCEPTED (Q={}, M={})", start, q, m),
            RunOutcome::NoAnswer => {}
            RunOutcome::WrongEdgeCount { got, expected } => log::info!(
                "  [start={}] WRONG ANSWER: {} edges (expected {})",
                start,
                got,
                expected
            ),
            RunOutcome::WrongAnswer { missing, extra } => {
                log::info!("  [start={}] WRONG ANSWER (Q={}, M={})", start, q, m);
                for (u, v) in missing {
                    log::debug!("    Missing: ({},{})", u, v);
                }
                for (u, v) in extra {
                    log::debug!("    Extra: ({},{})", u, v);
                }
            }
        }
        Ok(RunRecord {
            start,
            queries: q,
            moves: m,
            outcome,
        })
    }

    /// Runs the whole protocol and scores it.
    pub fn run(
        &mut self,
        alice: &mut dyn Alice,
        bob: &mut dyn Bob,
        config: &JudgeConfig,
    ) -> anyhow::Result<Report> {
        let k = self.run_alice(alice)?.num_nodes();
        let starts = self.select_starts(config.starts)?;
        log::debug!("starting nodes: {}", starts.iter().join(" "));

        let progress = if starts.len() > 1 {
            ProgressBar::new(starts.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        let mut runs = Vec::with_capacity(starts.len());
        for &s in &starts {
            runs.push(self.run_bob(bob, s)?);
            progress.inc(1);
        }
        progress.finish_and_clear();

        Ok(Report::new(k, runs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Edge;
    use crate::participant::{AliceJudge, BobJudge, BruteForceBob, SingleNodeAlice};

    fn path3() -> Problem {
        Problem::parse("3\n1 2 3\n1 2\n2 3\n").unwrap()
    }

    /// Submits a fixed tree.
    struct FixedAlice(usize, Vec<Edge>);

    impl Alice for FixedAlice {
        fn compress(
            &mut self,
            _n: usize,
            _preorder: &[usize],
            judge: &mut dyn AliceJudge,
        ) -> anyhow::Result<()> {
            judge.set_tree(self.0, &self.1)?;
            Ok(())
        }
    }

    struct SilentAlice;

    impl Alice for SilentAlice {
        fn compress(&mut self, _: usize, _: &[usize], _: &mut dyn AliceJudge) -> anyhow::Result<()> {
            Ok(())
        }
    }

    /// Ignores a rejected submission and returns normally.
    struct StubbornAlice;

    impl Alice for StubbornAlice {
        fn compress(&mut self, _: usize, _: &[usize], judge: &mut dyn AliceJudge) -> anyhow::Result<()> {
            let _ = judge.set_tree(3, &[(1, 2)]);
            let _ = judge.set_tree(1, &[]);
            Ok(())
        }
    }

    /// The three queries of the path example, then a fixed answer.
    struct PathBob {
        answer: Option<Vec<Edge>>,
    }

    impl Bob for PathBob {
        fn reconstruct(&mut self, _n: usize, judge: &mut dyn BobJudge) -> anyhow::Result<()> {
            assert!(judge.ask(&[1], &[2])?);
            assert!(!judge.ask(&[1], &[3])?);
            assert!(judge.ask(&[2], &[3])?);
            if let Some(edges) = self.answer.clone() {
                judge.answer(edges)?;
            }
            Ok(())
        }
    }

    /// Walks as far as it is allowed to, recording the nodes it visited.
    struct WalkingBob {
        moves: usize,
        visited: Vec<Vec<usize>>,
    }

    impl Bob for WalkingBob {
        fn reconstruct(&mut self, _n: usize, judge: &mut dyn BobJudge) -> anyhow::Result<()> {
            let mut view = judge.explore()?;
            let mut path = vec![view.node];
            for _ in 0..self.moves {
                view = judge.move_to(view.neighbors[0])?;
                path.push(view.node);
            }
            self.visited.push(path);
            judge.answer(vec![(2, 1), (3, 2)])?;
            Ok(())
        }
    }

    #[test]
    fn path_example_is_fully_correct() {
        let mut judge = Judge::new(path3());
        let mut bob = PathBob {
            answer: Some(vec![(1, 2), (2, 3)]),
        };
        let report = judge
            .run(&mut SingleNodeAlice, &mut bob, &JudgeConfig::default())
            .unwrap();
        assert_eq!(report.k, 1);
        assert_eq!(report.max_queries, 3);
        assert_eq!(report.passed(), 1);
        assert_eq!(report.score, 100.0);
        assert_eq!(report.verdict, Verdict::Accepted);
        assert!(report.is_full_credit());
    }

    #[test]
    fn reversed_answer_is_correct() {
        let mut judge = Judge::new(path3());
        let mut bob = PathBob {
            answer: Some(vec![(3, 2), (2, 1)]),
        };
        let report = judge
            .run(&mut SingleNodeAlice, &mut bob, &JudgeConfig::default())
            .unwrap();
        assert_eq!(report.verdict, Verdict::Accepted);
    }

    #[test]
    fn large_k_is_partial_credit() {
        let edges: Vec<Edge> = (1..600).map(|i| (i, i + 1)).collect();
        let mut judge = Judge::new(path3());
        let mut bob = PathBob {
            answer: Some(vec![(1, 2), (2, 3)]),
        };
        let report = judge
            .run(&mut FixedAlice(600, edges), &mut bob, &JudgeConfig::default())
            .unwrap();
        assert_eq!(report.verdict, Verdict::Partial);
        assert!((report.score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn missing_answer_fails_the_run_only() {
        let mut judge = Judge::new(path3());
        let mut bob = PathBob { answer: None };
        let config = JudgeConfig {
            starts: StartSelection::All,
        };
        let report = judge
            .run(&mut FixedAlice(2, vec![(1, 2)]), &mut bob, &config)
            .unwrap();
        assert_eq!(report.runs.len(), 2);
        assert_eq!(report.passed(), 0);
        assert!(report.runs.iter().all(|r| r.outcome == RunOutcome::NoAnswer));
        assert_eq!(report.verdict, Verdict::WrongAnswer);
        assert_eq!(report.score, 0.0);
    }

    #[test]
    fn wrong_answer_zeroes_score() {
        let mut judge = Judge::new(path3());
        let mut bob = PathBob {
            answer: Some(vec![(1, 2), (1, 3)]),
        };
        let report = judge
            .run(&mut SingleNodeAlice, &mut bob, &JudgeConfig::default())
            .unwrap();
        assert_eq!(report.verdict, Verdict::WrongAnswer);
        assert_eq!(report.score, 0.0);
        assert!(report.summary_line("x").contains(" WA "));
    }

    #[test]
    fn alice_without_submission_is_fatal() {
        let mut judge = Judge::new(path3());
        let err = judge
            .run(&mut SilentAlice, &mut BruteForceBob, &JudgeConfig::default())
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ProtocolError>(),
            Some(&ProtocolError::NoTreeSubmitted)
        );
    }

    #[test]
    fn ignored_rejection_is_still_fatal() {
        let mut judge = Judge::new(path3());
        let err = judge.run_alice(&mut StubbornAlice).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProtocolError>(),
            Some(ProtocolError::EdgeCountMismatch { .. })
        ));
        assert!(judge.tree().is_none());
    }

    #[test]
    fn protocol_error_during_bob_aborts() {
        let mut judge = Judge::new(path3());
        let mut bob = WalkingBob {
            moves: 6,
            visited: vec![],
        };
        let err = judge
            .run(
                &mut FixedAlice(2, vec![(1, 2)]),
                &mut bob,
                &JudgeConfig::default(),
            )
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ProtocolError>(),
            Some(&ProtocolError::MoveBudgetExceeded { mv: 6, limit: 5 })
        );
    }

    #[test]
    fn all_starts_visit_every_node() {
        let mut judge = Judge::new(path3());
        let mut bob = WalkingBob {
            moves: 5,
            visited: vec![],
        };
        let config = JudgeConfig {
            starts: StartSelection::All,
        };
        let report = judge
            .run(&mut FixedAlice(3, vec![(3, 1), (1, 2)]), &mut bob, &config)
            .unwrap();
        assert_eq!(report.runs.iter().map(|r| r.start).collect_vec(), vec![1, 2, 3]);
        assert!(report.runs.iter().all(|r| r.moves == 5 && r.queries == 0));
        assert_eq!(report.verdict, Verdict::Accepted);
        // Always stepping to the smallest neighbor.
        assert_eq!(bob.visited[0], vec![1, 2, 1, 2, 1, 2]);
        assert_eq!(bob.visited[2], vec![3, 1, 2, 1, 2, 1]);
    }

    #[test]
    fn random_start_is_deterministic() {
        let mut judge = Judge::new(path3());
        let edges: Vec<Edge> = (1..20).map(|i| (i, i + 1)).collect();
        judge.run_alice(&mut FixedAlice(20, edges)).unwrap();
        let a = judge.select_starts(StartSelection::default()).unwrap();
        let b = judge.select_starts(StartSelection::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 1);
        assert!((1..=20).contains(&a[0]));
    }

    #[test]
    fn fixed_start_must_be_in_range() {
        let mut judge = Judge::new(path3());
        judge.run_alice(&mut FixedAlice(2, vec![(1, 2)])).unwrap();
        assert_eq!(judge.select_starts(StartSelection::Fixed(2)).unwrap(), vec![2]);
        assert!(judge.select_starts(StartSelection::Fixed(3)).is_err());
        assert!(judge.select_starts(StartSelection::Fixed(0)).is_err());
    }

    #[test]
    fn alice_runs_once_per_judge() {
        let mut judge = Judge::new(path3());
        judge.run_alice(&mut SingleNodeAlice).unwrap();
        let err = judge.run_alice(&mut SingleNodeAlice).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ProtocolError>(),
            Some(&ProtocolError::DuplicateSubmission)
        );
    }

    #[test]
    fn brute_force_bob_solves_small_trees() {
        let problem = Problem::parse("6\n1 2 4 5 3 6\n1 2\n1 3\n2 4\n2 5\n3 6\n").unwrap();
        let mut judge = Judge::new(problem);
        let report = judge
            .run(&mut SingleNodeAlice, &mut BruteForceBob, &JudgeConfig::default())
            .unwrap();
        assert_eq!(report.max_queries, 15);
        assert_eq!(report.verdict, Verdict::Accepted);
    }
}

use clap::Parser;
use std::path::PathBuf;
use treespec::judge::{Judge, JudgeConfig, StartSelection};
use treespec::participant::{Alice, Bob, BruteForceBob, SingleNodeAlice};
use treespec::problem::Problem;
use treespec::process::ProcessParticipant;
use treespec::score::{self, Verdict};
use treespec::DEFAULT_SEED;
use treespec::error::ProtocolError;

/// Judges Tree Speculation solutions and prints one summary line per test file.
#[derive(Parser, Debug)]
struct Cli {
    /// Test files (N, preorder, N-1 edges)
    #[clap(required = true)]
    tests: Vec<PathBuf>,
    /// Run Bob from this node of Alice's tree only (0 means pick at random)
    #[clap(long)]
    start: Option<usize>,
    /// Run Bob from every node of Alice's tree
    #[clap(long, default_value_t = false, conflicts_with = "start")]
    all_starts: bool,
    /// Seed for picking the starting node
    #[clap(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Trace every call on stderr
    #[clap(long, short = 'v', default_value_t = false)]
    verbose: bool,
    /// Shell command for Alice (defaults to the built-in single-node Alice)
    #[clap(long)]
    alice: Option<String>,
    /// Shell command for Bob (defaults to the built-in brute-force Bob)
    #[clap(long)]
    bob: Option<String>,
}

impl Cli {
    fn config(&self) -> JudgeConfig {
        let starts = if let Some(s) = self.start.filter(|&s| s > 0) {
            StartSelection::Fixed(s)
        } else if self.all_starts {
            StartSelection::All
        } else {
            StartSelection::Random { seed: self.seed }
        };
        JudgeConfig { starts }
    }

    fn participants(&self) -> (Box<dyn Alice>, Box<dyn Bob>) {
        let alice: Box<dyn Alice> = match &self.alice {
            Some(cmd) => Box::new(ProcessParticipant::new(cmd)),
            None => Box::new(SingleNodeAlice),
        };
        let bob: Box<dyn Bob> = match &self.bob {
            Some(cmd) => Box::new(ProcessParticipant::new(cmd)),
            None => Box::new(BruteForceBob),
        };
        (alice, bob)
    }
}

/// Prints the ER summary line and ends the process.
fn abort(name: &str, k: Option<usize>, err: anyhow::Error) -> ! {
    if err.downcast_ref::<ProtocolError>().is_some() {
        eprintln!("PROTOCOL ERROR: {:#}", err);
    } else {
        eprintln!("ERROR: {:#}", err);
    }
    println!(
        "{}",
        score::summary_line(name, Verdict::Error, k, None, None, 0.0)
    );
    eprintln!("!log status {}", Verdict::Error);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let config = cli.config();
    let mut all_full_credit = true;
    for path in &cli.tests {
        let name = path.display().to_string();
        let problem = Problem::load(path).unwrap_or_else(|e| abort(&name, None, e));
        log::info!("{}: N={}", name, problem.num_nodes());
        let (mut alice, mut bob) = cli.participants();
        let mut judge = Judge::new(problem);
        match judge.run(alice.as_mut(), bob.as_mut(), &config) {
            Ok(report) => {
                println!("{}", report.summary_line(&name));
                eprintln!("!log status {}", report.verdict);
                eprintln!("!log score {:.2}", report.score);
                all_full_credit &= report.is_full_credit();
            }
            // A protocol error aborts the whole invocation, not just this file.
            Err(e) => abort(&name, judge.tree().map(|t| t.num_nodes()), e),
        }
    }
    std::process::exit(if all_full_credit { 0 } else { 1 });
}

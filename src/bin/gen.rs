use anyhow::Context;
use clap::Parser;
use treespec::treegen::shapes::{self, TreeKind};

/// Writes a test case (N, preorder, N-1 edges) to stdout.
#[derive(Parser)]
struct Cli {
    n: usize,
    /// random, path, star, binary, caterpillar, spider, broom, doublestar,
    /// comb, deep, wide or random_deep
    r#type: String,
    #[clap(default_value = "42")]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let kind = TreeKind::from_name(&args.r#type)
        .with_context(|| format!("Unknown type: {}", args.r#type))?;
    anyhow::ensure!(args.n >= 1, "N must be at least 1");
    print!("{}", shapes::generate(args.n, kind, args.seed).to_input_string());
    Ok(())
}

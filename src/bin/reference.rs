//! Reference participant for out-of-process judging:
//! `judge --alice ./reference --bob ./reference case.txt`.

use treespec::participant::{BruteForceBob, SingleNodeAlice};

fn main() -> anyhow::Result<()> {
    treespec::protocol::serve_stdio(&mut SingleNodeAlice, &mut BruteForceBob)
}

use anyhow::Context as _;
use neotris_engine::Persistence as _;

use crate::store::FileStore;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct HighScoreArg {
    /// Reset the high score to zero
    #[arg(long)]
    reset: bool,
}

pub(crate) fn run(arg: &HighScoreArg, store: &mut FileStore) -> anyhow::Result<()> {
    let HighScoreArg { reset } = arg;

    if *reset {
        store
            .set_high_score(0)
            .context("Failed to reset high score")?;
        println!("High score reset.");
        return Ok(());
    }

    let high_score = store.high_score().context("Failed to read high score")?;
    println!("High score: {high_score}");
    Ok(())
}

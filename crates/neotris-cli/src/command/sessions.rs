use anyhow::Context as _;
use neotris_engine::Persistence as _;

use crate::{store::FileStore, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SessionsArg {
    /// Maximum number of sessions to list
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

pub(crate) fn run(arg: &SessionsArg, store: &mut FileStore) -> anyhow::Result<()> {
    let SessionsArg { limit } = arg;

    let high_score = store.high_score().context("Failed to read high score")?;
    let sessions = store
        .recent_sessions()
        .context("Failed to read session records")?;

    println!("High score: {high_score}");
    if sessions.is_empty() {
        println!("No sessions recorded yet.");
        return Ok(());
    }

    println!();
    println!(
        "{:>3}  {:<16}  {:>8}  {:>5}  {:>5}  {:>8}",
        "#", "Completed", "Score", "Level", "Lines", "Time"
    );
    for (index, record) in sessions.iter().take(*limit).enumerate() {
        println!(
            "{:>3}  {:<16}  {:>8}  {:>5}  {:>5}  {:>8}",
            index,
            util::format_timestamp(record.completed_at),
            record.final_score,
            record.final_level,
            record.total_lines_cleared,
            util::format_duration(record.play_duration),
        );
    }
    if sessions.len() > *limit {
        println!("... {} more", sessions.len() - limit);
    }
    Ok(())
}

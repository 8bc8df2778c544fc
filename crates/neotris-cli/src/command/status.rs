use anyhow::Context as _;
use neotris_engine::{Block, Persistence as _, SavedGame};

use crate::{store::FileStore, util};

pub(crate) fn run(store: &mut FileStore) -> anyhow::Result<()> {
    let high_score = store.high_score().context("Failed to read high score")?;
    let saved = store
        .load_in_progress()
        .context("Failed to read saved game")?;

    let Some(saved) = saved else {
        println!("No game in progress. High score: {high_score}");
        return Ok(());
    };

    let progression = &saved.progression;
    println!("State:      {}", saved.state);
    println!(
        "Score:      {} (high score {})",
        saved.score.score(),
        saved.score.high_score().max(high_score)
    );
    println!(
        "Level:      {} ({} lines, {} to next level, speed {}%)",
        progression.level(),
        progression.lines_cleared(),
        progression.lines_to_next_level(),
        progression.speed_percentage()
    );
    println!("Play time:  {}", util::format_duration(saved.play_duration));
    println!("Started:    {}", util::format_timestamp(saved.created_at));
    println!("Last saved: {}", util::format_timestamp(saved.last_played_at));
    let next: String = saved.next_pieces.iter().map(|kind| kind.as_char()).collect();
    println!("Next:       {next}");
    println!();
    for line in render_board(&saved) {
        println!("{line}");
    }
    Ok(())
}

/// Draws the saved board as text, with the falling piece shown by its letter.
fn render_board(saved: &SavedGame) -> Vec<String> {
    let piece_blocks = saved
        .current_piece
        .map(|piece| (piece.kind().as_char(), piece.absolute_positions()));

    let mut lines = vec![];
    for (y, row) in saved.board.iter().enumerate() {
        let mut line = String::from("|");
        for (x, cell) in row.iter().enumerate() {
            let here = i32::try_from(x)
                .ok()
                .zip(i32::try_from(y).ok())
                .map(|(x, y)| Block::new(x, y));
            let piece_char = piece_blocks.and_then(|(c, blocks)| {
                here.filter(|here| blocks.contains(here)).map(|_| c)
            });
            line.push(match (piece_char, cell) {
                (Some(c), _) => c,
                (None, Some(_)) => '#',
                (None, None) => '.',
            });
        }
        line.push('|');
        lines.push(line);
    }
    lines
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{store::FileStore, util};

use self::{
    delete_session::DeleteSessionArg, high_score::HighScoreArg, sessions::SessionsArg,
    simulate::SimulateArg,
};

mod delete_session;
mod high_score;
mod sessions;
mod simulate;
mod status;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Directory holding the saved game, session records and high score
    #[arg(long, global = true, env = "NEOTRIS_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,
    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// What to do; shows the saved game when omitted
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// List recorded sessions, most recent first
    Sessions(#[clap(flatten)] SessionsArg),
    /// Delete a recorded session
    DeleteSession(#[clap(flatten)] DeleteSessionArg),
    /// Show or reset the high score
    HighScore(#[clap(flatten)] HighScoreArg),
    /// Summarize the saved game in progress
    Status,
    /// Play games headlessly with random input
    Simulate(#[clap(flatten)] SimulateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let mut store = FileStore::new(&args.data_dir);
    log::debug!("using data directory {}", store.dir().display());

    match args.mode.unwrap_or(Mode::Status) {
        Mode::Sessions(arg) => sessions::run(&arg, &mut store)?,
        Mode::DeleteSession(arg) => delete_session::run(&arg, &store)?,
        Mode::HighScore(arg) => high_score::run(&arg, &mut store)?,
        Mode::Status => status::run(&mut store)?,
        Mode::Simulate(arg) => {
            let config = util::load_config(args.config.as_deref())?;
            simulate::run(&arg, config, store)?;
        }
    }
    Ok(())
}

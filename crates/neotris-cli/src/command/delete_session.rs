use anyhow::{Context as _, bail};

use crate::{store::FileStore, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DeleteSessionArg {
    /// Position in the `sessions` listing (0 is the most recent)
    index: usize,
}

pub(crate) fn run(arg: &DeleteSessionArg, store: &FileStore) -> anyhow::Result<()> {
    let DeleteSessionArg { index } = arg;

    let Some(record) = store
        .delete_session(*index)
        .context("Failed to update session records")?
    else {
        bail!("No session at index {index}");
    };
    println!(
        "Deleted session completed {} (score {}, level {})",
        util::format_timestamp(record.completed_at),
        record.final_score,
        record.final_level
    );
    Ok(())
}

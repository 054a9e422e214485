use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::events::Message;

/// File name of exported transcripts
pub const TRANSCRIPT_FILE: &str = "relie_chat.txt";

/// Render messages as `Speaker: text` blocks separated by blank lines
pub fn transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|message| format!("{}: {}", message.sender.speaker(), message.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Write the transcript into `dir` under the fixed file name
pub fn write_transcript(dir: &Path, messages: &[Message]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .context("Failed to create download directory")?;
    let path = dir.join(TRANSCRIPT_FILE);
    write_transcript_to(&path, messages)?;
    Ok(path)
}

/// Write the transcript to an explicit path
pub fn write_transcript_to(path: &Path, messages: &[Message]) -> Result<()> {
    fs::write(path, transcript(messages))
        .with_context(|| format!("Failed to write transcript to {}", path.display()))
}

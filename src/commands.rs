use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::export;
use crate::session::ChatSession;
use crate::storage::{find_entry, HistoryStore};
use crate::transport::HttpTransport;
use crate::ui::{self, App};

/// Launch the full-screen chat client
pub async fn start_chat(config: Config) -> Result<()> {
    let store = HistoryStore::from_config(&config);
    let transport = Arc::new(HttpTransport::new(config.endpoint.clone()));
    tracing::info!(endpoint = %transport.endpoint(), history = %store.path().display(), "launching chat");
    let session = ChatSession::new(store, transport);

    let mut terminal = ui::init_terminal()?;
    let mut app = App::new(config, session);
    let result = app.run(&mut terminal).await;
    ui::restore_terminal(&mut terminal)?;
    result
}

pub fn list_history(config: &Config) -> Result<()> {
    let entries = HistoryStore::from_config(config).load();

    if entries.is_empty() {
        println!("📭 No saved conversations yet. Run 'relie' to start chatting!");
        return Ok(());
    }

    println!("🗂  Saved conversations (newest first):");
    println!("{}", "=".repeat(50));

    for entry in entries {
        let preview = entry
            .messages
            .iter()
            .find(|message| message.sender == crate::events::Sender::User)
            .map(|message| message.text.as_str())
            .unwrap_or("");
        println!("📋 {}", entry.id);
        println!("   🕒 {}", entry.timestamp);
        println!("   💬 {} messages · {}", entry.messages.len(), truncate(preview, 40));
        println!();
    }

    Ok(())
}

pub fn export_history(config: &Config, id: &str, output: Option<PathBuf>) -> Result<()> {
    let id = Uuid::parse_str(id).context("Conversation id is not a valid UUID")?;
    let entries = HistoryStore::from_config(config).load();

    let Some(entry) = find_entry(&entries, &id) else {
        println!("❌ Conversation '{}' not found.", id);
        println!("Run 'relie history' to see saved conversations.");
        return Ok(());
    };

    let path = match output {
        Some(path) => {
            export::write_transcript_to(&path, &entry.messages)?;
            path
        }
        None => export::write_transcript(&config.download_dir, &entry.messages)?,
    };

    println!("💾 Transcript written to {}", path.display());
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("");
    if first_line.chars().count() <= max_chars {
        return first_line.to_string();
    }
    let cut: String = first_line.chars().take(max_chars).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("line one\nline two", 20), "line one");
    }

    #[test]
    fn truncate_cuts_on_characters() {
        assert_eq!(truncate("😊😊😊😊", 2), "😊😊…");
    }
}

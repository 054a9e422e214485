use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::Config;
use crate::events::Message;

/// File name of the persisted history list
pub const HISTORY_FILE: &str = "relie_history.json";

/// Snapshot of one conversation, taken after each completed exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: String,
    pub messages: Vec<Message>,
}

/// Look up a history entry by id
pub fn find_entry<'a>(entries: &'a [HistoryEntry], id: &Uuid) -> Option<&'a HistoryEntry> {
    entries.iter().find(|entry| &entry.id == id)
}

/// Sole owner of the history file.
///
/// The file holds a JSON array of entries, newest first. It is read and
/// rewritten in full on every append.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    max_entries: Option<usize>,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>, max_entries: Option<usize>) -> Self {
        Self {
            path: path.into(),
            max_entries,
        }
    }

    /// Store at `~/.relie/relie_history.json` with the configured cap
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.relie_home.join(HISTORY_FILE), config.history_cap())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all entries. A missing or unreadable file yields an empty history.
    pub fn load(&self) -> Vec<HistoryEntry> {
        if !self.path.exists() {
            return Vec::new();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read history");
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unparsable history");
                Vec::new()
            }
        }
    }

    /// Prepend a snapshot of `messages` and write the full list back.
    /// Returns the updated list, newest first.
    pub fn append(&self, messages: &[Message]) -> Result<Vec<HistoryEntry>> {
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            timestamp: local_timestamp(),
            messages: messages.to_vec(),
        };

        let mut entries = self.load();
        entries.insert(0, entry);
        if let Some(limit) = self.max_entries {
            if entries.len() > limit {
                tracing::debug!(dropped = entries.len() - limit, "evicting oldest history entries");
                entries.truncate(limit);
            }
        }

        self.write(&entries)?;
        Ok(entries)
    }

    fn write(&self, entries: &[HistoryEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create history directory")?;
        }

        let content = serde_json::to_string(entries)
            .context("Failed to serialize history")?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .context("Failed to write history")?;
        fs::rename(&tmp_path, &self.path)
            .context("Failed to replace history file")?;

        Ok(())
    }
}

/// Local time in the `10/16/2026, 3:04:05 PM` style
fn local_timestamp() -> String {
    chrono::Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir, limit: Option<usize>) -> HistoryStore {
        HistoryStore::new(dir.path().join(HISTORY_FILE), limit)
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store_in(&dir, None).load().is_empty());
    }

    #[test]
    fn load_garbage_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, None);
        fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn append_prepends_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, None);

        store.append(&[Message::user("first")]).unwrap();
        let before = store.load();
        assert_eq!(before.len(), 1);

        let messages = vec![Message::user("Hi"), Message::bot("Hello!")];
        let returned = store.append(&messages).unwrap();
        let loaded = store.load();

        assert_eq!(loaded.len(), before.len() + 1);
        assert_eq!(loaded, returned);
        assert_eq!(loaded[0].messages, messages);
        assert_eq!(loaded[1], before[0]);
        assert_ne!(loaded[0].id, loaded[1].id);
    }

    #[test]
    fn append_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("nested").join(HISTORY_FILE), None);
        store.append(&[Message::user("Hi")]).unwrap();
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn append_recovers_from_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, None);
        fs::write(store.path(), "[{\"broken\"").unwrap();

        let entries = store.append(&[Message::user("Hi")]).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn history_is_capped() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, Some(3));

        for i in 0..5 {
            store.append(&[Message::user(format!("message {}", i))]).unwrap();
        }

        let loaded = store.load();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].messages[0].text, "message 4");
        assert_eq!(loaded[2].messages[0].text, "message 2");
    }

    #[test]
    fn configured_limit_of_zero_keeps_everything() {
        let dir = TempDir::new().unwrap();
        let config: Config = toml::from_str("history_limit = 0").unwrap();
        let config = Config {
            relie_home: dir.path().to_path_buf(),
            ..config
        };
        let store = HistoryStore::from_config(&config);

        for i in 0..4 {
            store.append(&[Message::user(format!("message {}", i))]).unwrap();
        }
        assert_eq!(store.load().len(), 4);

        let capped = HistoryStore::from_config(&Config {
            history_limit: 2,
            ..config
        });
        capped.append(&[Message::user("message 4")]).unwrap();
        assert_eq!(capped.load().len(), 2);
    }

    #[test]
    fn persisted_layout_uses_plain_fields() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, None);
        store.append(&[Message::bot("Hello!")]).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        let first = &raw[0];
        assert!(first["id"].is_string());
        assert!(first["timestamp"].is_string());
        assert_eq!(first["messages"][0]["sender"], "bot");
        assert_eq!(first["messages"][0]["text"], "Hello!");
    }

    #[test]
    fn find_entry_by_id() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, None);
        let entries = store.append(&[Message::user("Hi")]).unwrap();

        assert!(find_entry(&entries, &entries[0].id).is_some());
        assert!(find_entry(&entries, &Uuid::new_v4()).is_none());
    }
}

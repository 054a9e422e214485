//! Conversation UI components for the chat column

pub mod commands;
pub mod composer;
pub mod emoji;
pub mod history;
pub mod prompts;
pub mod typing;

pub use commands::{get_help_text, SlashCommand};
pub use composer::{ConversationComposer, ConversationResult};
pub use emoji::{EmojiGrid, EmojiPicker};
pub use history::{ChatScroll, ConversationHistory};
pub use prompts::PromptBar;

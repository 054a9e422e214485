use std::str::FromStr;

use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Commands that can be invoked by starting a message with a leading slash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SlashCommand {
    /// Start over with a fresh greeting
    Reset,
    /// Save the transcript to disk
    Export,
    /// Toggle light and dark theme
    Theme,
    /// Open or close the emoji picker
    Emoji,
    /// Show help
    Help,
    /// Exit the application
    Bye,
}

impl SlashCommand {
    /// User-visible description shown in help.
    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::Reset => "start a new conversation",
            SlashCommand::Export => "save the conversation to relie_chat.txt",
            SlashCommand::Theme => "switch between light and dark theme",
            SlashCommand::Emoji => "open or close the emoji picker",
            SlashCommand::Help => "show available commands and keys",
            SlashCommand::Bye => "exit the application",
        }
    }

    /// Command string without the leading '/'.
    pub fn command(self) -> &'static str {
        self.into()
    }
}

/// Parse a slash command from user input. Unknown commands are `None` and
/// are sent as ordinary text.
pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let rest = input.trim().strip_prefix('/')?;
    let head = rest.split_whitespace().next()?.to_lowercase();

    SlashCommand::from_str(&head).ok().or_else(|| match head.as_str() {
        "q" | "quit" | "exit" => Some(SlashCommand::Bye),
        "clear" | "new" => Some(SlashCommand::Reset),
        "save" | "download" => Some(SlashCommand::Export),
        "dark" | "light" => Some(SlashCommand::Theme),
        _ => None,
    })
}

/// Get help text for all available commands
pub fn get_help_text() -> String {
    let commands: Vec<String> = SlashCommand::iter()
        .map(|command| format!("/{} {}", command.command(), command.description()))
        .collect();

    format!(
        "{} · Enter send · Ctrl+E emoji · Ctrl+R reset · Ctrl+S export · Ctrl+T theme · Tab history · Ctrl+C quit",
        commands.join(" · ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(parse_slash_command("/reset"), Some(SlashCommand::Reset));
        assert_eq!(parse_slash_command("  /EXPORT  "), Some(SlashCommand::Export));
        assert_eq!(parse_slash_command("/q"), Some(SlashCommand::Bye));
        assert_eq!(parse_slash_command("/light"), Some(SlashCommand::Theme));
    }

    #[test]
    fn plain_text_and_unknown_commands_are_not_commands() {
        assert_eq!(parse_slash_command("hello"), None);
        assert_eq!(parse_slash_command("/"), None);
        assert_eq!(parse_slash_command("/dance"), None);
    }

    #[test]
    fn help_lists_every_command() {
        let help = get_help_text();
        for command in SlashCommand::iter() {
            assert!(help.contains(&format!("/{}", command.command())));
        }
    }
}

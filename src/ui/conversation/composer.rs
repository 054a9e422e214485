use crate::ui::conversation::commands::{parse_slash_command, SlashCommand};
use crate::ui::theme::Palette;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Result returned when the user interacts with the composer
#[derive(Debug, PartialEq)]
pub enum ConversationResult {
    Submitted(String),
    Command(SlashCommand),
    None,
}

/// State for the single-line input. The cursor counts characters, not bytes.
#[derive(Debug, Clone, Default)]
pub struct TextAreaState {
    pub content: String,
    pub cursor_position: usize,
}

impl TextAreaState {
    fn byte_index(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map(|(index, _)| index)
            .unwrap_or(self.content.len())
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Composer for user input
#[derive(Debug, Clone)]
pub struct ConversationComposer {
    state: TextAreaState,
    placeholder: String,
    has_focus: bool,
}

impl ConversationComposer {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            state: TextAreaState::default(),
            placeholder: placeholder.into(),
            has_focus: true,
        }
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyEvent) -> ConversationResult {
        if key.kind != KeyEventKind::Press {
            return ConversationResult::None;
        }

        match key.code {
            KeyCode::Enter => return self.submit(),
            KeyCode::Char(c) => self.insert_str(&c.to_string()),
            KeyCode::Backspace => {
                self.backspace();
            }
            KeyCode::Delete => {
                self.delete();
            }
            KeyCode::Left => {
                self.state.cursor_position = self.state.cursor_position.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.state.cursor_position < self.state.char_len() {
                    self.state.cursor_position += 1;
                }
            }
            KeyCode::Home => {
                self.state.cursor_position = 0;
            }
            KeyCode::End => {
                self.state.cursor_position = self.state.char_len();
            }
            _ => {}
        }

        ConversationResult::None
    }

    /// Take the pending text. Blank input stays in place and yields nothing.
    pub fn submit(&mut self) -> ConversationResult {
        if self.state.content.trim().is_empty() {
            return ConversationResult::None;
        }

        let content = std::mem::take(&mut self.state.content);
        self.state.cursor_position = 0;

        match parse_slash_command(&content) {
            Some(command) => ConversationResult::Command(command),
            None => ConversationResult::Submitted(content),
        }
    }

    /// Insert text at the cursor position
    pub fn insert_str(&mut self, text: &str) {
        let at = self.state.byte_index(self.state.cursor_position);
        self.state.content.insert_str(at, text);
        self.state.cursor_position += text.chars().count();
    }

    /// Append text at the end, leaving the cursor after it
    pub fn append(&mut self, text: &str) {
        self.state.content.push_str(text);
        self.state.cursor_position = self.state.char_len();
    }

    /// Delete character before cursor
    fn backspace(&mut self) -> bool {
        if self.state.cursor_position == 0 {
            return false;
        }
        self.state.cursor_position -= 1;
        let at = self.state.byte_index(self.state.cursor_position);
        self.state.content.remove(at);
        true
    }

    /// Delete character at cursor
    fn delete(&mut self) -> bool {
        if self.state.cursor_position >= self.state.char_len() {
            return false;
        }
        let at = self.state.byte_index(self.state.cursor_position);
        self.state.content.remove(at);
        true
    }

    pub fn set_focus(&mut self, has_focus: bool) {
        self.has_focus = has_focus;
    }

    pub fn content(&self) -> &str {
        &self.state.content
    }

    pub fn view(&self, palette: Palette) -> ComposerView<'_> {
        ComposerView {
            composer: self,
            palette,
        }
    }
}

/// Render adapter for the composer
pub struct ComposerView<'a> {
    composer: &'a ConversationComposer,
    palette: Palette,
}

impl Widget for ComposerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let composer = self.composer;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.palette.border(composer.has_focus))
            .style(self.palette.panel());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        if composer.state.content.is_empty() {
            let placeholder = Line::from(Span::styled(&composer.placeholder, self.palette.muted()));
            buf.set_line(inner.x, inner.y, &placeholder, inner.width);
            return;
        }

        let mut content = composer.state.content.clone();
        if composer.has_focus {
            content.insert(composer.state.byte_index(composer.state.cursor_position), '▌');
        }

        // Keep the cursor end of long input visible
        let width = inner.width as usize;
        let chars: Vec<char> = content.chars().collect();
        let cursor = composer.state.cursor_position;
        let start = cursor.saturating_sub(width.saturating_sub(1));
        let visible: String = chars.iter().skip(start).collect();

        buf.set_line(inner.x, inner.y, &Line::from(visible), inner.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(composer: &mut ConversationComposer, text: &str) {
        for c in text.chars() {
            composer.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn enter_submits_and_clears() {
        let mut composer = ConversationComposer::new("Type a message");
        type_text(&mut composer, "Hello");
        assert_eq!(
            composer.handle_key(key(KeyCode::Enter)),
            ConversationResult::Submitted("Hello".to_string())
        );
        assert_eq!(composer.content(), "");
    }

    #[test]
    fn enter_on_blank_input_does_nothing() {
        let mut composer = ConversationComposer::new("Type a message");
        type_text(&mut composer, "   ");
        assert_eq!(composer.handle_key(key(KeyCode::Enter)), ConversationResult::None);
        assert_eq!(composer.content(), "   ");
    }

    #[test]
    fn slash_input_becomes_command() {
        let mut composer = ConversationComposer::new("Type a message");
        type_text(&mut composer, "/reset");
        assert_eq!(
            composer.handle_key(key(KeyCode::Enter)),
            ConversationResult::Command(SlashCommand::Reset)
        );
    }

    #[test]
    fn editing_handles_multibyte_glyphs() {
        let mut composer = ConversationComposer::new("Type a message");
        type_text(&mut composer, "hi");
        composer.append("😊");
        type_text(&mut composer, "!");
        assert_eq!(composer.content(), "hi😊!");

        composer.handle_key(key(KeyCode::Left));
        composer.handle_key(key(KeyCode::Backspace));
        assert_eq!(composer.content(), "hi!");

        composer.handle_key(key(KeyCode::Home));
        composer.insert_str("💙");
        composer.handle_key(key(KeyCode::Delete));
        assert_eq!(composer.content(), "💙i!");
    }

    #[test]
    fn release_events_are_ignored() {
        let mut composer = ConversationComposer::new("Type a message");
        let mut release = key(KeyCode::Char('x'));
        release.kind = KeyEventKind::Release;
        composer.handle_key(release);
        assert_eq!(composer.content(), "");
    }
}

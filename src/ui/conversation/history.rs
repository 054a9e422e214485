//! Scrollable message list

use crate::events::{Message, Sender};
use crate::ui::theme::Palette;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget},
};

/// Scroll position of the message list, counted in lines from the bottom
#[derive(Debug, Clone, Default)]
pub struct ChatScroll {
    offset: usize,
}

impl ChatScroll {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
    }

    /// Follow the newest message
    pub fn scroll_to_bottom(&mut self) {
        self.offset = 0;
    }
}

/// Message list widget
pub struct ConversationHistory<'a> {
    pub messages: &'a [Message],
    pub scroll: &'a ChatScroll,
    pub palette: Palette,
    /// Animated "typing" line shown while replies are pending
    pub typing: Option<String>,
}

impl Widget for ConversationHistory<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.palette.border(false))
            .style(self.palette.base());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        // (line, right-aligned)
        let mut all_lines: Vec<(Line, bool)> = Vec::new();
        for message in self.messages {
            let right = message.sender == Sender::User;
            all_lines.extend(
                render_message(message, inner.width, &self.palette)
                    .into_iter()
                    .map(|line| (line, right)),
            );
            // spacing between messages
            all_lines.push((Line::default(), false));
        }
        if let Some(typing) = self.typing {
            all_lines.push((Line::from(Span::styled(typing, self.palette.muted())), false));
        }

        // Bottom-anchored window, moved up by the scroll offset
        let height = inner.height as usize;
        let total = all_lines.len();
        let max_offset = total.saturating_sub(height);
        let offset = self.scroll.offset().min(max_offset);
        let end = total - offset;
        let start = end.saturating_sub(height);

        for (i, (line, right)) in all_lines[start..end].iter().enumerate() {
            let indent = if *right {
                inner.width.saturating_sub(line.width() as u16)
            } else {
                0
            };
            buf.set_line(inner.x + indent, inner.y + i as u16, line, inner.width - indent);
        }

        if total > height {
            let mut state = ScrollbarState::new(max_offset).position(max_offset - offset);
            Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .render(area, buf, &mut state);
        }
    }
}

/// Render a single message into padded bubble lines
fn render_message(message: &Message, width: u16, palette: &Palette) -> Vec<Line<'static>> {
    let bubble_width = (width as usize * 3 / 4).max(1);
    let style = content_style(message.sender, palette);

    wrap_text(&message.text, bubble_width.saturating_sub(2))
        .into_iter()
        .map(|text| Line::from(Span::styled(format!(" {} ", text), style)))
        .collect()
}

fn content_style(sender: Sender, palette: &Palette) -> Style {
    match sender {
        Sender::User => Style::default().fg(palette.text).bg(palette.user),
        Sender::Bot => Style::default().fg(palette.text).bg(palette.bot),
    }
}

/// Wrap text to fit within the given display width, keeping explicit line breaks
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current_line = String::new();
        let mut current_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = Span::raw(word).width();
            if current_width > 0 && current_width + 1 + word_width > width {
                lines.push(std::mem::take(&mut current_line));
                current_width = 0;
            }
            if current_width > 0 {
                current_line.push(' ');
                current_width += 1;
            }
            current_line.push_str(word);
            current_width += word_width;
        }

        lines.push(current_line);
    }

    lines
}

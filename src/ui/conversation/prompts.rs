use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use crate::ui::theme::Palette;

/// Canned prompts offered above the input bar
pub const PROMPT_SUGGESTIONS: &[&str] = &[
    "I'm feeling stressed",
    "Give me motivation",
    "I need help sleeping",
    "Tell me a joke",
    "What can you do?",
];

/// Place one button per suggestion left to right on a single row.
/// Buttons that do not fit are dropped.
pub fn button_rects(area: Rect) -> Vec<(usize, Rect)> {
    let mut rects = Vec::new();
    let mut x = area.x;

    for (index, prompt) in PROMPT_SUGGESTIONS.iter().enumerate() {
        let width = Span::raw(label(prompt)).width() as u16;
        if x + width > area.right() {
            break;
        }
        rects.push((index, Rect::new(x, area.y, width, 1)));
        x += width + 1;
    }

    rects
}

/// Suggestion under column `x` of the bar
pub fn prompt_at(area: Rect, x: u16, y: u16) -> Option<&'static str> {
    if y != area.y {
        return None;
    }
    button_rects(area)
        .into_iter()
        .find(|(_, rect)| x >= rect.x && x < rect.right())
        .map(|(index, _)| PROMPT_SUGGESTIONS[index])
}

fn label(prompt: &str) -> String {
    format!("[ {} ]", prompt)
}

/// Suggestion bar widget
pub struct PromptBar {
    pub palette: Palette,
}

impl Widget for PromptBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (index, rect) in button_rects(area) {
            let line = Line::from(Span::styled(
                label(PROMPT_SUGGESTIONS[index]),
                self.palette.button(),
            ));
            buf.set_line(rect.x, rect.y, &line, rect.width);
        }
    }
}

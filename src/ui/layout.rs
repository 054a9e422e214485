//! Screen regions, shared by rendering and pointer hit-testing

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Span;

use crate::ui::conversation::emoji::EmojiPicker;

/// Width kept for the chat column when the sidebar is wide
const MIN_CHAT_WIDTH: u16 = 24;

/// Width of the emoji and send buttons beside the composer
const INPUT_BUTTON_WIDTH: u16 = 5;

/// Clickable controls in the chat header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderButton {
    Reset,
    Export,
    Theme,
}

impl HeaderButton {
    pub const ALL: [HeaderButton; 3] = [HeaderButton::Reset, HeaderButton::Export, HeaderButton::Theme];

    /// Button caption; the theme caption depends on the active theme
    pub fn label(self, theme_glyph: &str) -> String {
        match self {
            HeaderButton::Reset => "[🗑 reset]".to_string(),
            HeaderButton::Export => "[💾 save]".to_string(),
            HeaderButton::Theme => format!("[{} theme]", theme_glyph),
        }
    }
}

/// Rectangles of every region drawn in one frame
#[derive(Debug, Clone, Default)]
pub struct ScreenLayout {
    pub sidebar: Option<Rect>,
    pub resizer: Option<Rect>,
    pub header: Rect,
    pub header_buttons: Vec<(HeaderButton, Rect)>,
    pub chat: Rect,
    pub prompts: Rect,
    pub emoji_button: Rect,
    pub composer: Rect,
    pub send_button: Rect,
    pub status: Rect,
    pub emoji_picker: Option<Rect>,
}

impl ScreenLayout {
    /// Split `area` into regions. The sidebar is omitted when `sidebar_width`
    /// is `None` (narrow terminals).
    pub fn compute(
        area: Rect,
        sidebar_width: Option<u16>,
        picker_visible: bool,
        theme_glyph: &str,
    ) -> Self {
        let mut layout = ScreenLayout::default();

        let chat_column = match sidebar_width {
            Some(width) => {
                let width = width.min(area.width.saturating_sub(MIN_CHAT_WIDTH + 1));
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([
                        Constraint::Length(width),
                        Constraint::Length(1),
                        Constraint::Min(0),
                    ])
                    .split(area);
                layout.sidebar = Some(columns[0]);
                layout.resizer = Some(columns[1]);
                columns[2]
            }
            None => area,
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(3),    // Messages
                Constraint::Length(1), // Prompt suggestions
                Constraint::Length(3), // Input bar
                Constraint::Length(1), // Status
            ])
            .split(chat_column);

        layout.header = rows[0];
        layout.chat = rows[1];
        layout.prompts = rows[2];
        layout.status = rows[4];

        let input = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(INPUT_BUTTON_WIDTH),
                Constraint::Min(1),
                Constraint::Length(INPUT_BUTTON_WIDTH),
            ])
            .split(rows[3]);
        layout.emoji_button = input[0];
        layout.composer = input[1];
        layout.send_button = input[2];

        layout.header_buttons = header_buttons(layout.header, theme_glyph);

        if picker_visible {
            let (width, height) = EmojiPicker::size();
            let width = width.min(chat_column.width);
            let height = height.min(rows[3].y.saturating_sub(chat_column.y));
            layout.emoji_picker = Some(Rect::new(
                chat_column.x,
                rows[3].y.saturating_sub(height),
                width,
                height,
            ));
        }

        layout
    }
}

/// Header buttons, right-aligned with one column between them
fn header_buttons(header: Rect, theme_glyph: &str) -> Vec<(HeaderButton, Rect)> {
    let mut rects = Vec::new();
    let mut right = header.right();

    for button in HeaderButton::ALL.iter().rev() {
        let width = Span::raw(button.label(theme_glyph)).width() as u16;
        if right < header.x + width {
            break;
        }
        right -= width;
        rects.push((*button, Rect::new(right, header.y, width, 1)));
        right = right.saturating_sub(1);
    }

    rects.reverse();
    rects
}

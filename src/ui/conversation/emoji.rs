use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::ui::theme::Palette;

/// Glyphs offered by the picker
pub const EMOJIS: &[&str] = &[
    "😊", "😂", "🥲", "😍", "🤗", "😌", "😔", "😢",
    "😭", "😤", "😡", "😰", "😴", "🤔", "🙄", "😅",
    "👍", "👎", "🙏", "👏", "💪", "🤝", "👋", "✌️",
    "💙", "❤️", "💔", "✨", "🌈", "☀️", "🌙", "🔥",
    "🎉", "🌸", "🍵", "☕", "📚", "🎵", "🧘", "🫂",
];

/// Emoji per picker row
pub const COLUMNS: usize = 8;

/// Terminal columns taken by one emoji cell
const CELL_WIDTH: u16 = 3;

/// Visibility and keyboard cursor of the emoji picker
#[derive(Debug, Clone, Default)]
pub struct EmojiPicker {
    visible: bool,
    cursor: usize,
}

impl EmojiPicker {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the keyboard cursor by whole cells, wrapping around
    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        let len = EMOJIS.len() as isize;
        let next = self.cursor as isize + dx + dy * COLUMNS as isize;
        self.cursor = next.rem_euclid(len) as usize;
    }

    pub fn selected(&self) -> &'static str {
        EMOJIS[self.cursor]
    }

    /// Handle a pointer press at `(x, y)` against the picker drawn at `area`.
    ///
    /// Presses outside the picker dismiss it. Presses on a cell return the
    /// glyph and leave the picker open.
    pub fn click(&mut self, area: Rect, x: u16, y: u16) -> Option<&'static str> {
        if !self.visible {
            return None;
        }
        if !contains(area, x, y) {
            self.close();
            return None;
        }

        let inner = Self::inner(area);
        if !contains(inner, x, y) {
            return None;
        }
        let col = ((x - inner.x) / CELL_WIDTH) as usize;
        let row = (y - inner.y) as usize;
        if col >= COLUMNS {
            return None;
        }
        let index = row * COLUMNS + col;
        let glyph = EMOJIS.get(index).copied()?;
        self.cursor = index;
        Some(glyph)
    }

    /// Size of the picker popup including its border
    pub fn size() -> (u16, u16) {
        let rows = EMOJIS.len().div_ceil(COLUMNS) as u16;
        (COLUMNS as u16 * CELL_WIDTH + 2, rows + 2)
    }

    fn inner(area: Rect) -> Rect {
        Block::default().borders(Borders::ALL).inner(area)
    }
}

pub fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.right() && y >= area.y && y < area.bottom()
}

/// Picker popup widget
pub struct EmojiGrid<'a> {
    pub picker: &'a EmojiPicker,
    pub palette: Palette,
}

impl Widget for EmojiGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Emoji")
            .border_style(self.palette.border(true))
            .style(self.palette.panel());
        let inner = block.inner(area);
        block.render(area, buf);

        for (row, chunk) in EMOJIS.chunks(COLUMNS).enumerate() {
            if row >= inner.height as usize {
                break;
            }
            let spans: Vec<Span> = chunk
                .iter()
                .enumerate()
                .map(|(col, glyph)| {
                    let index = row * COLUMNS + col;
                    let style = if index == self.picker.cursor() {
                        self.palette.selected()
                    } else {
                        self.palette.panel()
                    };
                    Span::styled(format!("{} ", glyph), style)
                })
                .collect();
            buf.set_line(inner.x, inner.y + row as u16, &Line::from(spans), inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_picker() -> EmojiPicker {
        let mut picker = EmojiPicker::default();
        picker.toggle();
        picker
    }

    #[test]
    fn toggle_flips_visibility() {
        let mut picker = EmojiPicker::default();
        assert!(!picker.is_visible());
        picker.toggle();
        assert!(picker.is_visible());
        picker.toggle();
        assert!(!picker.is_visible());
    }

    #[test]
    fn click_outside_dismisses() {
        let mut picker = open_picker();
        let area = Rect::new(10, 10, 26, 7);
        assert_eq!(picker.click(area, 2, 2), None);
        assert!(!picker.is_visible());
    }

    #[test]
    fn click_on_cell_selects_and_stays_open() {
        let mut picker = open_picker();
        let area = Rect::new(10, 10, 26, 7);

        assert_eq!(picker.click(area, 11, 11), Some(EMOJIS[0]));
        assert_eq!(picker.click(area, 11 + CELL_WIDTH, 12), Some(EMOJIS[COLUMNS + 1]));
        assert!(picker.is_visible());
    }

    #[test]
    fn click_on_border_keeps_picker_open() {
        let mut picker = open_picker();
        let area = Rect::new(10, 10, 26, 7);
        assert_eq!(picker.click(area, 10, 10), None);
        assert!(picker.is_visible());
    }

    #[test]
    fn cursor_wraps() {
        let mut picker = open_picker();
        picker.move_cursor(-1, 0);
        assert_eq!(picker.selected(), *EMOJIS.last().unwrap());
        picker.move_cursor(1, 0);
        assert_eq!(picker.cursor(), 0);
        picker.move_cursor(0, 1);
        assert_eq!(picker.cursor(), COLUMNS);
    }
}

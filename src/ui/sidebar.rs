//! History sidebar: drag-resize state and the entry list

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use uuid::Uuid;

use crate::storage::HistoryEntry;
use crate::ui::theme::Palette;

/// Rows above the first history entry: header, filter line, "Relie Bot" row
pub const LIST_OFFSET: u16 = 3;

/// Resize gesture state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging,
}

/// Width and resize behaviour of the sidebar
#[derive(Debug, Clone)]
pub struct SidebarState {
    width: u16,
    min: u16,
    max: u16,
    drag: DragState,
    narrow: bool,
    /// Index into the filtered entry list
    pub selected: usize,
    pub query: String,
}

impl SidebarState {
    pub fn new(width: u16, min: u16, max: u16) -> Self {
        Self {
            width: width.clamp(min, max),
            min,
            max,
            drag: DragState::Idle,
            narrow: false,
            selected: 0,
            query: String::new(),
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_narrow(&self) -> bool {
        self.narrow
    }

    /// Hide the sidebar on narrow terminals
    pub fn set_narrow(&mut self, narrow: bool) {
        self.narrow = narrow;
        if narrow {
            self.drag = DragState::Idle;
        }
    }

    /// Pointer pressed on the resize handle
    pub fn start_drag(&mut self) {
        if !self.narrow {
            self.drag = DragState::Dragging;
        }
    }

    /// Pointer moved to column `x`
    pub fn drag_to(&mut self, x: u16) {
        if self.drag != DragState::Dragging || self.narrow {
            return;
        }
        self.width = x.clamp(self.min, self.max);
    }

    /// Pointer released anywhere
    pub fn stop_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Entries matching the filter query, newest first
    pub fn visible<'a>(&self, entries: &'a [HistoryEntry]) -> Vec<&'a HistoryEntry> {
        let query = self.query.trim().to_lowercase();
        entries
            .iter()
            .filter(|entry| query.is_empty() || entry_matches(entry, &query))
            .collect()
    }

    pub fn move_selection(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = (self.selected as isize + delta).rem_euclid(len as isize);
        self.selected = next as usize;
    }

    /// Id of the selected entry in the filtered list
    pub fn selected_id(&self, entries: &[HistoryEntry]) -> Option<Uuid> {
        self.visible(entries).get(self.selected).map(|entry| entry.id)
    }

    /// Id of the entry drawn at screen row `row` of a sidebar at `area`
    pub fn entry_at(&self, area: Rect, row: u16, entries: &[HistoryEntry]) -> Option<Uuid> {
        let first = area.y + 1 + LIST_OFFSET;
        if row < first || row >= area.bottom().saturating_sub(1) {
            return None;
        }
        let visible = self.visible(entries);
        let index = (row - first) as usize + self.scroll_for(area, visible.len());
        visible.get(index).map(|entry| entry.id)
    }

    pub fn push_query(&mut self, c: char) {
        self.query.push(c);
        self.selected = 0;
    }

    pub fn pop_query(&mut self) {
        self.query.pop();
        self.selected = 0;
    }

    /// First visible list index so that the selection stays on screen
    fn scroll_for(&self, area: Rect, len: usize) -> usize {
        let rows = area.height.saturating_sub(2 + LIST_OFFSET) as usize;
        if rows == 0 || len <= rows {
            return 0;
        }
        self.selected.saturating_sub(rows - 1).min(len - rows)
    }
}

fn entry_matches(entry: &HistoryEntry, query: &str) -> bool {
    entry.timestamp.to_lowercase().contains(query)
        || entry
            .messages
            .iter()
            .any(|message| message.text.to_lowercase().contains(query))
}

/// Sidebar widget
pub struct Sidebar<'a> {
    pub state: &'a SidebarState,
    pub entries: &'a [HistoryEntry],
    pub palette: Palette,
    pub focused: bool,
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.palette.border(self.focused))
            .style(self.palette.panel());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        let header = Line::from(Span::styled("Relie", self.palette.button()));
        buf.set_line(inner.x, inner.y, &header, inner.width);

        let filter = if self.state.query.is_empty() {
            Line::from(Span::styled(
                "🔍 Search or start a new chat",
                self.palette.muted(),
            ))
        } else {
            Line::from(format!("🔍 {}", self.state.query))
        };
        if inner.height > 1 {
            buf.set_line(inner.x, inner.y + 1, &filter, inner.width);
        }
        if inner.height > 2 {
            let active = Line::from(Span::styled("🧠 Relie Bot", self.palette.button()));
            buf.set_line(inner.x, inner.y + 2, &active, inner.width);
        }

        let visible = self.state.visible(self.entries);
        let rows = inner.height.saturating_sub(LIST_OFFSET) as usize;
        let skip = self.state.scroll_for(area, visible.len());

        for (row, (index, entry)) in visible.iter().enumerate().skip(skip).take(rows).enumerate() {
            let style = if self.focused && index == self.state.selected {
                self.palette.selected()
            } else {
                self.palette.panel()
            };
            let line = Line::from(Span::styled(format!("🗂 {}", entry.timestamp), style));
            buf.set_line(inner.x, inner.y + LIST_OFFSET + row as u16, &line, inner.width);
        }
    }
}

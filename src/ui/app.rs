use anyhow::{Context, Result};
use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::mpsc;
use tokio::time::Duration;

use crate::config::Config;
use crate::events::AppEvent;
use crate::export;
use crate::session::ChatSession;
use crate::ui::conversation::emoji::contains;
use crate::ui::conversation::prompts::prompt_at;
use crate::ui::conversation::typing::typing_indicator;
use crate::ui::conversation::{
    get_help_text, ChatScroll, ConversationComposer, ConversationHistory, ConversationResult,
    EmojiGrid, EmojiPicker, PromptBar, SlashCommand,
};
use crate::ui::layout::{HeaderButton, ScreenLayout};
use crate::ui::sidebar::{DragState, Sidebar, SidebarState};
use crate::ui::theme::ThemeMode;
use crate::ui::Tui;

/// Lines moved per wheel notch
const SCROLL_STEP: usize = 3;

/// Which panel receives keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Composer,
    /// Keyboard selection inside the open emoji picker
    Picker,
    Sidebar,
}

/// Main application state
pub struct App {
    config: Config,
    session: ChatSession,
    composer: ConversationComposer,
    sidebar: SidebarState,
    picker: EmojiPicker,
    scroll: ChatScroll,
    theme: ThemeMode,
    focus: Focus,
    /// Transport calls still in flight
    pending: usize,
    status: Option<String>,
    /// Regions of the last drawn frame, for pointer hit-testing
    layout: ScreenLayout,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    running: bool,
}

impl App {
    pub fn new(config: Config, session: ChatSession) -> Self {
        let ui = &config.ui;
        let sidebar = SidebarState::new(ui.sidebar_width, ui.sidebar_min, ui.sidebar_max);
        let theme = ui.theme;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            config,
            session,
            composer: ConversationComposer::new("Type a message"),
            sidebar,
            picker: EmojiPicker::default(),
            scroll: ChatScroll::default(),
            theme,
            focus: Focus::Composer,
            pending: 0,
            status: None,
            layout: ScreenLayout::default(),
            events_tx,
            events_rx,
            running: true,
        }
    }

    /// Drive the UI until the user quits
    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut terminal_events = EventStream::new();
        let mut tick = tokio::time::interval(Duration::from_millis(250));

        let size = terminal.size().context("Failed to read terminal size")?;
        self.handle_resize(size.width);

        while self.running {
            terminal
                .draw(|frame| self.render(frame))
                .context("Failed to draw frame")?;

            tokio::select! {
                maybe_event = terminal_events.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_terminal_event(event),
                    Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                    None => self.running = false,
                },
                Some(event) = self.events_rx.recv() => self.handle_app_event(event),
                _ = tick.tick() => {}
            }
        }

        tracing::info!("shutting down");
        Ok(())
    }

    fn handle_terminal_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, _) => self.handle_resize(width),
            Event::Paste(text) => self.composer.insert_str(&text),
            _ => {}
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ReplyReady { token, result } => {
                self.pending = self.pending.saturating_sub(1);
                match self.session.complete(token, result) {
                    Ok(true) => self.scroll.scroll_to_bottom(),
                    Ok(false) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "failed to save history");
                        self.status = Some(format!("⚠️ Could not save history: {}", e));
                        self.scroll.scroll_to_bottom();
                    }
                }
            }
        }
    }

    fn handle_resize(&mut self, width: u16) {
        self.sidebar.set_narrow(width <= self.config.ui.narrow_breakpoint);
        if self.sidebar.is_narrow() && self.focus == Focus::Sidebar {
            self.set_focus(Focus::Composer);
        }
    }

    /// Handle key input
    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.running = false,
                KeyCode::Char('e') => self.toggle_picker(),
                KeyCode::Char('r') => self.reset(),
                KeyCode::Char('s') => self.export(),
                KeyCode::Char('t') => self.toggle_theme(),
                _ => {}
            }
            return;
        }

        let page = self.page_size();
        match key.code {
            KeyCode::PageUp => return self.scroll.scroll_up(page),
            KeyCode::PageDown => return self.scroll.scroll_down(page),
            KeyCode::Tab => return self.cycle_focus(),
            _ => {}
        }

        match self.focus {
            Focus::Picker => self.handle_picker_key(key),
            Focus::Sidebar => self.handle_sidebar_key(key),
            Focus::Composer if key.code == KeyCode::Esc && self.picker.is_visible() => {
                self.close_picker()
            }
            Focus::Composer => {
                let result = self.composer.handle_key(key);
                self.handle_composer_result(result);
            }
        }
    }

    /// Composer, then the open picker, then the sidebar on wide terminals
    fn cycle_focus(&mut self) {
        let next = match self.focus {
            Focus::Composer if self.picker.is_visible() => Focus::Picker,
            Focus::Composer | Focus::Picker if !self.sidebar.is_narrow() => Focus::Sidebar,
            _ => Focus::Composer,
        };
        self.set_focus(next);
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.picker.move_cursor(-1, 0),
            KeyCode::Right => self.picker.move_cursor(1, 0),
            KeyCode::Up => self.picker.move_cursor(0, -1),
            KeyCode::Down => self.picker.move_cursor(0, 1),
            KeyCode::Enter => self.composer.append(self.picker.selected()),
            KeyCode::Esc => self.close_picker(),
            _ => {}
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) {
        let len = self.sidebar.visible(self.session.history()).len();
        match key.code {
            KeyCode::Up => self.sidebar.move_selection(-1, len),
            KeyCode::Down => self.sidebar.move_selection(1, len),
            KeyCode::Enter => {
                if let Some(id) = self.sidebar.selected_id(self.session.history()) {
                    self.load_history(id);
                }
            }
            KeyCode::Esc => self.set_focus(Focus::Composer),
            KeyCode::Backspace => self.sidebar.pop_query(),
            KeyCode::Char(c) => self.sidebar.push_query(c),
            _ => {}
        }
    }

    fn handle_composer_result(&mut self, result: ConversationResult) {
        match result {
            ConversationResult::Submitted(text) => self.send(&text),
            ConversationResult::Command(command) => self.run_command(command),
            ConversationResult::None => {}
        }
    }

    /// Handle slash commands
    fn run_command(&mut self, command: SlashCommand) {
        match command {
            SlashCommand::Reset => self.reset(),
            SlashCommand::Export => self.export(),
            SlashCommand::Theme => self.toggle_theme(),
            SlashCommand::Emoji => self.toggle_picker(),
            SlashCommand::Help => self.status = Some(get_help_text()),
            SlashCommand::Bye => self.running = false,
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(x, y),
            MouseEventKind::Down(_) => self.dismiss_picker_at(x, y),
            MouseEventKind::Drag(MouseButton::Left) => self.sidebar.drag_to(x),
            MouseEventKind::Up(_) => self.sidebar.stop_drag(),
            MouseEventKind::ScrollUp => self.scroll.scroll_up(SCROLL_STEP),
            MouseEventKind::ScrollDown => self.scroll.scroll_down(SCROLL_STEP),
            _ => {}
        }
    }

    /// Any button press outside the open picker dismisses it
    fn dismiss_picker_at(&mut self, x: u16, y: u16) {
        if let Some(area) = self.layout.emoji_picker {
            if !contains(area, x, y) {
                self.close_picker();
            }
        }
    }

    fn handle_click(&mut self, x: u16, y: u16) {
        if self.picker.is_visible() {
            if contains(self.layout.emoji_button, x, y) {
                return self.close_picker();
            }
            if let Some(area) = self.layout.emoji_picker {
                if contains(area, x, y) {
                    if let Some(glyph) = self.picker.click(area, x, y) {
                        self.composer.append(glyph);
                    }
                    return;
                }
                self.close_picker();
            }
        }

        if self.layout.resizer.is_some_and(|area| contains(area, x, y)) {
            return self.sidebar.start_drag();
        }

        if let Some(area) = self.layout.sidebar.filter(|area| contains(*area, x, y)) {
            self.set_focus(Focus::Sidebar);
            if let Some(id) = self.sidebar.entry_at(area, y, self.session.history()) {
                self.load_history(id);
            }
            return;
        }

        let button = self
            .layout
            .header_buttons
            .iter()
            .find(|(_, area)| contains(*area, x, y))
            .map(|(button, _)| *button);
        if let Some(button) = button {
            return match button {
                HeaderButton::Reset => self.reset(),
                HeaderButton::Export => self.export(),
                HeaderButton::Theme => self.toggle_theme(),
            };
        }

        if let Some(prompt) = prompt_at(self.layout.prompts, x, y) {
            return self.send(prompt);
        }

        if contains(self.layout.emoji_button, x, y) {
            return self.toggle_picker();
        }

        if contains(self.layout.send_button, x, y) {
            let result = self.composer.submit();
            return self.handle_composer_result(result);
        }

        if contains(self.layout.composer, x, y) {
            self.set_focus(Focus::Composer);
        }
    }

    /// Append the user's message and fire its transport call in the background
    fn send(&mut self, text: &str) {
        let Some(pending) = self.session.begin_send(text) else {
            return;
        };

        self.close_picker();
        self.scroll.scroll_to_bottom();
        self.pending += 1;

        let transport = self.session.transport();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = ChatSession::deliver(transport, &pending).await;
            let _ = tx.send(AppEvent::ReplyReady {
                token: pending.token,
                result,
            });
        });
    }

    fn reset(&mut self) {
        self.session.reset();
        self.scroll.scroll_to_bottom();
        self.status = None;
    }

    fn load_history(&mut self, id: uuid::Uuid) {
        if self.session.load_from(&id) {
            self.scroll.scroll_to_bottom();
        }
    }

    fn export(&mut self) {
        self.status = Some(
            match export::write_transcript(&self.config.download_dir, self.session.messages()) {
                Ok(path) => format!("💾 Saved transcript to {}", path.display()),
                Err(e) => {
                    tracing::error!(error = %e, "export failed");
                    format!("⚠️ {}", e)
                }
            },
        );
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    fn toggle_picker(&mut self) {
        if self.picker.is_visible() {
            self.close_picker();
        } else {
            self.picker.toggle();
        }
    }

    /// Hide the picker; keyboard focus inside it returns to the composer
    fn close_picker(&mut self) {
        self.picker.close();
        if self.focus == Focus::Picker {
            self.set_focus(Focus::Composer);
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.composer.set_focus(focus == Focus::Composer);
    }

    fn page_size(&self) -> usize {
        (self.layout.chat.height as usize / 2).max(1)
    }

    /// Recompute hit-test regions for a frame of size `area`
    fn relayout(&mut self, area: Rect) {
        let sidebar_width = (!self.sidebar.is_narrow()).then(|| self.sidebar.width());
        self.layout = ScreenLayout::compute(
            area,
            sidebar_width,
            self.picker.is_visible(),
            self.theme.toggle_label(),
        );
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let palette = self.theme.palette();
        frame.render_widget(Block::default().style(palette.base()), area);

        self.relayout(area);
        let layout = &self.layout;

        if let (Some(sidebar_area), Some(resizer_area)) = (layout.sidebar, layout.resizer) {
            frame.render_widget(
                Sidebar {
                    state: &self.sidebar,
                    entries: self.session.history(),
                    palette,
                    focused: self.focus == Focus::Sidebar,
                },
                sidebar_area,
            );
            let dragging = self.sidebar.drag_state() == DragState::Dragging;
            let handle = vec![Line::from("┃"); resizer_area.height as usize];
            frame.render_widget(
                Paragraph::new(handle).style(palette.border(dragging)),
                resizer_area,
            );
        }

        render_header(frame, layout, self.theme);

        let typing = typing_indicator(self.pending);
        frame.render_widget(
            ConversationHistory {
                messages: self.session.messages(),
                scroll: &self.scroll,
                palette,
                typing,
            },
            layout.chat,
        );

        frame.render_widget(PromptBar { palette }, layout.prompts);

        let button_block = Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border(false));
        frame.render_widget(
            Paragraph::new("😊")
                .alignment(Alignment::Center)
                .block(button_block.clone()),
            layout.emoji_button,
        );
        frame.render_widget(self.composer.view(palette), layout.composer);
        frame.render_widget(
            Paragraph::new("➤")
                .alignment(Alignment::Center)
                .style(palette.button())
                .block(button_block),
            layout.send_button,
        );

        let status = match &self.status {
            Some(status) => Line::from(status.as_str()),
            None => Line::from(Span::styled(
                "Enter send · Tab focus · Ctrl+E emoji · /help",
                palette.muted(),
            )),
        };
        frame.render_widget(Paragraph::new(status), layout.status);

        if let Some(picker_area) = layout.emoji_picker {
            frame.render_widget(
                EmojiGrid {
                    picker: &self.picker,
                    palette,
                },
                picker_area,
            );
        }
    }
}

fn render_header(frame: &mut Frame, layout: &ScreenLayout, theme: ThemeMode) {
    let palette = theme.palette();
    let title = Paragraph::new(Line::from(Span::styled("Relie 💬", palette.button())))
        .style(palette.panel());
    frame.render_widget(title, layout.header);

    for (button, area) in &layout.header_buttons {
        let label = Paragraph::new(Line::from(Span::styled(
            button.label(theme.toggle_label()),
            palette.button(),
        )));
        frame.render_widget(label, *area);
    }
}

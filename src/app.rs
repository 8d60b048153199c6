use crate::config;
use crate::data::{self, DashboardSnapshot, SnapshotSource};
use crate::ui;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::widgets::TableState;
use std::io;
use tracing::warn;

pub struct App {
    pub should_quit: bool,
    pub source: SnapshotSource,
    pub snapshot: Option<DashboardSnapshot>,
    pub load_error: Option<String>,
    pub history_state: TableState,
}

impl App {
    pub fn new(source: SnapshotSource) -> Self {
        Self {
            should_quit: false,
            source,
            snapshot: None,
            load_error: None,
            history_state: TableState::default(),
        }
    }

    /// One fetch attempt. On failure the header shows the message and
    /// every panel stays in its empty state until the user reloads.
    pub async fn load(&mut self) {
        match data::load_snapshot(&self.source).await {
            Ok(snapshot) => self.apply_snapshot(snapshot),
            Err(error) => {
                warn!("Snapshot load failed: {error:#}");
                self.apply_error(error.to_string());
            }
        }
    }

    /// Installs a snapshot and lands the selection on the most recent
    /// history record, which is what the detail panel should open on.
    pub fn apply_snapshot(&mut self, snapshot: DashboardSnapshot) {
        self.history_state = TableState::default();
        self.history_state
            .select(snapshot.history.len().checked_sub(1));
        self.snapshot = Some(snapshot);
        self.load_error = None;
    }

    pub fn apply_error(&mut self, message: String) {
        self.snapshot = None;
        self.load_error = Some(message);
        self.history_state = TableState::default();
    }

    pub fn history_len(&self) -> usize {
        self.snapshot.as_ref().map_or(0, |s| s.history.len())
    }

    /// Selected history index, ignoring any selection that outlived
    /// the rows it pointed at.
    pub fn selected_history(&self) -> Option<usize> {
        let len = self.history_len();
        self.history_state.selected().filter(|&index| index < len)
    }

    pub async fn run(&mut self, terminal: &mut crate::tui::Tui) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|f| ui::render(f, self))?;

            if event::poll(std::time::Duration::from_millis(config::EVENT_POLL_MILLIS))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key).await,
                    Event::Mouse(mouse) => {
                        let size = terminal.size()?;
                        self.on_mouse(mouse, Rect::new(0, 0, size.width, size.height));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    async fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') => self.load().await,
            KeyCode::Up | KeyCode::Char('k') => self.select_step(-1),
            KeyCode::Down | KeyCode::Char('j') => self.select_step(1),
            KeyCode::Home => self.select_index(0),
            KeyCode::End => self.select_index(self.history_len().saturating_sub(1)),
            KeyCode::Enter | KeyCode::Char(' ') => self.confirm_selection(),
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent, frame: Rect) {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return;
        }
        let layout = ui::layout(frame);
        if let Some(index) =
            ui::history_row_at(layout.history, &self.history_state, mouse.column, mouse.row)
        {
            self.select_index(index);
        }
    }

    fn select_step(&mut self, delta: isize) {
        let len = self.history_len();
        if len == 0 {
            return;
        }
        let current = self.selected_history().unwrap_or(len - 1) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.history_state.select(Some(next as usize));
    }

    fn select_index(&mut self, index: usize) {
        if index < self.history_len() {
            self.history_state.select(Some(index));
        }
    }

    /// Enter/Space pins the selection; with nothing selected yet it
    /// falls back to the most recent record.
    fn confirm_selection(&mut self) {
        if self.selected_history().is_none() {
            self.select_index(self.history_len().saturating_sub(1));
        }
    }
}

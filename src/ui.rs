use color_eyre::Result;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use freewrite::editor::Cursor;
use freewrite::entry::Entry;
use freewrite::entry_store::EntryStore;
use freewrite::preferences::{Preferences, Toggle};
use freewrite::storage::KeyValueStore;
use freewrite::timer::Timer;
use rand::seq::SliceRandom;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{
    io::{stdout, Stdout},
    time::{Duration, Instant},
};
use unicode_width::UnicodeWidthChar;

const SIDEBAR_WIDTH: u16 = 34;
const EDITOR_MAX_WIDTH: u16 = 80;

const PLACEHOLDERS: [&str; 8] = [
    "Begin writing",
    "Pick a thought and go",
    "Start typing",
    "What's on your mind",
    "Just start",
    "Type your first thought",
    "Start with one sentence",
    "Just say it",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NewEntry,
    Save,
    Select(String),
    Delete(String),
    Toggle(Toggle),
    NextFontSize,
    NextFontFamily,
    ToggleControls,
    ToggleTimer,
    ResetTimer,
    EditTimer,
    SetTimer(String),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Editor,
    Sidebar,
    TimerInput,
}

/// Focus, cursor and in-progress input; everything the key handler mutates
#[derive(Debug)]
pub struct EditorState {
    focus: Focus,
    cursor: Cursor,
    sidebar_index: usize,
    timer_input: String,
}

impl EditorState {
    pub fn new() -> Self {
        EditorState {
            focus: Focus::Editor,
            cursor: Cursor::default(),
            sidebar_index: 0,
            timer_input: String::new(),
        }
    }

    pub fn handle_key<S: KeyValueStore>(
        &mut self,
        key: KeyEvent,
        store: &mut EntryStore<S>,
        prefs: &Preferences,
    ) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if self.focus == Focus::Sidebar && !prefs.sidebar_visible {
            self.focus = Focus::Editor;
        }
        if self.focus == Focus::TimerInput {
            return self.timer_key(key.code);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('s') => Some(Action::Save),
                KeyCode::Char('n') => Some(Action::NewEntry),
                KeyCode::Char('b') => Some(Action::Toggle(Toggle::Sidebar)),
                KeyCode::Char('d') => Some(Action::Toggle(Toggle::DarkMode)),
                KeyCode::Char('r') => Some(Action::Toggle(Toggle::RtlMode)),
                KeyCode::Char('t') => Some(Action::ToggleTimer),
                _ => None,
            };
        }

        match key.code {
            KeyCode::F(2) => return Some(Action::NextFontSize),
            KeyCode::F(3) => return Some(Action::NextFontFamily),
            KeyCode::F(4) => return Some(Action::EditTimer),
            KeyCode::F(5) => return Some(Action::ResetTimer),
            KeyCode::F(6) => return Some(Action::ToggleControls),
            KeyCode::Tab => {
                self.switch_focus(store, prefs);
                return None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Sidebar => self.sidebar_key(key.code, store.entries()),
            _ => self.editor_key(key.code, store.buffer_mut()),
        }
    }

    /// Start editing the timer, prefilled with its current value
    pub fn begin_timer_input(&mut self, current: String) {
        self.timer_input = current;
        self.focus = Focus::TimerInput;
    }

    /// Move the cursor to the end of a freshly loaded buffer
    pub fn reset_cursor(&mut self, buffer: &str) {
        self.cursor = Cursor::at_end(buffer);
    }

    fn switch_focus<S: KeyValueStore>(&mut self, store: &EntryStore<S>, prefs: &Preferences) {
        self.focus = match self.focus {
            Focus::Editor if prefs.sidebar_visible => {
                self.sidebar_index = selected_index(store).unwrap_or(0);
                Focus::Sidebar
            }
            _ => Focus::Editor,
        };
    }

    fn editor_key(&mut self, code: KeyCode, buffer: &mut String) -> Option<Action> {
        self.cursor.clamp(buffer);
        match code {
            KeyCode::Esc => return Some(Action::Quit),
            KeyCode::Char(c) => self.cursor.insert_char(buffer, c),
            KeyCode::Enter => self.cursor.insert_char(buffer, '\n'),
            KeyCode::Backspace => self.cursor.backspace(buffer),
            KeyCode::Delete => self.cursor.delete(buffer),
            KeyCode::Left => self.cursor.left(buffer),
            KeyCode::Right => self.cursor.right(buffer),
            KeyCode::Up => self.cursor.up(buffer),
            KeyCode::Down => self.cursor.down(buffer),
            KeyCode::Home => self.cursor.home(buffer),
            KeyCode::End => self.cursor.end(buffer),
            _ => {}
        }
        None
    }

    fn sidebar_key(&mut self, code: KeyCode, entries: &[Entry]) -> Option<Action> {
        if entries.is_empty() {
            return None;
        }
        self.sidebar_index = self.sidebar_index.min(entries.len() - 1);
        match code {
            KeyCode::Up => self.sidebar_index = self.sidebar_index.saturating_sub(1),
            KeyCode::Down => {
                if self.sidebar_index < entries.len() - 1 {
                    self.sidebar_index += 1;
                }
            }
            KeyCode::Enter => {
                self.focus = Focus::Editor;
                return Some(Action::Select(entries[self.sidebar_index].id.clone()));
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                return Some(Action::Delete(entries[self.sidebar_index].id.clone()));
            }
            KeyCode::Esc => self.focus = Focus::Editor,
            _ => {}
        }
        None
    }

    fn timer_key(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Enter => {
                self.focus = Focus::Editor;
                return Some(Action::SetTimer(std::mem::take(&mut self.timer_input)));
            }
            KeyCode::Esc => {
                self.focus = Focus::Editor;
                self.timer_input.clear();
            }
            KeyCode::Backspace => {
                self.timer_input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == ':' => self.timer_input.push(c),
            _ => {}
        }
        None
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    state: EditorState,
    cursor_visible: bool,
    last_cursor_update: Instant,
    placeholder: &'static str,
    status: Option<String>,
}

impl UI {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI {
            terminal,
            state: EditorState::new(),
            cursor_visible: true,
            last_cursor_update: Instant::now(),
            placeholder: random_placeholder(),
            status: None,
        })
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn new_placeholder(&mut self) {
        self.placeholder = random_placeholder();
    }

    pub fn display<S: KeyValueStore>(
        &mut self,
        store: &EntryStore<S>,
        prefs: &Preferences,
        timer: &Timer,
    ) -> Result<()> {
        let now = Instant::now();
        if now.duration_since(self.last_cursor_update) >= Duration::from_millis(500) {
            self.cursor_visible = !self.cursor_visible;
            self.last_cursor_update = now;
        }

        let view = View {
            state: &self.state,
            cursor_visible: self.cursor_visible,
            placeholder: self.placeholder,
            status: self.status.as_deref(),
        };
        self.terminal
            .draw(|f| view.render(f, store, prefs, timer))?;
        Ok(())
    }

    /// Wait briefly for a key and translate it into an action
    pub fn handle_input<S: KeyValueStore>(
        &mut self,
        store: &mut EntryStore<S>,
        prefs: &Preferences,
    ) -> Result<Option<Action>> {
        if !event::poll(Duration::from_millis(100))? {
            return Ok(None);
        }
        if let Event::Key(key) = event::read()? {
            self.status = None;
            self.cursor_visible = true;
            self.last_cursor_update = Instant::now();
            return Ok(self.state.handle_key(key, store, prefs));
        }
        Ok(None)
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
        let _ = stdout().execute(Show);
    }
}

struct Palette {
    bg: Color,
    fg: Color,
    muted: Color,
    border: Color,
    highlight: Color,
}

impl Palette {
    fn for_prefs(prefs: &Preferences) -> Self {
        if prefs.dark_mode {
            Palette {
                bg: Color::Rgb(17, 24, 39),
                fg: Color::Rgb(229, 231, 235),
                muted: Color::Rgb(156, 163, 175),
                border: Color::Rgb(55, 65, 81),
                highlight: Color::Rgb(55, 65, 81),
            }
        } else {
            Palette {
                bg: Color::White,
                fg: Color::Rgb(31, 41, 55),
                muted: Color::Rgb(107, 114, 128),
                border: Color::Rgb(229, 231, 235),
                highlight: Color::Rgb(243, 244, 246),
            }
        }
    }
}

struct View<'a> {
    state: &'a EditorState,
    cursor_visible: bool,
    placeholder: &'static str,
    status: Option<&'a str>,
}

impl View<'_> {
    fn render<S: KeyValueStore>(
        &self,
        f: &mut Frame,
        store: &EntryStore<S>,
        prefs: &Preferences,
        timer: &Timer,
    ) {
        let palette = Palette::for_prefs(prefs);
        let area = f.area();
        f.render_widget(
            Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)),
            area,
        );

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(if prefs.show_controls { 1 } else { 0 }),
            ])
            .split(area);

        let editor_area = if prefs.sidebar_visible {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                .split(rows[0]);
            self.render_sidebar(f, cols[0], store, &palette);
            cols[1]
        } else {
            rows[0]
        };

        self.render_editor(f, editor_area, store.buffer(), prefs, &palette);
        if prefs.show_controls {
            self.render_controls(f, rows[1], store, prefs, timer, &palette);
        }
    }

    fn render_sidebar<S: KeyValueStore>(
        &self,
        f: &mut Frame,
        area: Rect,
        store: &EntryStore<S>,
        palette: &Palette,
    ) {
        let width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = store
            .entries()
            .iter()
            .map(|entry| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        entry.date.clone(),
                        Style::default().fg(palette.muted),
                    )),
                    Line::from(Span::raw(fit_width(entry.display_preview(), width))),
                ])
            })
            .collect();

        let focused = self.state.focus == Focus::Sidebar;
        let selected = if focused {
            Some(self.state.sidebar_index.min(items.len().saturating_sub(1)))
        } else {
            selected_index(store)
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::RIGHT)
                    .border_style(Style::default().fg(palette.border))
                    .title(" Notes ")
                    .title_style(Style::default().add_modifier(Modifier::BOLD)),
            )
            .highlight_style(
                Style::default()
                    .bg(palette.highlight)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(if focused { "> " } else { "  " });

        f.render_stateful_widget(list, area, &mut ListState::default().with_selected(selected));
    }

    fn render_editor(
        &self,
        f: &mut Frame,
        area: Rect,
        buffer: &str,
        prefs: &Preferences,
        palette: &Palette,
    ) {
        let width = area.width.min(EDITOR_MAX_WIDTH);
        let column = Rect {
            x: area.x + (area.width - width) / 2,
            width,
            ..area
        };

        let editing = self.state.focus == Focus::Editor;
        let show_cursor = editing && self.cursor_visible;
        let paragraph = if buffer.is_empty() {
            let mut line = Vec::new();
            if show_cursor {
                line.push(Span::raw("|"));
            }
            line.push(Span::styled(
                self.placeholder,
                Style::default().fg(palette.muted),
            ));
            Paragraph::new(Line::from(line))
        } else {
            let mut text = buffer.to_string();
            if show_cursor {
                let mut cursor = self.state.cursor;
                cursor.clamp(&text);
                text.insert(cursor.position(), '|');
            }
            Paragraph::new(text)
        };

        let paragraph = paragraph
            .style(Style::default().fg(palette.fg).bg(palette.bg))
            .block(Block::default().padding(Padding::new(2, 2, 1, 1)))
            .wrap(Wrap { trim: false })
            .alignment(if prefs.rtl_mode {
                Alignment::Right
            } else {
                Alignment::Left
            });
        f.render_widget(paragraph, column);
    }

    fn render_controls<S: KeyValueStore>(
        &self,
        f: &mut Frame,
        area: Rect,
        store: &EntryStore<S>,
        prefs: &Preferences,
        timer: &Timer,
        palette: &Palette,
    ) {
        let muted = Style::default().fg(palette.muted);
        let key = Style::default().add_modifier(Modifier::BOLD);

        let mut spans = vec![
            Span::styled(
                format!(
                    " {}px/{} · {} ",
                    prefs.font_size,
                    prefs.line_height(),
                    prefs.font_family.name()
                ),
                muted,
            ),
            Span::raw("  "),
        ];

        if self.state.focus == Focus::TimerInput {
            spans.push(Span::styled(
                format!("Timer: {}_ ", self.state.timer_input),
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::styled("(Enter to set, Esc to cancel)", muted));
        } else {
            let marker = if timer.is_running() { "▶" } else { "■" };
            spans.push(Span::raw(format!("{} {}", marker, timer.display())));
        }
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            if prefs.dark_mode { "dark" } else { "light" },
            muted,
        ));
        spans.push(Span::styled(" · ", muted));
        spans.push(Span::styled(if prefs.rtl_mode { "RTL" } else { "LTR" }, muted));
        if store.has_pending_write() {
            spans.push(Span::styled(
                " · not written to disk",
                Style::default().fg(Color::Red),
            ));
        } else if store.is_dirty() {
            spans.push(Span::styled(" · unsaved", muted));
        }

        if let Some(status) = self.status {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                status.to_string(),
                Style::default().fg(Color::Yellow),
            ));
        } else {
            spans.push(Span::raw("   "));
            for (k, label) in [
                ("^S", " save "),
                ("^N", " new "),
                ("^B", " notes "),
                ("^D", " theme "),
                ("^R", " rtl "),
                ("^T", " timer "),
                ("^Q", " quit"),
            ] {
                spans.push(Span::styled(k, key));
                spans.push(Span::styled(label, muted));
            }
        }

        f.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.bg)),
            area,
        );
    }
}

fn selected_index<S: KeyValueStore>(store: &EntryStore<S>) -> Option<usize> {
    let id = store.selected_id()?;
    store.entries().iter().position(|e| e.id == id)
}

fn random_placeholder() -> &'static str {
    PLACEHOLDERS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(PLACEHOLDERS[0])
}

/// Cut `text` to at most `width` terminal columns
fn fit_width(text: &str, width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= width
        })
        .collect()
}

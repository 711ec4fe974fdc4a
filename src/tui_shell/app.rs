use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::browser::{
    BrowserController, BrowserEvent, CursorMove, Edit, FileBody, FileView, MemoryHistory,
    NoticeLevel, View,
};
use crate::dispatch::Dispatcher;
use crate::model::VersionToken;
use crate::remote::{AuthIdentity, RemoteClient};

use super::commands::{Command, command_defs, parse_command, suggestions};
use super::input::Input;
use super::{CommandDef, render_view_chrome};

mod actions;
mod event_loop;
mod render;

const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Focus {
    Browse,
    Command,
    Editor,
}

pub(super) struct App {
    pub(super) controller: BrowserController<MemoryHistory>,
    dispatcher: Dispatcher,
    pub(super) input: Input,
    pub(super) focus: Focus,
    pub(super) selected: usize,
    pub(super) help_open: bool,
    pub(super) quit: bool,
    shown_path: String,
}

pub(super) fn run(opts: crate::tui::TuiRunOptions) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("TUI requires an interactive terminal (TTY)");
    }

    let mut app = App::load(opts)?;

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let res = event_loop::run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

impl App {
    fn load(opts: crate::tui::TuiRunOptions) -> Result<Self> {
        let crate::tui::TuiRunOptions {
            config,
            location,
            credentials,
        } = opts;
        let client = RemoteClient::new(&config.base_url, Arc::new(credentials.clone()))?;
        let location = location.unwrap_or_else(|| config.url_prefix.clone());
        let mut controller = BrowserController::new(
            &config,
            credentials,
            MemoryHistory::new(location.clone()),
        );
        controller.initialize(&location);
        let dispatcher = Dispatcher::new(Arc::new(client))?;
        Ok(Self {
            controller,
            dispatcher,
            input: Input::default(),
            focus: Focus::Browse,
            selected: 0,
            help_open: false,
            quit: false,
            shown_path: String::new(),
        })
    }

    /// Hands queued requests to the dispatcher and applies whatever has completed.
    pub(super) fn pump(&mut self) {
        loop {
            let queued = self.controller.take_requests();
            if !queued.is_empty() {
                self.dispatcher.spawn(queued);
            }
            let Some(completion) = self.dispatcher.try_next() else {
                break;
            };
            self.controller.complete(completion);
        }
        self.controller
            .notices_mut()
            .expire(Instant::now(), NOTICE_TTL);
        self.sync();
    }

    /// Keeps focus and row selection consistent with what the controller now shows.
    pub(super) fn sync(&mut self) {
        if self.controller.path().as_str() != self.shown_path {
            self.shown_path = self.controller.path().as_str().to_string();
            self.selected = 0;
        }
        match self.controller.view_mut() {
            View::Versioned(panel) => {
                if panel.take_focus_request() {
                    self.focus = Focus::Editor;
                }
                if self.focus == Focus::Editor && panel.is_read_only() {
                    self.focus = Focus::Browse;
                }
            }
            _ => {
                if self.focus == Focus::Editor {
                    self.focus = Focus::Browse;
                }
            }
        }
        let rows = self.row_count();
        if self.selected >= rows {
            self.selected = rows.saturating_sub(1);
        }
    }

    pub(super) fn row_count(&self) -> usize {
        match self.controller.view() {
            View::Folder => self.controller.children().len(),
            View::Versioned(panel) => panel.rows().len(),
            _ => 0,
        }
    }

    pub(super) fn prompt(&self) -> &'static str {
        match self.focus {
            Focus::Command => ":",
            Focus::Editor => "edit>",
            Focus::Browse => ">",
        }
    }
}

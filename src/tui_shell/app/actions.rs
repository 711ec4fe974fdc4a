use super::*;

impl App {
    /// Enter on a row: open the child, or view the version.
    pub(super) fn open_selected(&mut self) {
        match self.controller.view() {
            View::Folder => {
                let Some(child) = self.controller.children().get(self.selected) else {
                    return;
                };
                let name = child.name.clone();
                self.controller.handle(BrowserEvent::OpenChild { name });
            }
            View::Versioned(_) => {
                if let Some(v) = self.selected_version() {
                    self.controller
                        .with_panel(|p, o| p.select(VersionToken::Ordinal(v), o));
                }
            }
            _ => {}
        }
        self.sync();
    }

    /// Parent folder via the second-to-last crumb.
    pub(super) fn go_up(&mut self) {
        let crumbs = self.controller.crumbs();
        if crumbs.len() > 1 {
            self.controller.handle(BrowserEvent::OpenCrumb {
                index: crumbs.len() - 2,
            });
        }
        self.sync();
    }

    pub(super) fn selected_version(&self) -> Option<u64> {
        let View::Versioned(panel) = self.controller.view() else {
            return None;
        };
        panel.rows().get(self.selected).map(|r| r.entry.version)
    }

    pub(super) fn editor(&mut self, key: EditorKey) {
        match key {
            EditorKey::Edit(edit) => {
                self.controller.with_panel(|p, _| p.apply_edit(edit));
            }
            EditorKey::Move(m) => {
                self.controller.with_panel(|p, _| {
                    p.move_cursor(m);
                    Ok(())
                });
            }
            EditorKey::Undo => {
                self.controller.with_panel(|p, _| p.undo());
            }
            EditorKey::Save => {
                self.controller.with_panel(|p, o| p.save(o));
            }
            EditorKey::Leave => {
                let dirty = matches!(self.controller.view(), View::Versioned(p) if p.is_dirty());
                if dirty {
                    self.controller
                        .notices_mut()
                        .info("unsaved changes kept; :save or :cancel");
                } else {
                    self.controller.with_panel(|p, _| p.stop_editing());
                }
                self.focus = Focus::Browse;
            }
        }
        self.sync();
    }

    /// `e` in browse mode: start editing, or return to an open edit session.
    pub(super) fn enter_editor(&mut self) {
        let resuming = matches!(self.controller.view(), View::Versioned(p) if !p.is_read_only());
        if resuming {
            self.focus = Focus::Editor;
        } else {
            self.controller.with_panel(|p, _| p.edit());
        }
        self.sync();
    }

    pub(super) fn run_current_input(&mut self) {
        let line = self.input.submit();
        self.focus = Focus::Browse;
        if line.trim().is_empty() {
            return;
        }
        match parse_command(&line) {
            Ok(cmd) => self.run_command(cmd),
            Err(err) => self.controller.notices_mut().error(format!("{:#}", err)),
        }
        self.sync();
    }

    pub(super) fn run_command(&mut self, cmd: Command) {
        tracing::debug!(?cmd, "command");
        let c = &mut self.controller;
        match cmd {
            Command::Help => self.help_open = !self.help_open,
            Command::Login { user, token } => c.sign_in(AuthIdentity::new(user, token)),
            Command::Logout => c.sign_out(),
            Command::Token(token) => c.refresh_token(token),
            Command::Open(name) => c.handle(BrowserEvent::OpenChild { name }),
            Command::Crumb(index) => c.handle(BrowserEvent::OpenCrumb { index }),
            Command::Back => {
                if !c.go_back() {
                    c.notices_mut().info("no earlier entry");
                }
            }
            Command::Forward => {
                if !c.go_forward() {
                    c.notices_mut().info("no later entry");
                }
            }
            Command::Select(token) => {
                c.with_panel(|p, o| p.select(token, o));
            }
            Command::MakeDefault(v) => {
                c.with_panel(|p, o| p.make_default(v, o));
            }
            Command::ToggleHidden(v) => {
                c.with_panel(|p, o| p.toggle_hidden(v, o));
            }
            Command::Comment(v, text) => {
                c.with_panel(|p, o| p.update_comment(v, text, o));
            }
            Command::ShowHidden => {
                c.with_panel(|p, _| {
                    p.set_show_hidden(!p.show_hidden());
                    Ok(())
                });
            }
            Command::Refresh => c.refresh(),
            Command::Edit => {
                c.with_panel(|p, _| p.edit());
            }
            Command::Cancel => {
                c.with_panel(|p, o| p.cancel(o));
            }
            Command::Save => {
                c.with_panel(|p, o| p.save(o));
            }
            Command::Quit => self.quit = true,
        }
        self.sync();
    }
}

/// What a key does while the editor has focus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum EditorKey {
    Edit(Edit),
    Move(CursorMove),
    Undo,
    Save,
    Leave,
}

pub(super) fn editor_key(key: KeyEvent) -> Option<EditorKey> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let k = match key.code {
        KeyCode::Esc => EditorKey::Leave,
        KeyCode::Char('s') if ctrl => EditorKey::Save,
        KeyCode::Char('z') if ctrl => EditorKey::Undo,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(c) => EditorKey::Edit(Edit::Insert(c.to_string())),
        KeyCode::Enter => EditorKey::Edit(Edit::Insert("\n".to_string())),
        KeyCode::Tab => EditorKey::Edit(Edit::Insert("\t".to_string())),
        KeyCode::Backspace => EditorKey::Edit(Edit::Backspace),
        KeyCode::Delete => EditorKey::Edit(Edit::Delete),
        KeyCode::Left => EditorKey::Move(CursorMove::Left),
        KeyCode::Right => EditorKey::Move(CursorMove::Right),
        KeyCode::Up => EditorKey::Move(CursorMove::Up),
        KeyCode::Down => EditorKey::Move(CursorMove::Down),
        KeyCode::Home => EditorKey::Move(CursorMove::LineStart),
        KeyCode::End => EditorKey::Move(CursorMove::LineEnd),
        _ => return None,
    };
    Some(k)
}

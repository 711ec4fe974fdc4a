//! A single text buffer with load/reload and dirty tracking.
//!
//! Dirty means "the edit history is not empty": every applied edit pushes one record, undo pops
//! one, and a completed load clears the history. Dirty changes are reported as
//! [`DirtyChanged`] values only when the flag actually flips, and never while a load is in
//! flight.

use crate::model::ContentLocation;

use super::tasks::{Failure, Outbox, Request, TaskHandle, TaskId};

pub const LOADING_PLACEHOLDER: &str = "Loading...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirtyChanged(pub bool);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceState {
    Empty,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("document is read-only")]
    ReadOnly,
    #[error("document is still loading")]
    Loading,
    #[error("no document loaded")]
    NotLoaded,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    Insert(String),
    Backspace,
    Delete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorMove {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
}

#[derive(Clone, Debug)]
struct EditRecord {
    at: usize,
    removed: String,
    inserted: String,
    cursor_before: usize,
}

#[derive(Debug)]
pub struct EditSurface {
    source: Option<ContentLocation>,
    state: SurfaceState,
    pending: Option<TaskHandle>,
    text: String,
    cursor: usize,
    history: Vec<EditRecord>,
    read_only: bool,
    dirty: bool,
}

impl Default for EditSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSurface {
    pub fn new() -> Self {
        Self {
            source: None,
            state: SurfaceState::Empty,
            pending: None,
            text: String::new(),
            cursor: 0,
            history: Vec::new(),
            read_only: true,
            dirty: false,
        }
    }

    pub fn source(&self) -> Option<&ContentLocation> {
        self.source.as_ref()
    }

    pub fn state(&self) -> &SurfaceState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == SurfaceState::Loading
    }

    pub fn is_ready(&self) -> bool {
        self.state == SurfaceState::Ready
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn current_content(&self) -> &str {
        &self.text
    }

    /// What a viewer should show right now.
    pub fn display_text(&self) -> &str {
        match &self.state {
            SurfaceState::Loading => LOADING_PLACEHOLDER,
            SurfaceState::Failed(msg) => msg,
            SurfaceState::Empty | SurfaceState::Ready => &self.text,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Zero-based (line, column) of the cursor, columns counted in chars.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.text[..self.cursor];
        let line = before.matches('\n').count();
        let col = before
            .rsplit('\n')
            .next()
            .map(|s| s.chars().count())
            .unwrap_or(0);
        (line, col)
    }

    pub fn has_pending(&self, id: TaskId) -> bool {
        self.pending.as_ref().is_some_and(|h| h.is(id))
    }

    /// Starts fetching `location`. Any previous load is cancelled; dirty notifications are
    /// suppressed until the new content arrives.
    pub fn load(&mut self, location: ContentLocation, outbox: &mut Outbox) {
        tracing::debug!(%location, "loading document");
        self.pending = Some(outbox.submit(Request::Content {
            location: location.clone(),
        }));
        self.source = Some(location);
        self.state = SurfaceState::Loading;
        self.dirty = false;
    }

    /// Applies the result of a load. `None` when `id` is not the load this surface waits for.
    pub fn finish_load(
        &mut self,
        id: TaskId,
        outcome: Result<String, Failure>,
    ) -> Option<Result<DirtyChanged, Failure>> {
        if !self.has_pending(id) {
            return None;
        }
        self.pending = None;
        match outcome {
            Ok(text) => {
                self.text = text;
                self.cursor = 0;
                self.history.clear();
                self.state = SurfaceState::Ready;
                self.dirty = false;
                Some(Ok(DirtyChanged(false)))
            }
            Err(failure) => {
                self.text.clear();
                self.cursor = 0;
                self.history.clear();
                self.state = SurfaceState::Failed(format!("failed to load: {}", failure.message));
                self.dirty = false;
                Some(Err(failure))
            }
        }
    }

    /// Reloads the current source when dirty; no-op when clean.
    pub fn reset(&mut self, outbox: &mut Outbox) -> Option<DirtyChanged> {
        if !self.dirty {
            return None;
        }
        let Some(source) = self.source.clone() else {
            self.history.clear();
            self.dirty = false;
            return Some(DirtyChanged(false));
        };
        self.load(source, outbox);
        Some(DirtyChanged(false))
    }

    pub fn apply(&mut self, edit: Edit) -> Result<Option<DirtyChanged>, SurfaceError> {
        self.ensure_editable()?;
        let record = match edit {
            Edit::Insert(s) if s.is_empty() => None,
            Edit::Insert(s) => {
                let at = self.cursor;
                self.text.insert_str(at, &s);
                self.cursor = at + s.len();
                Some(EditRecord {
                    at,
                    removed: String::new(),
                    inserted: s,
                    cursor_before: at,
                })
            }
            Edit::Backspace => {
                let at = prev_boundary(&self.text, self.cursor);
                (at < self.cursor).then(|| {
                    let removed: String = self.text.drain(at..self.cursor).collect();
                    let before = self.cursor;
                    self.cursor = at;
                    EditRecord {
                        at,
                        removed,
                        inserted: String::new(),
                        cursor_before: before,
                    }
                })
            }
            Edit::Delete => {
                let end = next_boundary(&self.text, self.cursor);
                (end > self.cursor).then(|| {
                    let removed: String = self.text.drain(self.cursor..end).collect();
                    EditRecord {
                        at: self.cursor,
                        removed,
                        inserted: String::new(),
                        cursor_before: self.cursor,
                    }
                })
            }
        };
        if let Some(record) = record {
            self.history.push(record);
        }
        Ok(self.content_changed())
    }

    /// Reverts the most recent edit.
    pub fn undo(&mut self) -> Result<Option<DirtyChanged>, SurfaceError> {
        self.ensure_editable()?;
        let Some(record) = self.history.pop() else {
            return Ok(None);
        };
        let end = record.at + record.inserted.len();
        self.text.replace_range(record.at..end, &record.removed);
        self.cursor = record.cursor_before;
        Ok(self.content_changed())
    }

    pub fn move_cursor(&mut self, movement: CursorMove) {
        let text = &self.text;
        let line_start = text[..self.cursor].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = text[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(text.len());
        self.cursor = match movement {
            CursorMove::Left => prev_boundary(text, self.cursor),
            CursorMove::Right => next_boundary(text, self.cursor),
            CursorMove::LineStart => line_start,
            CursorMove::LineEnd => line_end,
            CursorMove::Up => {
                if line_start == 0 {
                    return;
                }
                let col = text[line_start..self.cursor].chars().count();
                let prev_start = text[..line_start - 1].rfind('\n').map(|i| i + 1).unwrap_or(0);
                offset_at_col(text, prev_start, line_start - 1, col)
            }
            CursorMove::Down => {
                if line_end == text.len() {
                    return;
                }
                let col = text[line_start..self.cursor].chars().count();
                let next_start = line_end + 1;
                let next_end = text[next_start..]
                    .find('\n')
                    .map(|i| next_start + i)
                    .unwrap_or(text.len());
                offset_at_col(text, next_start, next_end, col)
            }
        };
    }

    fn ensure_editable(&self) -> Result<(), SurfaceError> {
        match self.state {
            SurfaceState::Loading => return Err(SurfaceError::Loading),
            SurfaceState::Empty | SurfaceState::Failed(_) => return Err(SurfaceError::NotLoaded),
            SurfaceState::Ready => {}
        }
        if self.read_only {
            return Err(SurfaceError::ReadOnly);
        }
        Ok(())
    }

    fn content_changed(&mut self) -> Option<DirtyChanged> {
        if self.is_loading() {
            return None;
        }
        let dirty = !self.history.is_empty();
        if dirty == self.dirty {
            return None;
        }
        self.dirty = dirty;
        Some(DirtyChanged(dirty))
    }
}

fn prev_boundary(text: &str, at: usize) -> usize {
    text[..at].char_indices().next_back().map(|(i, _)| i).unwrap_or(0)
}

fn next_boundary(text: &str, at: usize) -> usize {
    text[at..]
        .chars()
        .next()
        .map(|c| at + c.len_utf8())
        .unwrap_or(at)
}

fn offset_at_col(text: &str, start: usize, end: usize, col: usize) -> usize {
    text[start..end]
        .char_indices()
        .nth(col)
        .map(|(i, _)| start + i)
        .unwrap_or(end)
}

/// Session history the controller records navigations into.
pub trait History {
    /// Adds an entry after the current one, discarding any forward entries.
    fn push_state(&mut self, state: &str, url: &str);

    /// Rewrites the current entry in place.
    fn replace_state(&mut self, state: &str, url: &str);

    /// Address currently displayed.
    fn location(&self) -> String;
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Entry {
    state: Option<String>,
    url: String,
}

/// Back/forward stack held in memory.
///
/// `back` and `forward` move the cursor and return the state stored on the entry moved to,
/// which the caller hands to the controller as a pop-state event.
#[derive(Clone, Debug)]
pub struct MemoryHistory {
    entries: Vec<Entry>,
    index: usize,
}

/// Outcome of a back/forward move: the state stored on the entry now current.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopState(pub Option<String>);

impl MemoryHistory {
    pub fn new(initial_url: impl Into<String>) -> Self {
        Self {
            entries: vec![Entry {
                state: None,
                url: initial_url.into(),
            }],
            index: 0,
        }
    }

    pub fn back(&mut self) -> Option<PopState> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(PopState(self.entries[self.index].state.clone()))
    }

    pub fn forward(&mut self) -> Option<PopState> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(PopState(self.entries[self.index].state.clone()))
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current_state(&self) -> Option<&str> {
        self.entries[self.index].state.as_deref()
    }
}

impl History for MemoryHistory {
    fn push_state(&mut self, state: &str, url: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(Entry {
            state: Some(state.to_string()),
            url: url.to_string(),
        });
        self.index = self.entries.len() - 1;
    }

    fn replace_state(&mut self, state: &str, url: &str) {
        let entry = &mut self.entries[self.index];
        entry.state = Some(state.to_string());
        entry.url = url.to_string();
    }

    fn location(&self) -> String {
        self.entries[self.index].url.clone()
    }
}

//! Terminal session multiplexer state. Each session owns a vt100 parser fed
//! in emission order by its backend; the backend process itself lives behind
//! the shell transport port.

use crate::kernel::services::ports::remote::ConnectionId;
use crate::kernel::services::ports::shell::SessionId;

const DEFAULT_SCROLLBACK_LINES: usize = 5000;
const DEFAULT_ROWS: u16 = 24;
const DEFAULT_COLS: u16 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Local,
    Remote(ConnectionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Spawning,
    Running,
    Exited,
}

/// Transient find-in-scrollback overlay; never part of the buffer itself.
#[derive(Debug, Clone, Default)]
pub struct SearchOverlay {
    pub query: String,
    pub active_match: usize,
}

pub struct TerminalParser {
    inner: vt100::Parser,
}

impl TerminalParser {
    pub fn new(rows: u16, cols: u16, scrollback_len: usize) -> Self {
        Self {
            inner: vt100::Parser::new(rows, cols, scrollback_len),
        }
    }

    pub fn process(&mut self, bytes: &[u8]) {
        self.inner.process(bytes);
    }

    pub fn screen(&self) -> &vt100::Screen {
        self.inner.screen()
    }

    pub fn screen_mut(&mut self) -> &mut vt100::Screen {
        self.inner.screen_mut()
    }
}

impl std::fmt::Debug for TerminalParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalParser").finish()
    }
}

#[derive(Debug)]
pub struct TerminalSession {
    pub id: SessionId,
    pub title: String,
    pub kind: SessionKind,
    pub liveness: Liveness,
    pub rows: u16,
    pub cols: u16,
    pub bound: bool,
    pub search: Option<SearchOverlay>,
    parser: TerminalParser,
}

impl TerminalSession {
    pub fn new(
        id: SessionId,
        title: String,
        kind: SessionKind,
        rows: u16,
        cols: u16,
        scrollback_lines: usize,
    ) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            id,
            title,
            kind,
            liveness: Liveness::Spawning,
            rows,
            cols,
            bound: false,
            search: None,
            parser: TerminalParser::new(rows, cols, scrollback_lines),
        }
    }

    pub fn screen(&self) -> &vt100::Screen {
        self.parser.screen()
    }

    pub fn process_output(&mut self, bytes: &[u8]) -> bool {
        if bytes.is_empty() {
            return false;
        }
        self.parser.process(bytes);
        true
    }

    /// Render a line of out-of-band text (spawn failures, write errors)
    /// inside the session itself.
    pub fn write_inline(&mut self, message: &str) {
        let text = format!("\r\n{message}\r\n");
        self.parser.process(text.as_bytes());
    }

    pub fn resize(&mut self, rows: u16, cols: u16) -> bool {
        let rows = rows.max(1);
        let cols = cols.max(1);
        if self.rows == rows && self.cols == cols {
            return false;
        }
        self.rows = rows;
        self.cols = cols;
        self.parser.screen_mut().set_size(rows, cols);
        true
    }

    pub fn set_search(&mut self, query: String) -> bool {
        if query.is_empty() {
            return self.clear_search();
        }
        self.search = Some(SearchOverlay {
            query,
            active_match: 0,
        });
        true
    }

    pub fn search_match_count(&self) -> usize {
        match &self.search {
            Some(overlay) if !overlay.query.is_empty() => {
                let haystack = self.parser.screen().contents().to_lowercase();
                haystack.matches(&overlay.query.to_lowercase()).count()
            }
            _ => 0,
        }
    }

    /// Advance to the next match, wrapping. Content is never perturbed.
    pub fn search_next(&mut self) -> bool {
        let count = self.search_match_count();
        if count == 0 {
            return false;
        }
        if let Some(overlay) = &mut self.search {
            overlay.active_match = (overlay.active_match + 1) % count;
        }
        true
    }

    pub fn clear_search(&mut self) -> bool {
        self.search.take().is_some()
    }
}

#[derive(Debug)]
pub struct TerminalState {
    pub sessions: Vec<TerminalSession>,
    pub foreground: Option<SessionId>,
    pub panel_visible: bool,
    next_id: SessionId,
    scrollback_lines: usize,
}

impl Default for TerminalState {
    fn default() -> Self {
        Self {
            sessions: Vec::new(),
            foreground: None,
            panel_visible: false,
            next_id: 1,
            scrollback_lines: DEFAULT_SCROLLBACK_LINES,
        }
    }
}

impl TerminalState {
    pub fn session(&self, id: SessionId) -> Option<&TerminalSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut TerminalSession> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    pub fn foreground_session(&self) -> Option<&TerminalSession> {
        let id = self.foreground?;
        self.session(id)
    }

    /// Allocate a session immediately: id, numbered title, foreground, and a
    /// visible panel. The backend spawn is triggered by the first bind.
    pub fn create(&mut self, kind: SessionKind) -> SessionId {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        let title = format!("Terminal {}", self.sessions.len() + 1);
        self.sessions.push(TerminalSession::new(
            id,
            title,
            kind,
            DEFAULT_ROWS,
            DEFAULT_COLS,
            self.scrollback_lines,
        ));
        self.foreground = Some(id);
        self.panel_visible = true;
        id
    }

    /// Mark the session bound to its view. Returns true only on the first
    /// bind; repeats are no-ops so a re-mounted view never spawns a second
    /// backend.
    pub fn bind(&mut self, id: SessionId) -> bool {
        match self.session_mut(id) {
            Some(session) if !session.bound => {
                session.bound = true;
                true
            }
            _ => false,
        }
    }

    /// Drop a session. The foreground falls back to the clamped adjacent
    /// index and the panel hides once no sessions remain.
    pub fn remove(&mut self, id: SessionId) -> bool {
        let Some(index) = self.sessions.iter().position(|s| s.id == id) else {
            return false;
        };

        self.sessions.retain(|s| s.id != id);

        if self.foreground == Some(id) {
            self.foreground = if self.sessions.is_empty() {
                None
            } else {
                let fallback = index.min(self.sessions.len() - 1);
                Some(self.sessions[fallback].id)
            };
        }

        self.panel_visible = !self.sessions.is_empty();
        true
    }

    pub fn set_foreground(&mut self, id: SessionId) -> bool {
        if self.session(id).is_none() || self.foreground == Some(id) {
            return false;
        }
        self.foreground = Some(id);
        true
    }

    pub fn rename(&mut self, id: SessionId, title: String) -> bool {
        match self.session_mut(id) {
            Some(session) if session.title != title => {
                session.title = title;
                true
            }
            _ => false,
        }
    }

    pub fn mark_running(&mut self, id: SessionId) -> bool {
        match self.session_mut(id) {
            Some(session) if session.liveness == Liveness::Spawning => {
                session.liveness = Liveness::Running;
                true
            }
            _ => false,
        }
    }

    /// A failed spawn keeps the session in the list, renders the failure
    /// inline and marks it exited; retry is remove-then-create.
    pub fn mark_spawn_failed(&mut self, id: SessionId, error: &str) -> bool {
        match self.session_mut(id) {
            Some(session) => {
                session.write_inline(&format!("Failed to spawn shell: {error}"));
                session.liveness = Liveness::Exited;
                true
            }
            None => false,
        }
    }

    /// Output for a session that no longer exists is stale and discarded.
    pub fn apply_output(&mut self, id: SessionId, bytes: &[u8]) -> bool {
        match self.session_mut(id) {
            Some(session) => session.process_output(bytes),
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/terminal.rs"]
mod tests;

//! The workspace session core: pure state plus a reducer. Everything that
//! touches the outside world goes through [`Effect`] values executed by the
//! app layer, and comes back in as completion [`Action`]s.

pub mod action;
pub mod documents;
pub mod effect;
pub mod explorer;
pub mod language;
pub mod locator;
pub mod repository;
pub mod services;
pub mod state;
pub mod store;
pub mod terminal;

pub use action::Action;
pub use documents::{Document, DocumentId, DocumentState};
pub use effect::Effect;
pub use explorer::ExplorerState;
pub use language::LanguageId;
pub use repository::{RepoSlice, RepositoryState};
pub use state::{UiState, WorkspaceState};
pub use store::{DispatchResult, Store};
pub use terminal::{SessionKind, TerminalSession, TerminalState};

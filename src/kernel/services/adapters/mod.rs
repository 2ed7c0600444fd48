//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod file;
pub mod git;
pub mod pty;
pub mod remote;
pub mod runtime;
pub mod settings;

pub use file::{FileService, LocalFileProvider};
pub use pty::PtyShell;
pub use remote::{ConnectionService, RemoteShell, SshProcessTransport};
pub use runtime::{AppMessage, AsyncRuntime};
pub use settings::{
    ensure_log_dir, ensure_settings_file, get_settings_path, load_settings, save_settings,
    PersistedState,
};

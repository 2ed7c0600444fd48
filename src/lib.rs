//! atelier - workspace session core
//!
//! Module structure:
//! - core: service registration and lookup
//! - kernel: pure workspace state plus the action/effect reducer
//! - kernel::services: ports (traits) and adapters (IO, processes, git)
//! - app: the host that executes effects and pumps completions
//! - logging: tracing setup

pub mod app;
pub mod core;
pub mod kernel;
pub mod logging;

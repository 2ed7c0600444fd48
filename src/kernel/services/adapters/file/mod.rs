//! File system adapters: the scheme-routing service and the local provider.

pub mod local;
pub mod service;

pub use local::LocalFileProvider;
pub use service::FileService;

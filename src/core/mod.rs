//! Core framework: service registration and lookup.

pub mod service;

pub use service::{Service, ServiceError, ServiceRegistry};

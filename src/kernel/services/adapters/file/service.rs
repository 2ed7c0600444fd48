//! File service: routes operations to a provider by URI scheme. The local
//! provider is always registered; remote-backed providers can be added on
//! top without the callers changing.

use super::local::LocalFileProvider;
use crate::kernel::services::ports::file::{DirEntry, FileError, FileProvider, Result};
use std::collections::HashMap;
use std::path::Path;

pub struct FileService {
    providers: HashMap<String, Box<dyn FileProvider>>,
    default_scheme: String,
}

impl FileService {
    pub fn new() -> Self {
        let mut service = Self {
            providers: HashMap::new(),
            default_scheme: "file".to_string(),
        };
        service.register_provider(Box::new(LocalFileProvider::new()));
        service
    }

    pub fn register_provider(&mut self, provider: Box<dyn FileProvider>) {
        let scheme = provider.scheme().to_string();
        self.providers.insert(scheme, provider);
    }

    fn get_provider(&self, scheme: &str) -> Result<&dyn FileProvider> {
        self.providers
            .get(scheme)
            .map(|p| p.as_ref())
            .ok_or_else(|| FileError::ProviderNotFound(scheme.to_string()))
    }

    fn default_provider(&self) -> Result<&dyn FileProvider> {
        self.get_provider(&self.default_scheme)
    }

    pub fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        self.default_provider()?.read_dir(path)
    }

    pub fn read_file(&self, path: &Path) -> Result<String> {
        self.default_provider()?.read_file(path)
    }

    pub fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        self.default_provider()?.write_file(path, content)
    }

    pub fn create_file(&self, path: &Path) -> Result<()> {
        self.default_provider()?.create_file(path)
    }

    pub fn create_dir(&self, path: &Path) -> Result<()> {
        self.default_provider()?.create_dir(path)
    }

    pub fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.default_provider()?.rename(from, to)
    }

    pub fn delete_file(&self, path: &Path) -> Result<()> {
        self.default_provider()?.delete_file(path)
    }

    pub fn delete_dir(&self, path: &Path) -> Result<()> {
        self.default_provider()?.delete_dir(path)
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.default_provider()
            .map(|p| p.exists(path))
            .unwrap_or(false)
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.default_provider()
            .map(|p| p.is_dir(path))
            .unwrap_or(false)
    }

    pub fn has_provider(&self, scheme: &str) -> bool {
        self.providers.contains_key(scheme)
    }
}

impl Default for FileService {
    fn default() -> Self {
        Self::new()
    }
}

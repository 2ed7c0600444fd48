//! File system port: scheme-addressable providers behind one trait.

use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, FileError>;

#[derive(Debug)]
pub enum FileError {
    NotFound(PathBuf),
    NotAFile(PathBuf),
    NotADirectory(PathBuf),
    AlreadyExists(PathBuf),
    ProviderNotFound(String),
    Io(io::Error),
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileError::NotFound(path) => write!(f, "Not found: {}", path.display()),
            FileError::NotAFile(path) => write!(f, "Not a file: {}", path.display()),
            FileError::NotADirectory(path) => {
                write!(f, "Not a directory: {}", path.display())
            }
            FileError::AlreadyExists(path) => {
                write!(f, "Already exists: {}", path.display())
            }
            FileError::ProviderNotFound(scheme) => {
                write!(f, "No file provider for scheme: {}", scheme)
            }
            FileError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FileError {
    fn from(e: io::Error) -> Self {
        FileError::Io(e)
    }
}

/// One row of a directory listing, as the tree view consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_symlink: bool,
    pub size: u64,
}

pub trait FileProvider: Send + Sync {
    fn scheme(&self) -> &'static str;

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;
    fn read_file(&self, path: &Path) -> Result<String>;
    fn write_file(&self, path: &Path, content: &str) -> Result<()>;
    fn create_file(&self, path: &Path) -> Result<()>;
    fn create_dir(&self, path: &Path) -> Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    fn delete_file(&self, path: &Path) -> Result<()>;
    fn delete_dir(&self, path: &Path) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
}

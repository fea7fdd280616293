//! The output side of generation: logical file locators and the resolver
//! that persists (or buffers) each rendered file.
//!
//! The core never touches the file system directly; it proposes a locator
//! and hands over text. `DirectoryOutput` persists to disk,
//! `MemoryOutput` buffers for tests.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Logical location of one generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFileLocator {
    /// Proposed base name, derived from the class name.
    pub base_name: String,
    /// File extension for the selected target language, without the dot.
    pub extension: String,
    /// Directory path segments derived from the effective package.
    pub directory: Vec<String>,
}

impl TargetFileLocator {
    /// Relative path below the output root.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for segment in &self.directory {
            path.push(segment);
        }
        path.push(format!("{}.{}", self.base_name, self.extension));
        path
    }

    /// Relative path as a `/`-joined string, for buffer keys and messages.
    #[must_use]
    pub fn slash_path(&self) -> String {
        let mut path: String = String::new();
        for segment in &self.directory {
            path.push_str(segment);
            path.push('/');
        }
        path.push_str(&self.base_name);
        path.push('.');
        path.push_str(&self.extension);
        path
    }
}

/// Accepts each generated file's locator and rendered text.
///
/// A failure aborts remaining emission for the run.
pub trait OutputResolver {
    /// # Errors
    ///
    /// Returns `io::Error` if the file cannot be accepted.
    fn accept(&mut self, locator: &TargetFileLocator, text: &str) -> io::Result<()>;
}

/// Writes generated files under a root directory, creating directories as
/// needed.
#[derive(Debug)]
pub struct DirectoryOutput {
    root: PathBuf,
}

impl DirectoryOutput {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl OutputResolver for DirectoryOutput {
    fn accept(&mut self, locator: &TargetFileLocator, text: &str) -> io::Result<()> {
        let path: PathBuf = self.root.join(locator.relative_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)
    }
}

/// Buffers generated files in memory, keyed by slash-joined relative path.
/// Deterministic iteration order for exact-output assertions.
#[derive(Debug, Default)]
pub struct MemoryOutput {
    files: BTreeMap<String, String>,
}

impl MemoryOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }
}

impl OutputResolver for MemoryOutput {
    fn accept(&mut self, locator: &TargetFileLocator, text: &str) -> io::Result<()> {
        self.files.insert(locator.slash_path(), text.to_string());
        Ok(())
    }
}

/// Fails on the first accepted file; exercises emission abort paths in
/// tests.
#[cfg(test)]
pub struct FailingOutput;

#[cfg(test)]
impl OutputResolver for FailingOutput {
    fn accept(&mut self, _locator: &TargetFileLocator, _text: &str) -> io::Result<()> {
        Err(io::Error::other("sink refused the file"))
    }
}

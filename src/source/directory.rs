use std::path::PathBuf;

use async_trait::async_trait;

use super::error::SourceError;
use super::ElementSource;
use crate::config::CategoryConfig;

/// Reads each category from a text file inside one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path_for(&self, key: &str, category: &CategoryConfig) -> PathBuf {
        match &category.file {
            Some(file) => self.dir.join(file),
            None => self.dir.join(format!("{}.txt", key.to_lowercase())),
        }
    }
}

#[async_trait]
impl ElementSource for DirectorySource {
    async fn fetch(&self, key: &str, category: &CategoryConfig) -> Result<String, SourceError> {
        let path = self.path_for(key, category);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| SourceError::Read {
                path: path.display().to_string(),
                source,
            })
    }
}

/// In-memory element text keyed by category.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    texts: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, text: impl Into<String>) -> Self {
        self.texts.insert(key.to_string(), text.into());
        self
    }
}

#[cfg(test)]
#[async_trait]
impl ElementSource for StaticSource {
    async fn fetch(&self, key: &str, _category: &CategoryConfig) -> Result<String, SourceError> {
        self.texts
            .get(key)
            .cloned()
            .ok_or_else(|| SourceError::Missing(key.to_string()))
    }
}

mod directory;
mod error;

use async_trait::async_trait;

use crate::config::CategoryConfig;

pub use directory::DirectorySource;
#[cfg(test)]
pub use directory::StaticSource;
pub use error::SourceError;

/// Supplies raw three-line element text for one category.
#[async_trait]
pub trait ElementSource: Send + Sync {
    async fn fetch(&self, key: &str, category: &CategoryConfig) -> Result<String, SourceError>;
}

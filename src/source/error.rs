use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("element file {path} read error: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[cfg(test)]
    #[error("no element text for category {0}")]
    Missing(String),
}

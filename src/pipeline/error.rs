use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

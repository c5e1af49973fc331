use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElementError {
    #[error("incomplete element group ({0} of 3 lines)")]
    Incomplete(usize),
    #[error("empty line in element group")]
    EmptyLine,
    #[error("invalid tle: {0}")]
    InvalidTle(#[from] sgp4::TleError),
    #[error("elements error: {0}")]
    Elements(#[from] sgp4::ElementsError),
}

mod error;
mod parser;
mod types;

pub use parser::{parse_elements, parse_report};
pub use types::OrbitalElementSet;

use thiserror::Error;

/// Errors raised while loading an edge list.
#[derive(Debug, Error)]
pub enum EdgeListError {
    /// A line held an empty endpoint.
    #[error("line {line}: endpoint {slot} is empty")]
    EmptyEndpoint { line: usize, slot: usize },
    /// The delimiter cannot separate endpoints.
    #[error("delimiter {delimiter:?} is not usable; choose a non-whitespace character other than `#`")]
    InvalidDelimiter { delimiter: char },
    /// Reading the input failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

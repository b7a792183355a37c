use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid side length: {0}. Must be at least 1")]
    InvalidSideLength(usize),

    #[error("Invalid dimensionality: {0}. Must be at least 2")]
    InvalidDimensionality(usize),

    #[error("Hypercube with side length {side_length} and dimensionality {dimensionality} is too large to enumerate")]
    TooLarge {
        side_length: usize,
        dimensionality: usize,
    },

    #[error("Invalid origin value: {value}. Must be within 1..={set_size}")]
    InvalidOriginValue { value: i64, set_size: usize },
}

pub type Result<T> = std::result::Result<T, GeneratorError>;

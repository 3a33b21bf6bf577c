use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{file} parse error: {msg}")]
    Parse { file: &'static str, msg: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    pub(crate) fn parse(file: &'static str, msg: impl Into<String>) -> Self {
        DataError::Parse { file, msg: msg.into() }
    }
}

pub type DataResult<T> = Result<T, DataError>;

use thiserror::Error;

pub type SearchResult<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Record codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<envy::Error> for SearchError {
    fn from(err: envy::Error) -> Self {
        SearchError::Config(err.to_string())
    }
}

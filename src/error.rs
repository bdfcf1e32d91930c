use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("Configuration Error: {0}")]
    Configuration(String),

    #[error("Shape Error: {0}")]
    Shape(String),

    #[error("Invalid Tableau: {0}")]
    InvalidTableau(String),

    #[error("Label Parsing Error: {0}")]
    Parse(String),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type MfResult<T> = Result<T, MapperError>;

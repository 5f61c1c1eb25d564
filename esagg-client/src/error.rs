use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connection failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("URL cannot hold a path: {0}")]
    CannotBeABase(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Engine returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to build request: {0}")]
    Build(#[from] esagg::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

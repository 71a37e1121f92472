#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("canvas dimensions must be finite and positive: {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
    #[error("graph contains a duplicate node id: {id}")]
    DuplicateNode { id: String },
    #[error("invalid layout options: {message}")]
    InvalidOptions { message: String },
    #[error("graph JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid todo service URL: {0}")]
    Url(#[from] url::ParseError),

    /// The request could not be sent or the response could not be read. HTTP error statuses are
    /// not reported through this type.
    #[error("Request to the todo service failed: {0}")]
    Transport(#[from] ureq::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

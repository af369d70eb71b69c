use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors from the REST client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend rejected the request with a non-2xx response. `detail`
    /// carries the backend's `{detail}` string when the body had one, or an
    /// `HTTP <status>` fallback when it did not.
    #[error("{detail}")]
    Api { status: u16, detail: String },

    /// The request never produced a response (connect/read failure, bad URL,
    /// undecodable body).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Status code when the backend answered, `None` for transport failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(_) => None,
        }
    }
}

pub type PacerResult<T> = Result<T, PacerError>;

#[derive(thiserror::Error, Debug)]
pub enum PacerError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("missing draw callback: {0}")]
    MissingCallback(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PacerError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn missing_callback(msg: impl Into<String>) -> Self {
        Self::MissingCallback(msg.into())
    }
}

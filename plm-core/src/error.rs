use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlmError {
    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Login error: {0}")]
    AuthError(String),

    #[error("Empty result: {0}")]
    EmptyResult(String),

    /// The request URL is stripped; it carries credentials and tokens.
    #[error("Transport error: {0}")]
    Transport(reqwest::Error),

    #[error("Bad Gateway: backend returned {status}: {body}")]
    BadGateway { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(anyhow::Error),
}

impl PlmError {
    pub fn config(message: impl Into<String>) -> Self {
        PlmError::ConfigError(anyhow::anyhow!(message.into()))
    }

    pub fn empty(what: impl Into<String>) -> Self {
        PlmError::EmptyResult(what.into())
    }

    /// Process exit code for this error class.
    ///
    /// `0` is reserved for success, so every variant maps to a non-zero code.
    pub fn exit_code(&self) -> u8 {
        match self {
            PlmError::ConfigError(_) => 2,
            PlmError::AuthError(_) => 3,
            PlmError::EmptyResult(_) => 4,
            PlmError::Transport(_) | PlmError::BadGateway { .. } | PlmError::MalformedResponse(_) => {
                5
            }
        }
    }

    pub fn is_empty_result(&self) -> bool {
        matches!(self, PlmError::EmptyResult(_))
    }
}

impl From<reqwest::Error> for PlmError {
    fn from(err: reqwest::Error) -> Self {
        PlmError::Transport(err.without_url())
    }
}

impl From<config::ConfigError> for PlmError {
    fn from(err: config::ConfigError) -> Self {
        PlmError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for PlmError {
    fn from(err: std::io::Error) -> Self {
        PlmError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<validator::ValidationErrors> for PlmError {
    fn from(err: validator::ValidationErrors) -> Self {
        PlmError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<chrono::ParseError> for PlmError {
    fn from(err: chrono::ParseError) -> Self {
        PlmError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<serde_json::Error> for PlmError {
    fn from(err: serde_json::Error) -> Self {
        PlmError::MalformedResponse(anyhow::Error::new(err))
    }
}

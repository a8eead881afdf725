use thiserror::Error;

#[derive(Error, Debug)]
pub enum VolumizerError {
    /// An external command exited non-zero or produced output we could not parse.
    #[error("{command} failed: {message}")]
    RemoteCall { command: String, message: String },

    #[error("Mirror source resolution failed: {0}")]
    Resolution(String),

    #[error("Setting ownership failed: {0}")]
    Permission(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[from] confique::Error),

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl VolumizerError {
    pub fn remote(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteCall {
            command: command.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VolumizerError>;

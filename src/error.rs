use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error during file I/O operations
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Error during JSON serialization or deserialization
    #[error("json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    /// Error when user input fails.
    #[error("inquire error: {0}")]
    Inquire(#[from] inquire::InquireError),
    /// Error when executing Git commands
    #[error("git command failed: {0}")]
    GitCommand(String),
    /// Error during input validation.
    #[error("validation error: {0}")]
    Validation(String),
    /// Coauthor ID is already present in the manifest (case-insensitive).
    #[error("coauthor with ID \"{0}\" already exists")]
    DuplicateCoauthor(String),
    /// Coauthor ID is not present in the manifest.
    #[error("unknown coauthor \"{0}\"")]
    UnknownCoauthor(String),
    /// Identity provider has no such user.
    #[error("error fetching \"{username}\" from {provider}: username not found")]
    UserNotFound { provider: String, username: String },
    /// Identity provider answered with a non-success status.
    #[error("error fetching \"{username}\" from {provider}: {message}")]
    Provider {
        provider: String,
        username: String,
        message: String,
    },
    /// Transport failure talking to an identity provider.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// Error during UTF-8 conversion.
    #[error("UTF-8 error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}

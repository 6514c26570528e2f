//! Error types for the postgrab application.

use thiserror::Error;

use crate::download::SessionPhase;

/// Fixed message for an unreachable backend, regardless of the transport cause.
pub const SERVICE_UNAVAILABLE_MSG: &str = "service unavailable";

/// Message returned when a request reaches the gateway without a URL.
pub const MISSING_URL_MSG: &str = "missing URL";

/// Message returned when the backend has no file under the requested name.
pub const FILE_NOT_FOUND_MSG: &str = "file not found";

/// Generic per-endpoint messages, used when the backend sends no detail.
pub const PARSE_FAILED_MSG: &str = "parse failed";
pub const SUBMIT_FAILED_MSG: &str = "download submission failed";
pub const STATUS_FAILED_MSG: &str = "status query failed";

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Gateway and session errors
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Session(#[from] SessionError),

    // Download errors
    #[error("Download failed: {0}")]
    Download(String),

    // Server errors
    #[error("Server error: {0}")]
    Server(String),

    // File system errors
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Normalized gateway failure.
///
/// Every failure crossing the gateway is one of these, carried on the wire as
/// `{"error": "<message>"}` with [`GatewayError::status`] as the HTTP status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The request was rejected before reaching the backend.
    #[error("{0}")]
    InvalidInput(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Backend { status: u16, message: String },

    /// The backend has no artifact under the requested filename.
    #[error("{FILE_NOT_FOUND_MSG}")]
    FileNotFound,

    /// The backend could not be reached or answered with something unreadable.
    #[error("{SERVICE_UNAVAILABLE_MSG}")]
    Unavailable,
}

impl GatewayError {
    /// HTTP status code this failure is reported with.
    pub fn status(&self) -> u16 {
        match self {
            GatewayError::InvalidInput(_) => 400,
            GatewayError::Backend { status, .. } => *status,
            GatewayError::FileNotFound => 404,
            GatewayError::Unavailable => 503,
        }
    }

    /// Rebuild a failure from a status code and `{error}` message received on the wire.
    pub fn from_wire(status: u16, message: Option<String>, fallback: &str) -> Self {
        match (status, message) {
            (503, Some(m)) if m == SERVICE_UNAVAILABLE_MSG => GatewayError::Unavailable,
            (404, Some(m)) if m == FILE_NOT_FOUND_MSG => GatewayError::FileNotFound,
            (400, Some(m)) => GatewayError::InvalidInput(m),
            (status, message) => GatewayError::Backend {
                status,
                message: message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| fallback.to_string()),
            },
        }
    }

    /// Whether this is the transport/unreachable condition.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, GatewayError::Unavailable)
    }
}

/// Session-level failures surfaced to the presentation layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Unsupported URL format. Please enter a Threads, Xiaohongshu or Douyin post URL")]
    UnsupportedUrl,

    #[error("No downloadable media found")]
    NoMediaFound,

    #[error("Select at least one item")]
    NothingSelected,

    #[error("all items failed")]
    AllItemsFailed,

    /// A single-task download ended in `failed`.
    #[error("{0}")]
    TaskFailed(String),

    #[error("Download timed out, please retry")]
    TimedOut,

    #[error("No media item with id {0}")]
    UnknownItem(usize),

    #[error("Cannot {action} while {phase}")]
    InvalidState {
        action: &'static str,
        phase: SessionPhase,
    },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl SessionError {
    /// Input rejections are resolved locally and never reach the backend.
    pub fn is_input_rejection(&self) -> bool {
        matches!(self, SessionError::UnsupportedUrl)
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const UNRECOGNIZED_URL: i32 = 6;
}

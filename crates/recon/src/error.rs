use std::fmt;

#[derive(Debug)]
pub enum VaultError {
    /// Input text is not valid JSON.
    Json(String),
    /// Top-level document is not a JSON object.
    NotAnObject,
    /// A top-level key holds the wrong kind of value (`items` not an array, etc.).
    InvalidField { field: String, expected: &'static str },
    /// An item is not an object or lacks a string `id`.
    InvalidItem { index: usize, reason: String },
    /// A folder lacks a string `id` or `name`.
    InvalidFolder { index: usize, reason: String },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (blank marker, malformed scheme, etc.).
    ConfigValidation(String),
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "not valid JSON: {msg}"),
            Self::NotAnObject => write!(f, "vault export must be a JSON object"),
            Self::InvalidField { field, expected } => {
                write!(f, "'{field}' must be {expected}")
            }
            Self::InvalidItem { index, reason } => write!(f, "items[{index}]: {reason}"),
            Self::InvalidFolder { index, reason } => write!(f, "folders[{index}]: {reason}"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for VaultError {}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

use std::fmt;

/// Errors from managing a backing store (opening, flushing, configuring).
///
/// The typed get/set contracts never surface these; they only appear on the
/// explicit management calls of [`FileStore`](crate::FileStore) and
/// [`StoreConfig`](crate::StoreConfig).
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// File read/write/rename failure.
    Io(String),
    /// Store file exists but is not a valid preferences document.
    Parse(String),
    /// TOML parse or validation error in a store configuration.
    Config(String),
    /// Values could not be serialized for writing.
    Encode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Config(msg) => write!(f, "config error: {msg}"),
            Self::Encode(msg) => write!(f, "encode error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

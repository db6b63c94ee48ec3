/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for document generation
#[derive(Debug)]
pub enum Error {
    /// A route path annotation could not be parsed into segments
    MalformedPath { path: String, message: String },
    /// A well-known metadata key carries a value of the wrong shape
    InvalidMetadata { key: String, message: String },
    /// The final document could not be serialized
    SerializationError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MalformedPath { path, message } => {
                write!(f, "malformed route path '{}': {}", path, message)
            }
            Error::InvalidMetadata { key, message } => {
                write!(f, "invalid metadata under key '{}': {}", key, message)
            }
            Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML serialization error: {}", err))
    }
}

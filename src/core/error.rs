use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompanionError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Reply error: {0}")]
    Reply(#[from] ReplyError),

    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),

    #[error("Transcript error: {0}")]
    Transcript(String),
}

#[derive(Error, Debug, Clone)]
pub enum ReplyError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

#[derive(Error, Debug, Clone)]
pub enum DetectionError {
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("Classifier failed: {0}")]
    Classifier(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file error: {0}")]
    File(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown emotion label: {0}")]
pub struct EmotionParseError(pub String);

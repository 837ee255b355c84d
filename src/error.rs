
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpellscanError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Invalid form id '{input}': {message}")]
    Identifier { input: String, message: String },
    #[error("No form found for id 0x{0:08X}")]
    NotFound(u32),
    #[error("Form 0x{0:08X} is not a spell")]
    WrongKind(u32),
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

pub type Result<T> = std::result::Result<T, SpellscanError>;

// Helper conversions
impl From<serde_json::Error> for SpellscanError {
    fn from(e: serde_json::Error) -> Self { Self::Snapshot(e.to_string()) }
}
impl From<config::ConfigError> for SpellscanError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}

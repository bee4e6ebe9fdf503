use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifeOsError {
    #[error("config file invalid or unreadable: {0}")]
    InvalidConfig(String),
    #[error("archive artifact corrupt: {0}")]
    CorruptArchive(String),
    #[error("sink write failed: {0}")]
    SinkWrite(String),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    /// Raised when the publish loop is asked to stop
    #[error("Quit message received from client")]
    Quit,
    #[error("MQTT transport error: {0}")]
    Transport(String),
    #[error("Failed to (de)serialize message")]
    Serialization(#[from] serde_json::Error),
    #[error("Tracking state lock poisoned")]
    StatePoisoned,
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

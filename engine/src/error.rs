use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Non-finite, zero or negative physics parameters.
    #[error("invalid physics input: {0}")]
    InvalidPhysicsInput(String),

    /// A required collaborator was not wired before the match started.
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("unknown player id {0}")]
    UnknownPlayer(u32),

    #[error("unknown zone tag {0:?}")]
    UnknownZone(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

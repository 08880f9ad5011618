//! Game core: tasks, procedural generation, sessions and the registry.
//!
//! The dependency order mirrors play: a [`TaskGenerator`] builds a round of
//! [`Task`]s from the literary corpus, a [`Session`] drives one player through
//! it with a vim engine and the match classifier, and the [`SessionRegistry`]
//! multiplexes sessions behind one lock and feeds finished rounds into the
//! stats sink.

pub mod corpus;
pub mod generator;
pub mod registry;
pub mod session;
pub mod task;
pub mod wire;

pub use generator::TaskGenerator;
pub use registry::{ExportFormat, SessionRegistry};
pub use session::{MatchStatus, Session, SessionState, TaskResult};
pub use task::{RoundType, Task, TaskCategory, key_count};

/// Observable failures of the operation surface, mapped onto the wire error
/// envelope by [`wire::ErrorEnvelope`].
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("session not found")]
    SessionNotFound,
    #[error("task not found")]
    TaskNotFound,
    #[error("no skips remaining")]
    NoSkipsRemaining,
    #[error("session already completed")]
    SessionCompleted,
    #[error("{0}")]
    InvalidRequest(String),
}

impl GameError {
    /// Stable machine-readable code for the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::SessionNotFound => "SESSION_NOT_FOUND",
            GameError::TaskNotFound => "TASK_NOT_FOUND",
            GameError::NoSkipsRemaining => "NO_SKIPS_REMAINING",
            GameError::SessionCompleted => "SESSION_COMPLETED",
            GameError::InvalidRequest(_) => "INVALID_REQUEST",
        }
    }

    /// HTTP status a transport should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            GameError::SessionNotFound | GameError::TaskNotFound => 404,
            GameError::NoSkipsRemaining
            | GameError::SessionCompleted
            | GameError::InvalidRequest(_) => 400,
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

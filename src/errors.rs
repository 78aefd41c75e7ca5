use thiserror::Error;
use uuid::Uuid;

/// Pipeline stage in which an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Retrieve,
    Generate,
    Persist,
}

impl PipelineStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Retrieve => "retrieve",
            Self::Generate => "generate",
            Self::Persist => "persist",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum RagChatError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Embedding API rate limited: {0}")]
    RateLimited(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Jwt(String),

    #[error("Chat pipeline failed in {stage} stage: {source}")]
    Pipeline {
        stage: PipelineStage,
        source: Box<RagChatError>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RagChatError {
    /// Tag an error with the pipeline stage it surfaced from
    #[must_use]
    pub fn in_stage(stage: PipelineStage, source: Self) -> Self {
        Self::Pipeline {
            stage,
            source: Box::new(source),
        }
    }

    /// The pipeline stage this error was tagged with, if any
    #[must_use]
    pub const fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::Pipeline { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Whether this error is a provider rate limit
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}

pub type Result<T> = std::result::Result<T, RagChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_tagging() {
        let inner = RagChatError::Embedding("boom".to_string());
        let tagged = RagChatError::in_stage(PipelineStage::Retrieve, inner);

        assert_eq!(tagged.stage(), Some(PipelineStage::Retrieve));
        assert!(tagged.to_string().contains("retrieve"));
        assert!(tagged.to_string().contains("boom"));
    }

    #[test]
    fn test_untagged_errors_have_no_stage() {
        let err = RagChatError::InvalidCredentials;
        assert_eq!(err.stage(), None);
    }

    #[test]
    fn test_rate_limited_classification() {
        assert!(RagChatError::RateLimited("429".to_string()).is_rate_limited());
        assert!(!RagChatError::Embedding("500".to_string()).is_rate_limited());
    }
}

use std::fmt;

/// Failure while obtaining embeddings. Always fatal to the analysis run:
/// no partial or silently degraded mode exists once a vector is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedError {
    /// Could not reach or talk to the embedding backend.
    Transport(String),
    /// The backend answered, but not in a shape we understand.
    Protocol(String),
}

impl fmt::Display for EmbedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbedError::Transport(msg) => write!(f, "embedding transport: {}", msg),
            EmbedError::Protocol(msg) => write!(f, "embedding protocol: {}", msg),
        }
    }
}

impl std::error::Error for EmbedError {}

/// Text-to-vector port.
///
/// Implementations must return one vector per input text, in input order,
/// and be deterministic for identical input. Model choice, batching and
/// device placement are implementation details behind this seam.
pub trait EmbedProvider {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;
}

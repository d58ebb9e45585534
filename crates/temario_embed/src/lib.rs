mod cache;
mod ollama;
mod provider;
mod similarity;

pub use cache::{text_key, CachedProvider, EmbeddingCache, FileCache, MemoryCache};
pub use ollama::{OllamaConfig, OllamaEmbedder};
pub use provider::{EmbedError, EmbedProvider};
pub use similarity::{cosine_similarity, normalize_rows, similarity_matrix};

pub mod provider;
pub mod providers;
pub mod solution;

pub use provider::{Embedder, EmbeddingError, LlmError, LlmProvider, Message, Role};
pub use providers::gemini::{GeminiEmbedder, GeminiProvider};
pub use solution::SolutionCardGenerator;

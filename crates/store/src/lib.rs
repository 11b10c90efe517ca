pub mod error;
pub mod vector_store;

pub use error::StoreError;
pub use vector_store::{init_pg_pool, ChunkStore, PgVectorStore, SearchResult, EMBEDDING_DIM};

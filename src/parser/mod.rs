mod chunker;
mod pdf;

pub use chunker::{DEFAULT_CHUNK_SIZE, TextChunker};
pub use pdf::extract_text;

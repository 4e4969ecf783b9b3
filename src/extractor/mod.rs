pub mod docx;
pub mod format;
pub mod pdf;
pub mod plain_text;
pub mod source;
pub mod tabular;
pub mod text_extractor;

pub use format::DocumentFormat;
pub use source::{format_bytes, SourceDocument};
pub use tabular::REVIEW_COLUMN;
pub use text_extractor::TextExtractor;

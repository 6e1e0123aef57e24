//! PDF ingestion pipeline: parse, clean, chunk, embed, store

mod chunker;
mod cleaner;
mod parser;
mod processor;

pub use chunker::TextChunker;
pub use cleaner::{
    clean_text, fix_newlines, merge_hyphenated_words, remove_multiple_newlines, trim_whitespace,
    CleaningPass, CleaningStep, TextCleaner,
};
pub use parser::{parse_pdf, PdfReader};
pub use processor::IngestPipeline;

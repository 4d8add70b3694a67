//! EPUB container reading and writing.

pub mod extract;
pub mod parser;
pub mod reader;
pub mod rewrite;
pub mod writer;

pub use extract::extract_paragraphs;
pub use reader::{read_epub, read_epub_from_reader};
pub use rewrite::rewrite_chapter;
pub use writer::{write_epub, write_epub_to_writer};

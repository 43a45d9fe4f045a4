pub mod document;
pub mod parser;

pub use document::{Block, Document, LinkRef, Section, TocEntry, slugify};
pub use parser::ParseError;

pub mod error;
mod fences;
mod structural;

pub use error::ParseError;

use crate::Document;

/// Parser entry point.
pub struct Parser {
    path: String,
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(path: impl Into<String>, source: String, file_id: usize) -> Self {
        Parser {
            path: path.into(),
            source,
            file_id,
        }
    }

    /// Parse the source Markdown into a Document.
    ///
    /// An unterminated code fence is a hard error for the document as a
    /// whole: the event stream downstream of the open fence is garbage, so
    /// no partial Document is produced.
    pub fn parse(&self) -> Result<Document, Vec<ParseError>> {
        fences::check_fences(&self.source, self.file_id)?;
        Ok(structural::parse_document(
            &self.path,
            &self.source,
            self.file_id,
        ))
    }
}

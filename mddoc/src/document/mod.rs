use std::ops::Range;

/// A parsed Markdown document: an ordered list of sections plus the link
/// material (TOC entries, file references) collected while parsing.
/// Documents are immutable once built; checkers only read them.
#[derive(Debug, Clone)]
pub struct Document {
    /// Corpus-relative path, as registered with the file database.
    pub path: String,
    /// The codespan file ID (for diagnostics).
    pub source_id: usize,
    /// Blocks appearing before the first heading.
    pub preamble: Vec<Block>,
    /// Sections in source order. The list is flat; nesting is implied by level.
    pub sections: Vec<Section>,
    /// Intra-document anchor links (`[label](#anchor)`), in source order.
    pub toc: Vec<TocEntry>,
    /// Relative-path links to other files in the corpus, in source order.
    pub links: Vec<LinkRef>,
}

impl Document {
    /// All blocks in source order, preamble first.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.preamble
            .iter()
            .chain(self.sections.iter().flat_map(|s| s.blocks.iter()))
    }

    /// Code blocks only.
    pub fn code_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks().filter(|b| matches!(b, Block::Code { .. }))
    }
}

/// A section opened by a Markdown heading. Owns the blocks up to the next
/// heading of any level.
#[derive(Debug, Clone)]
pub struct Section {
    /// Heading text, whitespace-normalized.
    pub heading: String,
    /// Heading level: 1 (#) through 6 (######).
    pub level: u8,
    /// Byte span of the heading in source.
    pub span: Range<usize>,
    /// 1-based source line of the heading.
    pub line: usize,
    pub blocks: Vec<Block>,
}

impl Section {
    /// The anchor slug this heading resolves to.
    pub fn slug(&self) -> String {
        slugify(&self.heading)
    }
}

/// A content block owned by a section (or the document preamble).
#[derive(Debug, Clone)]
pub enum Block {
    /// Running text: paragraphs, list items, blockquotes, table cells,
    /// flattened to their inline text content.
    Prose {
        text: String,
        span: Range<usize>,
        line: usize,
    },
    /// A fenced or indented code block. `language` is the token after the
    /// opening fence, lower-cased; `None` means untagged.
    Code {
        language: Option<String>,
        content: String,
        span: Range<usize>,
        line: usize,
    },
}

impl Block {
    pub fn line(&self) -> usize {
        match self {
            Block::Prose { line, .. } => *line,
            Block::Code { line, .. } => *line,
        }
    }
}

/// A table-of-contents entry: a link whose destination is an in-document
/// anchor, e.g. `[Indexing](#indexing-in-postgresql)`.
#[derive(Debug, Clone)]
pub struct TocEntry {
    /// The link text.
    pub label: String,
    /// The destination minus its leading `#`.
    pub anchor: String,
    pub span: Range<usize>,
    pub line: usize,
}

/// A link to another file in the corpus, e.g. `[MySQL notes](mysql/dml.md)`.
/// Any `#fragment` has been stripped from the target.
#[derive(Debug, Clone)]
pub struct LinkRef {
    /// The raw relative path, as written.
    pub target: String,
    pub span: Range<usize>,
    pub line: usize,
}

/// Compute the anchor slug for a heading: lower-case, punctuation stripped
/// (ASCII alphanumerics, `-` and `_` kept), each whitespace run replaced
/// with a single hyphen.
pub fn slugify(heading: &str) -> String {
    let mut slug = String::with_capacity(heading.len());
    let mut pending_hyphen = false;
    for ch in heading.trim().chars() {
        if ch.is_whitespace() {
            pending_hyphen = true;
        } else if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            if pending_hyphen {
                slug.push('-');
                pending_hyphen = false;
            }
            slug.extend(ch.to_lowercase());
        }
        // Other punctuation is dropped without breaking the current word.
    }
    slug
}

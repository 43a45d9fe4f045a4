use std::ops::Range;

use pulldown_cmark::{
    CodeBlockKind, Event, HeadingLevel, Options, Parser as CmarkParser, Tag, TagEnd,
};

use crate::document::{Block, Document, LinkRef, Section, TocEntry};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Walk the Markdown event stream and build the Document structure.
/// Infallible: unterminated fences are caught by the pre-scan before this
/// runs, and everything else degrades to prose.
pub fn parse_document(path: &str, source: &str, file_id: usize) -> Document {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let parser = CmarkParser::new_ext(source, options);
    let events: Vec<(Event<'_>, Range<usize>)> = parser.into_offset_iter().collect();

    let mut state = ParseState::new(path, source, file_id);
    state.process_events(&events);
    state.finalize()
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

struct ParseState {
    path: String,
    file_id: usize,
    /// Byte offsets of line starts, for offset → line conversion.
    line_starts: Vec<usize>,
    /// Section currently being built. None until the first heading.
    current: Option<SectionBuilder>,
    sections: Vec<Section>,
    /// Blocks seen before the first heading.
    preamble: Vec<Block>,
    toc: Vec<TocEntry>,
    links: Vec<LinkRef>,
}

struct SectionBuilder {
    heading: String,
    level: u8,
    span: Range<usize>,
    line: usize,
    blocks: Vec<Block>,
}

impl ParseState {
    fn new(path: &str, source: &str, file_id: usize) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        ParseState {
            path: path.to_string(),
            file_id,
            line_starts,
            current: None,
            sections: Vec::new(),
            preamble: Vec::new(),
            toc: Vec::new(),
            links: Vec::new(),
        }
    }

    /// 1-based line number for a byte offset.
    fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    fn push_block(&mut self, block: Block) {
        match &mut self.current {
            Some(builder) => builder.blocks.push(block),
            None => self.preamble.push(block),
        }
    }

    fn close_section(&mut self) {
        if let Some(builder) = self.current.take() {
            self.sections.push(Section {
                heading: builder.heading,
                level: builder.level,
                span: builder.span,
                line: builder.line,
                blocks: builder.blocks,
            });
        }
    }

    fn process_events(&mut self, events: &[(Event<'_>, Range<usize>)]) {
        let mut i = 0;

        while i < events.len() {
            let (ref ev, ref range) = events[i];

            match ev {
                Event::Start(Tag::Heading { level, .. }) => {
                    let level = heading_level_to_u8(level);
                    let span = range.clone();
                    let line = self.line_of(span.start);
                    i += 1;
                    let heading = self.collect_text(
                        events,
                        &mut i,
                        &|t| matches!(t, Tag::Heading { .. }),
                        &|e| matches!(e, TagEnd::Heading(_)),
                    );
                    let heading = normalize_heading(&heading);

                    self.close_section();
                    self.current = Some(SectionBuilder {
                        heading,
                        level,
                        span,
                        line,
                        blocks: Vec::new(),
                    });
                }

                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match kind {
                        CodeBlockKind::Fenced(info) => fence_language(info),
                        CodeBlockKind::Indented => None,
                    };
                    let span = range.clone();
                    let line = self.line_of(span.start);
                    i += 1;
                    let content =
                        self.collect_raw_text(events, &mut i, &|e| matches!(e, TagEnd::CodeBlock));
                    self.push_block(Block::Code {
                        language,
                        content,
                        span,
                        line,
                    });
                }

                Event::Start(Tag::Paragraph) => {
                    let span = range.clone();
                    let line = self.line_of(span.start);
                    i += 1;
                    let text = self.collect_text(
                        events,
                        &mut i,
                        &|t| matches!(t, Tag::Paragraph),
                        &|e| matches!(e, TagEnd::Paragraph),
                    );
                    self.push_prose(text, span, line);
                }

                Event::Start(Tag::List(_)) => {
                    let span = range.clone();
                    let line = self.line_of(span.start);
                    i += 1;
                    let text = self.collect_text(
                        events,
                        &mut i,
                        &|t| matches!(t, Tag::List(_)),
                        &|e| matches!(e, TagEnd::List(_)),
                    );
                    self.push_prose(text, span, line);
                }

                Event::Start(Tag::BlockQuote(_)) => {
                    let span = range.clone();
                    let line = self.line_of(span.start);
                    i += 1;
                    let text = self.collect_text(
                        events,
                        &mut i,
                        &|t| matches!(t, Tag::BlockQuote(_)),
                        &|e| matches!(e, TagEnd::BlockQuote(_)),
                    );
                    self.push_prose(text, span, line);
                }

                Event::Start(Tag::Table(_)) => {
                    let span = range.clone();
                    let line = self.line_of(span.start);
                    i += 1;
                    let text = self.collect_text(
                        events,
                        &mut i,
                        &|t| matches!(t, Tag::Table(_)),
                        &|e| matches!(e, TagEnd::Table),
                    );
                    self.push_prose(text, span, line);
                }

                _ => {
                    i += 1;
                }
            }
        }
    }

    fn push_prose(&mut self, text: String, span: Range<usize>, line: usize) {
        let text = text.trim().to_string();
        if !text.is_empty() {
            self.push_block(Block::Prose { text, span, line });
        }
    }

    /// Flatten events to their text content until the matching End tag,
    /// classifying any links encountered along the way. `is_start` must
    /// recognize the same tag kind as `is_end` so that nested occurrences
    /// (lists in lists, quotes in quotes) are depth-counted correctly.
    fn collect_text(
        &mut self,
        events: &[(Event<'_>, Range<usize>)],
        i: &mut usize,
        is_start: &dyn Fn(&Tag<'_>) -> bool,
        is_end: &dyn Fn(&TagEnd) -> bool,
    ) -> String {
        let mut text = String::new();
        let mut depth = 1u32;

        while *i < events.len() {
            let (ref ev, ref range) = events[*i];
            match ev {
                Event::End(tag_end) if is_end(tag_end) => {
                    depth -= 1;
                    *i += 1;
                    if depth == 0 {
                        break;
                    }
                }
                Event::Start(Tag::Link { dest_url, .. }) => {
                    let dest = dest_url.to_string();
                    let span = range.clone();
                    *i += 1;
                    let label =
                        self.collect_text(events, i, &|t| matches!(t, Tag::Link { .. }), &|e| {
                            matches!(e, TagEnd::Link)
                        });
                    self.classify_link(&dest, label.clone(), span);
                    text.push_str(&label);
                }
                Event::Start(Tag::Image { .. }) => {
                    *i += 1;
                    let alt =
                        self.collect_text(events, i, &|t| matches!(t, Tag::Image { .. }), &|e| {
                            matches!(e, TagEnd::Image)
                        });
                    text.push_str(&alt);
                }
                Event::Start(tag) if is_start(tag) => {
                    depth += 1;
                    *i += 1;
                }
                Event::Text(s) => {
                    text.push_str(s);
                    *i += 1;
                }
                Event::Code(s) => {
                    text.push_str(s);
                    *i += 1;
                }
                Event::SoftBreak | Event::HardBreak => {
                    text.push(' ');
                    *i += 1;
                }
                Event::End(TagEnd::Item) | Event::End(TagEnd::TableRow) => {
                    text.push('\n');
                    *i += 1;
                }
                Event::End(TagEnd::TableCell) => {
                    text.push(' ');
                    *i += 1;
                }
                _ => {
                    *i += 1;
                }
            }
        }

        text
    }

    /// Collect raw text (code block content) until the matching End tag.
    fn collect_raw_text(
        &self,
        events: &[(Event<'_>, Range<usize>)],
        i: &mut usize,
        is_end: &dyn Fn(&TagEnd) -> bool,
    ) -> String {
        let mut text = String::new();
        while *i < events.len() {
            let (ref ev, _) = events[*i];
            match ev {
                Event::End(tag_end) if is_end(tag_end) => {
                    *i += 1;
                    break;
                }
                Event::Text(s) => {
                    text.push_str(s);
                    *i += 1;
                }
                _ => {
                    *i += 1;
                }
            }
        }
        text
    }

    /// Sort a link destination into the TOC list (in-document anchor), the
    /// link list (relative path into the corpus), or neither (external).
    fn classify_link(&mut self, dest: &str, label: String, span: Range<usize>) {
        let line = self.line_of(span.start);

        if let Some(anchor) = dest.strip_prefix('#') {
            self.toc.push(TocEntry {
                label,
                anchor: anchor.to_string(),
                span,
                line,
            });
            return;
        }

        if dest.is_empty() || is_external(dest) {
            return;
        }

        // Strip any #fragment; only the file part is checked.
        let target = dest.split('#').next().unwrap_or(dest);
        if !target.is_empty() {
            self.links.push(LinkRef {
                target: target.to_string(),
                span,
                line,
            });
        }
    }

    fn finalize(mut self) -> Document {
        self.close_section();
        Document {
            path: self.path,
            source_id: self.file_id,
            preamble: self.preamble,
            sections: self.sections,
            toc: self.toc,
            links: self.links,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn heading_level_to_u8(level: &HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Normalize heading text: strip leading/trailing whitespace, collapse
/// interior whitespace.
fn normalize_heading(heading: &str) -> String {
    heading.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The language tag is the first token of the fence info string, lower-cased.
fn fence_language(info: &str) -> Option<String> {
    info.split_whitespace().next().map(|t| t.to_lowercase())
}

fn is_external(dest: &str) -> bool {
    dest.contains("://")
        || dest.starts_with("http:")
        || dest.starts_with("https:")
        || dest.starts_with("mailto:")
        || dest.starts_with("ftp:")
}

use mddoc::{Block, Document, slugify};

fn parse(source: &str) -> Document {
    mddoc::parser::Parser::new("doc.md", source.to_string(), 0)
        .parse()
        .expect("parse failed")
}

#[test]
fn sections_and_levels() {
    let doc = parse("# Databases\n\ntext\n\n## Indexing\n\nmore\n\n### B-trees\n");
    let headings: Vec<(u8, &str)> = doc
        .sections
        .iter()
        .map(|s| (s.level, s.heading.as_str()))
        .collect();
    assert_eq!(
        headings,
        vec![(1, "Databases"), (2, "Indexing"), (3, "B-trees")]
    );
    assert_eq!(doc.sections[0].line, 1);
    assert_eq!(doc.sections[1].line, 5);
}

#[test]
fn heading_whitespace_is_normalized() {
    let doc = parse("#  Indexing   in\tPostgreSQL\n");
    assert_eq!(doc.sections[0].heading, "Indexing in PostgreSQL");
}

#[test]
fn blocks_belong_to_their_section() {
    let doc = parse("# A\n\nfirst\n\n# B\n\nsecond\n");
    assert_eq!(doc.sections[0].blocks.len(), 1);
    assert_eq!(doc.sections[1].blocks.len(), 1);
}

#[test]
fn preamble_before_first_heading() {
    let doc = parse("intro paragraph\n\n# First\n");
    assert_eq!(doc.preamble.len(), 1);
    assert!(matches!(&doc.preamble[0], Block::Prose { text, .. } if text == "intro paragraph"));
}

#[test]
fn code_block_language_is_lowercased() {
    let doc = parse("# S\n\n```SQL\nSELECT 1;\n```\n");
    let block = doc.code_blocks().next().unwrap();
    match block {
        Block::Code {
            language, content, ..
        } => {
            assert_eq!(language.as_deref(), Some("sql"));
            assert_eq!(content, "SELECT 1;\n");
        }
        _ => panic!("expected code block"),
    }
}

#[test]
fn untagged_fence_has_no_language() {
    let doc = parse("# S\n\n```\nplain\n```\n");
    let block = doc.code_blocks().next().unwrap();
    assert!(matches!(block, Block::Code { language: None, .. }));
}

#[test]
fn fence_info_string_extra_tokens_dropped() {
    let doc = parse("# S\n\n```sql title=demo\nSELECT 1;\n```\n");
    let block = doc.code_blocks().next().unwrap();
    assert!(matches!(block, Block::Code { language: Some(l), .. } if l == "sql"));
}

#[test]
fn code_block_line_number() {
    let doc = parse("# S\n\ntext\n\n```sql\nSELECT 1;\n```\n");
    let block = doc.code_blocks().next().unwrap();
    assert_eq!(block.line(), 5);
}

#[test]
fn toc_entries_collected_from_lists() {
    let doc = parse("# Guide\n\n- [Indexing](#indexing-in-postgresql)\n- [DDL](#ddl)\n");
    assert_eq!(doc.toc.len(), 2);
    assert_eq!(doc.toc[0].label, "Indexing");
    assert_eq!(doc.toc[0].anchor, "indexing-in-postgresql");
    assert_eq!(doc.toc[0].line, 3);
    assert_eq!(doc.toc[1].anchor, "ddl");
}

#[test]
fn relative_links_collected_fragment_stripped() {
    let doc = parse("# A\n\nsee [notes](mysql/dml.md#inserts) here\n");
    assert_eq!(doc.links.len(), 1);
    assert_eq!(doc.links[0].target, "mysql/dml.md");
}

#[test]
fn external_links_ignored() {
    let doc = parse(
        "# A\n\n[pg docs](https://www.postgresql.org/docs/)\n[mail](mailto:a@b.c)\n",
    );
    assert!(doc.links.is_empty());
    assert!(doc.toc.is_empty());
}

#[test]
fn unterminated_fence_is_a_parse_error() {
    let result = mddoc::parser::Parser::new("doc.md", "# A\n\n```sql\nSELECT 1;\n".to_string(), 0)
        .parse();
    let errors = result.unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 3);
    assert!(errors[0].message.contains("never closed"));
}

#[test]
fn longer_closing_fence_closes() {
    let doc = parse("# A\n\n````\ncode with ``` inside\n`````\n");
    assert_eq!(doc.code_blocks().count(), 1);
}

#[test]
fn tilde_fence_not_closed_by_backticks() {
    let result =
        mddoc::parser::Parser::new("doc.md", "~~~\ntext\n```\n".to_string(), 0).parse();
    assert_eq!(result.unwrap_err()[0].line, 1);
}

#[test]
fn empty_document_parses_to_nothing() {
    let doc = parse("");
    assert!(doc.sections.is_empty());
    assert!(doc.preamble.is_empty());
    assert!(doc.toc.is_empty());
}

#[test]
fn slugify_basic() {
    assert_eq!(slugify("Indexing in PostgreSQL"), "indexing-in-postgresql");
}

#[test]
fn slugify_strips_punctuation() {
    assert_eq!(slugify("What's DDL?"), "whats-ddl");
    assert_eq!(slugify("GRANT / REVOKE"), "grant-revoke");
}

#[test]
fn slugify_keeps_hyphens_and_underscores() {
    assert_eq!(slugify("B-tree internals"), "b-tree-internals");
    assert_eq!(slugify("pg_stat_statements"), "pg_stat_statements");
}

#[test]
fn slugify_collapses_whitespace_runs() {
    assert_eq!(slugify("  ACID   properties "), "acid-properties");
}

use std::collections::HashSet;

use mddoc::Document;

use crate::corpus::Corpus;
use crate::finding::{Finding, FindingKind};

/// Validate a document's TOC anchors against its own headings and its
/// relative links against the corpus file set. Anchor comparison is
/// case-insensitive; path comparison is case-sensitive.
pub fn check_links(doc: &Document, corpus: &Corpus, out: &mut Vec<Finding>) {
    let slugs: HashSet<String> = doc.sections.iter().map(|s| s.slug()).collect();

    for entry in &doc.toc {
        if !slugs.contains(&entry.anchor.to_lowercase()) {
            out.push(Finding {
                kind: FindingKind::BrokenAnchor,
                message: format!(
                    "TOC entry '{}' points at '#{}', which matches no heading",
                    entry.label, entry.anchor
                ),
                path: doc.path.clone(),
                line: entry.line,
                span: entry.span.clone(),
                file_id: doc.source_id,
            });
        }
    }

    for link in &doc.links {
        // Only Markdown targets are checked; the corpus holds nothing else.
        if !link.target.to_lowercase().ends_with(".md") {
            continue;
        }
        let resolved = resolve_relative(&doc.path, &link.target);
        if !corpus.contains(&resolved) {
            out.push(Finding {
                kind: FindingKind::BrokenLink,
                message: format!("link target '{}' does not exist", link.target),
                path: doc.path.clone(),
                line: link.line,
                span: link.span.clone(),
                file_id: doc.source_id,
            });
        }
    }
}

/// Resolve a relative link target against the directory of the referencing
/// document. Both sides are root-relative `/`-separated paths.
fn resolve_relative(from: &str, target: &str) -> String {
    let mut parts: Vec<&str> = match from.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

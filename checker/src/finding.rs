use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

/// The validation issue categories the checkers can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FindingKind {
    BrokenAnchor,
    BrokenLink,
    UnbalancedQuote,
    UnbalancedParen,
    NoStatementKeyword,
}

impl FindingKind {
    pub fn name(&self) -> &'static str {
        match self {
            FindingKind::BrokenAnchor => "broken-anchor",
            FindingKind::BrokenLink => "broken-link",
            FindingKind::UnbalancedQuote => "unbalanced-quote",
            FindingKind::UnbalancedParen => "unbalanced-paren",
            FindingKind::NoStatementKeyword => "no-statement-keyword",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single validation issue at a specific document position. Findings are
/// never fatal; they accumulate into the report.
#[derive(Debug, Clone)]
pub struct Finding {
    pub kind: FindingKind,
    pub message: String,
    /// Corpus-relative path of the document.
    pub path: String,
    /// 1-based source line.
    pub line: usize,
    /// Byte span in source, for rich diagnostic rendering.
    pub span: Range<usize>,
    pub file_id: usize,
}

impl Finding {
    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        Diagnostic::new(Severity::Warning)
            .with_message(&self.message)
            .with_code(self.kind.name())
            .with_labels(vec![Label::primary(self.file_id, self.span.clone())])
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.path, self.line, self.kind, self.message
        )
    }
}

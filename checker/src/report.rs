use std::collections::BTreeMap;
use std::fmt::Write;

use mddoc::ParseError;

use crate::finding::{Finding, FindingKind};

/// Per-document result: either the document was checked (possibly with
/// findings) or it failed to parse and was skipped.
pub enum DocumentOutcome {
    Checked(Vec<Finding>),
    Failed(Vec<ParseError>),
}

pub struct DocumentReport {
    pub path: String,
    pub outcome: DocumentOutcome,
}

/// The aggregated result of one run: one entry per corpus file, in path
/// order. Rendering is a pure function of this structure, so an unchanged
/// tree always produces a byte-identical report.
pub struct Report {
    pub documents: Vec<DocumentReport>,
}

impl Report {
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn finding_count(&self) -> usize {
        self.documents
            .iter()
            .map(|d| match &d.outcome {
                DocumentOutcome::Checked(findings) => findings.len(),
                DocumentOutcome::Failed(_) => 0,
            })
            .sum()
    }

    /// True when any document failed to parse.
    pub fn has_failures(&self) -> bool {
        self.documents
            .iter()
            .any(|d| matches!(d.outcome, DocumentOutcome::Failed(_)))
    }

    pub fn counts_by_kind(&self) -> BTreeMap<FindingKind, usize> {
        let mut counts = BTreeMap::new();
        for doc in &self.documents {
            if let DocumentOutcome::Checked(findings) = &doc.outcome {
                for finding in findings {
                    *counts.entry(finding.kind).or_insert(0usize) += 1;
                }
            }
        }
        counts
    }

    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.documents.iter().flat_map(|d| -> &[Finding] {
            match &d.outcome {
                DocumentOutcome::Checked(findings) => findings,
                DocumentOutcome::Failed(_) => &[],
            }
        })
    }

    /// Process exit status: 2 for any parse failure, 1 for findings (unless
    /// `fail_on_warning` is off), 0 otherwise.
    pub fn exit_code(&self, fail_on_warning: bool) -> i32 {
        if self.has_failures() {
            2
        } else if fail_on_warning && self.finding_count() > 0 {
            1
        } else {
            0
        }
    }

    /// Plain-text report: one `path:line: kind: message` line per finding,
    /// grouped by document, then per-kind counts and the summary line.
    pub fn render(&self) -> String {
        let mut out = String::new();

        for doc in &self.documents {
            match &doc.outcome {
                DocumentOutcome::Checked(findings) => {
                    for finding in findings {
                        let _ = writeln!(out, "{}", finding);
                    }
                }
                DocumentOutcome::Failed(errors) => {
                    for error in errors {
                        let _ = writeln!(
                            out,
                            "{}:{}: error: {}",
                            doc.path, error.line, error.message
                        );
                    }
                }
            }
        }

        let counts = self.counts_by_kind();
        if !counts.is_empty() {
            let _ = writeln!(out);
            for (kind, count) in &counts {
                let _ = writeln!(out, "{}: {}", kind, count);
            }
        }

        let _ = writeln!(
            out,
            "{} findings in {} documents",
            self.finding_count(),
            self.document_count()
        );

        out
    }
}

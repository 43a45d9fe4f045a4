pub mod corpus;
pub mod finding;
pub mod links;
pub mod report;
pub mod sql;

pub use corpus::{Corpus, CorpusEntry, ReadError};
pub use finding::{Finding, FindingKind};
pub use report::{DocumentOutcome, DocumentReport, Report};

/// Knobs for a validation run.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Restrict checks to SQL code blocks; link and TOC checks are skipped.
    pub sql_only: bool,
}

/// Run the full pipeline over a loaded corpus: parse every document, check
/// it, and assemble the report. A parse failure fails only that document;
/// the rest of the corpus is still checked.
pub fn check_corpus(corpus: &Corpus, options: &CheckOptions) -> Report {
    let mut documents = Vec::with_capacity(corpus.len());

    for entry in &corpus.entries {
        let parser = mddoc::parser::Parser::new(entry.path.clone(), entry.text.clone(), entry.file_id);
        let outcome = match parser.parse() {
            Ok(doc) => {
                let mut findings = Vec::new();
                if !options.sql_only {
                    links::check_links(&doc, corpus, &mut findings);
                }
                sql::check_sql(&doc, &mut findings);
                findings.sort_by_key(|f| f.span.start);
                DocumentOutcome::Checked(findings)
            }
            Err(errors) => DocumentOutcome::Failed(errors),
        };
        documents.push(DocumentReport {
            path: entry.path.clone(),
            outcome,
        });
    }

    Report { documents }
}

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::{fmt, fs, io};

use codespan_reporting::files::SimpleFiles;

/// A corpus file could not be listed, read, or decoded as UTF-8.
/// Always fatal: the run aborts without a report.
#[derive(Debug)]
pub struct ReadError {
    pub path: PathBuf,
    pub source: io::Error,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot read '{}': {}", self.path.display(), self.source)
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// One loaded Markdown file.
pub struct CorpusEntry {
    /// Root-relative path with `/` separators.
    pub path: String,
    /// ID in the codespan file database.
    pub file_id: usize,
    pub text: String,
}

/// The loaded documentation set: every `.md` file under the root, sorted by
/// path for deterministic reports.
pub struct Corpus {
    /// File database for diagnostic rendering.
    pub files: SimpleFiles<String, String>,
    pub entries: Vec<CorpusEntry>,
    paths: HashSet<String>,
}

impl Corpus {
    pub fn load(root: &Path) -> Result<Corpus, ReadError> {
        let mut found: Vec<(String, PathBuf)> = Vec::new();
        collect_markdown(root, root, &mut found)?;
        found.sort();

        let mut files = SimpleFiles::new();
        let mut entries = Vec::with_capacity(found.len());
        let mut paths = HashSet::with_capacity(found.len());

        for (rel, abs) in found {
            let text = fs::read_to_string(&abs).map_err(|e| ReadError {
                path: abs.clone(),
                source: e,
            })?;
            let file_id = files.add(rel.clone(), text.clone());
            paths.insert(rel.clone());
            entries.push(CorpusEntry {
                path: rel,
                file_id,
                text,
            });
        }

        Ok(Corpus {
            files,
            entries,
            paths,
        })
    }

    /// Exact, case-sensitive membership test for a root-relative path.
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn collect_markdown(
    dir: &Path,
    root: &Path,
    out: &mut Vec<(String, PathBuf)>,
) -> Result<(), ReadError> {
    let entries = fs::read_dir(dir).map_err(|e| ReadError {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ReadError {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_markdown(&path, root, out)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("md"))
        {
            let rel = path
                .strip_prefix(root)
                .ok()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_else(|| path.to_string_lossy().into_owned());
            out.push((rel, path));
        }
    }

    Ok(())
}

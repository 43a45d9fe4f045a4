use mddoc::{Block, Document};

use crate::finding::{Finding, FindingKind};

/// Code-fence tags the SQL checker applies to. The corpus tags blocks with
/// dialect names as well as plain `sql`.
const SQL_TAGS: &[&str] = &["sql", "postgresql", "mysql", "plpgsql"];

/// Statement keywords; a block containing none of them is flagged.
const STATEMENT_KEYWORDS: &[&str] = &[
    "SELECT", "INSERT", "UPDATE", "DELETE", "CREATE", "ALTER", "DROP", "GRANT", "REVOKE", "WITH",
    "BEGIN",
];

/// Run the lexical SQL sanity checks over every SQL-tagged code block.
/// This is deliberately not a SQL parser: it knows strings, comments,
/// parentheses and words, and nothing else.
pub fn check_sql(doc: &Document, out: &mut Vec<Finding>) {
    for block in doc.code_blocks() {
        let Block::Code {
            language: Some(lang),
            content,
            span,
            line,
        } = block
        else {
            continue;
        };
        if !SQL_TAGS.contains(&lang.as_str()) {
            continue;
        }

        let scan = scan_block(content);
        let mut push = |kind: FindingKind, message: String| {
            out.push(Finding {
                kind,
                message,
                path: doc.path.clone(),
                line: *line,
                span: span.clone(),
                file_id: doc.source_id,
            });
        };

        if let Some(quote) = scan.unterminated_quote {
            let which = if quote == '\'' { "single" } else { "double" };
            push(
                FindingKind::UnbalancedQuote,
                format!("unterminated {}-quoted string in SQL block", which),
            );
        }
        if scan.paren_underflow || scan.open_parens > 0 {
            push(
                FindingKind::UnbalancedParen,
                "unbalanced parentheses in SQL block".to_string(),
            );
        }
        if !scan.has_keyword {
            push(
                FindingKind::NoStatementKeyword,
                "no SQL statement keyword found in block".to_string(),
            );
        }
    }
}

struct ScanResult {
    /// The quote character of a string still open at end of block.
    unterminated_quote: Option<char>,
    paren_underflow: bool,
    open_parens: usize,
    has_keyword: bool,
}

enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment,
}

/// One pass over the block. Quotes escape by doubling (`''` inside a
/// string), `--` comments run to end of line, `/* */` comments nest not at
/// all, and parentheses only count in the Normal state.
fn scan_block(content: &str) -> ScanResult {
    let mut state = State::Normal;
    let mut chars = content.chars().peekable();
    let mut open_parens = 0usize;
    let mut paren_underflow = false;
    let mut has_keyword = false;
    let mut word = String::new();

    let flush_word = |word: &mut String, has_keyword: &mut bool| {
        if !word.is_empty() {
            let upper = word.to_uppercase();
            if STATEMENT_KEYWORDS.contains(&upper.as_str()) {
                *has_keyword = true;
            }
            word.clear();
        }
    };

    while let Some(ch) = chars.next() {
        match state {
            State::Normal => match ch {
                '\'' => {
                    flush_word(&mut word, &mut has_keyword);
                    state = State::SingleQuoted;
                }
                '"' => {
                    flush_word(&mut word, &mut has_keyword);
                    state = State::DoubleQuoted;
                }
                '-' if chars.peek() == Some(&'-') => {
                    flush_word(&mut word, &mut has_keyword);
                    chars.next();
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    flush_word(&mut word, &mut has_keyword);
                    chars.next();
                    state = State::BlockComment;
                }
                '(' => {
                    flush_word(&mut word, &mut has_keyword);
                    open_parens += 1;
                }
                ')' => {
                    flush_word(&mut word, &mut has_keyword);
                    if open_parens == 0 {
                        paren_underflow = true;
                    } else {
                        open_parens -= 1;
                    }
                }
                c if c.is_ascii_alphanumeric() || c == '_' => {
                    word.push(c);
                }
                _ => {
                    flush_word(&mut word, &mut has_keyword);
                }
            },
            State::SingleQuoted => {
                if ch == '\'' {
                    if chars.peek() == Some(&'\'') {
                        chars.next();
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if ch == '"' {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if ch == '\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment => {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Normal;
                }
            }
        }
    }
    flush_word(&mut word, &mut has_keyword);

    ScanResult {
        unterminated_quote: match state {
            State::SingleQuoted => Some('\''),
            State::DoubleQuoted => Some('"'),
            _ => None,
        },
        paren_underflow,
        open_parens,
        has_keyword,
    }
}

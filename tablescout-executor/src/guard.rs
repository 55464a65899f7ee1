use regex::Regex;

const WRITE_KEYWORDS: &str = r"(?i)\b(DROP|ALTER|INSERT|UPDATE|DELETE|TRUNCATE|GRANT|REVOKE)\b";

/// Rejects statements that could modify data or privileges.
///
/// Keyword matching is coarse: a string literal containing `delete` is
/// rejected too. The read-only transaction is the real boundary.
#[derive(Debug, Clone)]
pub struct ReadOnlyGuard {
    pattern: Regex,
}

impl ReadOnlyGuard {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(WRITE_KEYWORDS)?,
        })
    }

    /// The first write keyword found, upper-cased.
    pub fn violation(&self, sql: &str) -> Option<String> {
        self.pattern
            .captures(sql)
            .and_then(|captures| captures.get(1))
            .map(|keyword| keyword.as_str().to_ascii_uppercase())
    }
}

/// Trims whitespace, trailing `--` comments and trailing semicolons so the
/// statement can be wrapped in a subquery. `None` when nothing is left.
pub fn normalize_statement(sql: &str) -> Option<&str> {
    let mut statement = sql.trim();
    loop {
        let trimmed = strip_trailing_line_comment(statement)
            .trim_end_matches(|ch: char| ch == ';' || ch.is_whitespace());
        if trimmed.len() == statement.len() {
            break;
        }
        statement = trimmed;
    }
    if statement.is_empty() {
        None
    } else {
        Some(statement)
    }
}

/// Cuts a `--` comment that runs to the end of `sql`. Dashes inside quoted
/// literals or identifiers are not comments.
fn strip_trailing_line_comment(sql: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut comment_start: Option<usize> = None;
    let mut chars = sql.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if comment_start.is_some() {
            if ch == '\n' {
                comment_start = None;
            }
            continue;
        }
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => {}
            None if ch == '\'' || ch == '"' => quote = Some(ch),
            None if ch == '-' && matches!(chars.peek(), Some((_, '-'))) => {
                comment_start = Some(idx);
            }
            None => {}
        }
    }
    match comment_start {
        Some(start) => &sql[..start],
        None => sql,
    }
}

/// Plain, unquoted SQL identifier, optionally schema-qualified.
pub fn is_plain_identifier(value: &str) -> bool {
    !value.is_empty()
        && value.split('.').count() <= 2
        && value.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(first) if first.is_ascii_alphabetic() || first == '_')
                && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        })
}

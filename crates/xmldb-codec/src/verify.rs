use std::fmt;

/// Result of comparing a document's text with its canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The text is byte-identical to its canonical form.
    Canonical,
    /// The text parsed but differs from its canonical form.
    Mismatch(Mismatch),
}

impl Verdict {
    pub fn is_canonical(&self) -> bool {
        matches!(self, Self::Canonical)
    }
}

/// Where a document first departs from its canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// 1-based line number of the first differing line.
    pub line: usize,
    /// The canonical line, or `None` when the canonical text has ended.
    pub expected: Option<String>,
    /// The source line, or `None` when the source text has ended.
    pub found: Option<String>,
    /// The full canonical text, for rewriting the file.
    pub canonical: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |line: &Option<String>| match line {
            Some(text) => format!("{text:?}"),
            None => "end of file".to_string(),
        };
        write!(
            f,
            "line {}: expected {}, found {}",
            self.line,
            show(&self.expected),
            show(&self.found)
        )
    }
}

/// Compares source text with its canonical serialization line by line.
///
/// Lines are split on `\n` only, so a missing final newline or a stray
/// `\r` shows up as a difference.
pub fn compare(source: &str, canonical: String) -> Verdict {
    if source == canonical {
        return Verdict::Canonical;
    }

    let mut expected_lines = canonical.split('\n');
    let mut found_lines = source.split('\n');
    let mut line = 1;
    loop {
        let expected = expected_lines.next();
        let found = found_lines.next();
        if expected != found {
            return Verdict::Mismatch(Mismatch {
                line,
                expected: expected.map(str::to_string),
                found: found.map(str::to_string),
                canonical,
            });
        }
        line += 1;
    }
}

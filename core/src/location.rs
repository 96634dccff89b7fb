use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Location {
    /// The file in which the location is found.
    pub file: String,
    /// The 1-based line number of the location.
    pub line: usize,
    /// The 1-based character column of the location.
    pub column: usize,
}

impl Location {
    /// Creates a new `Location`.
    pub fn new(file: String, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Half-open byte range `[start, next)` into the grammar source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub next: usize,
}

impl Span {
    pub fn new(start: usize, next: usize) -> Self {
        debug_assert!(next >= start, "span ends before it starts: {}..{}", start, next);
        Self { start, next }
    }

    pub fn len(&self) -> usize {
        self.next.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.next)
    }
}

/// Line-start table over one grammar source, built once and shared by every
/// node that needs a position.
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        let mut bytes = source.bytes().enumerate().peekable();

        // `\r\n`, `\n` and `\r` each end a line
        while let Some((i, b)) = bytes.next() {
            match b {
                b'\n' => line_starts.push(i + 1),
                b'\r' => {
                    if let Some(&(j, b'\n')) = bytes.peek() {
                        bytes.next();
                        line_starts.push(j + 1);
                    } else {
                        line_starts.push(i + 1);
                    }
                }
                _ => {}
            }
        }

        LineIndex { source, line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the 1-based `(line, column)` of `offset`, clamped to the end of
    /// the source. Columns count characters, not bytes.
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - line_start);
        (line + 1, column + 1)
    }

    pub fn location(&self, file: &str, offset: usize) -> Location {
        let (line, column) = self.locate(offset);
        Location::new(file.to_string(), line, column)
    }
}

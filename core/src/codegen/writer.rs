/// Text buffer for generated host source. Indentation levels are four
/// spaces each; callers supply their own line breaks.
#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
}

const INDENT: &str = "    ";

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Writes `level` indentation steps followed by `text`.
    pub fn indented(&mut self, level: usize, text: &str) {
        for _ in 0..level {
            self.buf.push_str(INDENT);
        }
        self.buf.push_str(text);
    }

    pub fn newline(&mut self) {
        self.buf.push('\n');
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

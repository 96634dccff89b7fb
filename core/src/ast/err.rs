use crate::error::{Level, MetagenErrorExt};
use crate::location::{Location, Span};

/// A malformed grammar text. Raised by front-ends that parse grammar source
/// into an `AstNode` tree; the analysis and synthesis passes never raise it.
#[derive(Debug, Clone)]
pub struct SyntaxError {
    level: Level,
    message: String,
    issuer: String,
    index: usize,
    location: Option<Location>,
}

impl SyntaxError {
    pub fn new(index: usize, message: impl Into<String>) -> Self {
        SyntaxError {
            level: Level::Error,
            message: message.into(),
            issuer: "metagen.ast".to_string(),
            index,
            location: None,
        }
    }

    pub fn with(level: Level, message: String, issuer: String, index: usize, location: Option<Location>) -> Self {
        SyntaxError {
            level,
            message,
            issuer,
            index,
            location,
        }
    }

    /// Source offset of the offending text.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} (at {}:{}:{})", self.message, loc.file, loc.line, loc.column)
        } else {
            write!(f, "{} (at offset {})", self.message, self.index)
        }
    }
}

impl std::error::Error for SyntaxError {}

impl MetagenErrorExt for SyntaxError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn span(&self) -> Option<Span> {
        Some(Span::new(self.index, self.index))
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}

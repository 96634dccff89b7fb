use crate::error::{Level, MetagenErrorExt};
use crate::location::{Location, Span};

/// A structurally valid tree that breaks a grammar-declaration contract.
#[derive(Debug, Clone)]
pub struct SemanticError {
    level: Level,
    message: String,
    issuer: String,
    index: usize,
    location: Option<Location>,
    span: Option<Span>,
}

impl SemanticError {
    pub fn with(
        level: Level,
        message: String,
        issuer: String,
        location: Option<Location>,
        span: Option<Span>,
    ) -> Self {
        SemanticError {
            level,
            message,
            issuer,
            index: span.map(|s| s.start).unwrap_or_default(),
            location,
            span,
        }
    }

    /// Source offset of the offending node.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl std::fmt::Display for SemanticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} at {}", self.message, loc)
        } else {
            write!(f, "{} at offset {}", self.message, self.index)
        }
    }
}

impl std::error::Error for SemanticError {}

impl MetagenErrorExt for SemanticError {
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
        self.span
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}

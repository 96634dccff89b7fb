//! Per-run generation settings handed to every pass.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ContractError;
use crate::location::{LineIndex, Location};

/// How the synthesized rule functions treat the results of ordered choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChoiceMode {
    /// Defer to the matcher's `StrictPEG` flag at runtime.
    #[default]
    Runtime,
    /// Stop after the first successful result.
    Strict,
    /// Yield every result of every alternative.
    AllParses,
}

impl FromStr for ChoiceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "runtime" => Ok(ChoiceMode::Runtime),
            "strict" => Ok(ChoiceMode::Strict),
            "all-parses" | "all" => Ok(ChoiceMode::AllParses),
            other => Err(format!("unknown choice mode `{}` (expected runtime, strict or all-parses)", other)),
        }
    }
}

impl std::fmt::Display for ChoiceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChoiceMode::Runtime => "runtime",
            ChoiceMode::Strict => "strict",
            ChoiceMode::AllParses => "all-parses",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone)]
pub struct GenerateInfo {
    /// Grammar file name written into `#line` directives.
    pub input_file_name: String,
    source: String,
    /// Must be set before generation.
    pub namespace: Option<String>,
    pub choice_mode: ChoiceMode,
    pub generated_at: DateTime<Utc>,
}

impl GenerateInfo {
    pub fn new(input_file_name: impl Into<String>, source: impl Into<String>) -> Self {
        GenerateInfo {
            input_file_name: input_file_name.into(),
            source: source.into(),
            namespace: None,
            choice_mode: ChoiceMode::default(),
            generated_at: Utc::now(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_choice_mode(mut self, mode: ChoiceMode) -> Self {
        self.choice_mode = mode;
        self
    }

    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = at;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line_index(&self) -> LineIndex<'_> {
        LineIndex::new(&self.source)
    }

    pub fn location_of(&self, offset: usize) -> Location {
        self.line_index().location(&self.input_file_name, offset)
    }

    pub fn require_namespace(&self) -> Result<&str, ContractError> {
        match self.namespace.as_deref() {
            Some(ns) if !ns.trim().is_empty() => Ok(ns),
            _ => Err(ContractError::new(
                "calling code must assign a namespace before generating",
                "metagen.info.require_namespace",
            )),
        }
    }
}

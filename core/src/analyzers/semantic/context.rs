use std::collections::HashSet;

use log::trace;

use crate::info::GenerateInfo;

/// State shared by every rule walk of one file. Only the rule-name set
/// accumulates here; variable scopes are created per rule and returned.
pub struct AnalysisContext<'a> {
    pub info: &'a GenerateInfo,
    rule_names: HashSet<String>,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(info: &'a GenerateInfo) -> Self {
        AnalysisContext {
            info,
            rule_names: HashSet::new(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.info.source()
    }

    pub fn add_rule_name(&mut self, name: &str) {
        if self.rule_names.insert(name.to_string()) {
            trace!("rule name `{}` registered", name);
        }
    }

    pub fn rule_names(&self) -> &HashSet<String> {
        &self.rule_names
    }

    pub fn into_rule_names(self) -> HashSet<String> {
        self.rule_names
    }
}

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use super::decl::PendingGrammar;
use super::scope::{RawName, RuleScope};
use crate::analyzers::output::{Analysis, ArgumentKind, GrammarAnalysis, Resolution};
use crate::ast::NodeId;

/// Turns walked grammars into an `Analysis` once the rule-name set is final.
pub(crate) fn finalize(
    pending: Vec<PendingGrammar>,
    rule_names: HashSet<String>,
    default_imports: Vec<String>,
) -> Analysis {
    let mut resolutions = HashMap::new();
    let mut arguments = HashMap::new();
    let mut grammars = Vec::with_capacity(pending.len());

    for PendingGrammar { node_id, decl, mut rules } in pending {
        for set in rules.iter_mut() {
            for alternative in set.alternatives_mut() {
                alternative.scope.finalize(&rule_names);
                resolve_scope(&alternative.scope, &rule_names, &mut resolutions, &mut arguments);
            }

            let cacheable = set
                .alternatives()
                .iter()
                .all(|a| !a.scope.has_bindings() && a.scope.slots().is_empty());
            set.set_cacheable(cacheable);
            debug!(
                "{}.{}: {} alternative(s), cacheable = {}",
                decl.class_name,
                set.name(),
                set.alternatives().len(),
                cacheable
            );

            if set.is_mixed_override() {
                warn!(
                    "{}.{}: some definitions are marked override and some are not; the rule is emitted as an override",
                    decl.class_name,
                    set.name()
                );
            }
        }

        grammars.push(GrammarAnalysis { node_id, decl, rules });
    }

    Analysis {
        rule_names,
        grammars,
        default_imports,
        resolutions,
        arguments,
    }
}

fn resolve_scope(
    scope: &RuleScope,
    rule_names: &HashSet<String>,
    resolutions: &mut HashMap<NodeId, Resolution>,
    arguments: &mut HashMap<NodeId, ArgumentKind>,
) {
    for (id, raw) in &scope.names {
        let resolution = match raw {
            RawName::Bare(name) if rule_names.contains(name) => Resolution::Rule {
                name: name.clone(),
                bypass_virtual: false,
            },
            RawName::Bare(name) => Resolution::Variable { name: name.clone() },
            RawName::Qualified { name, bypass_virtual } => Resolution::Rule {
                name: name.clone(),
                bypass_virtual: *bypass_virtual,
            },
        };
        resolutions.insert(*id, resolution);
    }

    // a callee with arguments is always a rule, known or not
    for (id, raw) in &scope.callees {
        let resolution = match raw {
            RawName::Bare(name) => Resolution::Rule {
                name: name.clone(),
                bypass_virtual: false,
            },
            RawName::Qualified { name, bypass_virtual } => Resolution::Rule {
                name: name.clone(),
                bypass_virtual: *bypass_virtual,
            },
        };
        resolutions.insert(*id, resolution);
    }

    for (id, text) in &scope.arguments {
        let kind = if rule_names.contains(text) {
            ArgumentKind::Rule
        } else if scope.contains(text) {
            ArgumentKind::Variable
        } else {
            ArgumentKind::Value
        };
        arguments.insert(*id, kind);
    }
}

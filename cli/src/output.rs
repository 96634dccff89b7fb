//! Terminal presentation: status lines, the progress bar and the rule
//! report table.

use std::collections::BTreeSet;

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use metagen_core::Analysis;

/// Styles for different output elements.
pub struct FormatStyle {
    pub title: Style,
    pub info: Style,
    pub warning: Style,
    pub error: Style,
    pub success: Style,
}

impl Default for FormatStyle {
    fn default() -> Self {
        FormatStyle {
            title: Style::new().bold().underlined(),
            info: Style::new().cyan(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            success: Style::new().green().bold(),
        }
    }
}

impl FormatStyle {
    pub fn generated(&self, input: &str, output: &str) -> String {
        format!("{} {} -> {}", self.success.apply_to("generated"), input, self.info.apply_to(output))
    }

    pub fn failed(&self, report: &str) -> String {
        format!("{} {}", self.error.apply_to("failed"), report)
    }

    pub fn summary(&self, succeeded: usize, failed: usize) -> String {
        let failed_text = format!("{} failed", failed);
        let failed_text = if failed > 0 {
            self.warning.apply_to(failed_text).to_string()
        } else {
            failed_text
        };
        format!("{} {} succeeded, {}", self.title.apply_to("metagen:"), succeeded, failed_text)
    }
}

/// A bar for multi-bundle runs; hidden when only one input is given.
pub fn progress_bar(len: usize) -> ProgressBar {
    if len < 2 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

/// One row per alternative set of every grammar in `analysis`.
pub fn rule_table(analysis: &Analysis) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["grammar", "rule", "alternatives", "override", "cacheable", "slots"]);

    for grammar in &analysis.grammars {
        for set in grammar.rules.iter() {
            let slots: BTreeSet<&str> = set
                .alternatives()
                .iter()
                .flat_map(|a| a.scope.slots().iter().map(String::as_str))
                .collect();
            table.add_row(vec![
                grammar.decl.class_name.clone(),
                set.name().to_string(),
                set.alternatives().len().to_string(),
                yes_no(set.is_override()),
                yes_no(set.is_cacheable()),
                slots.into_iter().collect::<Vec<_>>().join(", "),
            ]);
        }
    }
    table
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

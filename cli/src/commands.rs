use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use metagen_core::{
    ChoiceMode, GrammarBundle, OutputError, analyze_semantic_rules, compile_grammar,
    generate_error_report,
};

use crate::output::{FormatStyle, progress_bar, rule_table};

pub struct GenerateOptions {
    pub namespace: String,
    pub out_dir: Option<PathBuf>,
    pub mode: ChoiceMode,
}

/// Generates one parser per bundle. Returns the number of failed bundles.
pub fn generate(bundles: &[PathBuf], options: &GenerateOptions) -> usize {
    let style = FormatStyle::default();
    let bar = progress_bar(bundles.len());
    let mut failed = 0;

    for path in bundles {
        bar.set_message(path.display().to_string());
        match generate_one(path, options) {
            Ok(target) => {
                bar.suspend(|| println!("{}", style.generated(&path.display().to_string(), &target.display().to_string())));
            }
            Err(report) => {
                failed += 1;
                bar.suspend(|| eprintln!("{}", style.failed(&report)));
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    println!("{}", style.summary(bundles.len() - failed, failed));
    failed
}

fn generate_one(path: &Path, options: &GenerateOptions) -> Result<PathBuf, String> {
    let bundle = load_bundle(path)?;
    let info = bundle
        .generate_info()
        .with_namespace(options.namespace.clone())
        .with_choice_mode(options.mode);

    let target = options
        .out_dir
        .clone()
        .unwrap_or_else(|| path.parent().map(Path::to_path_buf).unwrap_or_default())
        .join(format!("{}.g.cs", bundle.stem()));
    debug!("generating {} from {}", target.display(), bundle);

    let text = compile_grammar(bundle.tree, &info).map_err(|e| generate_error_report(e.as_ref()))?;
    fs::write(&target, text)
        .map_err(|e| generate_error_report(&OutputError::new(e, target.display().to_string())))?;

    info!("wrote {}", target.display());
    Ok(target)
}

/// Prints the rule report of one bundle. Returns false on failure.
pub fn inspect(path: &Path) -> bool {
    let style = FormatStyle::default();
    let result = load_bundle(path).and_then(|bundle| {
        let info = bundle.generate_info();
        analyze_semantic_rules(&bundle.tree, &info).map_err(|e| generate_error_report(e.as_ref()))
    });

    match result {
        Ok(analysis) => {
            println!("{}", style.title.apply_to(path.display()));
            println!("{}", rule_table(&analysis));
            for import in &analysis.default_imports {
                println!("{} {}", style.info.apply_to("adds"), import);
            }
            true
        }
        Err(report) => {
            eprintln!("{}", style.failed(&report));
            false
        }
    }
}

fn load_bundle(path: &Path) -> Result<GrammarBundle, String> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("METAGEN | ERROR | {} | cannot read bundle: {}", path.display(), e))?;
    let bundle = GrammarBundle::from_json(&json)
        .map_err(|e| format!("{} ({})", generate_error_report(&e), path.display()))?;
    if bundle.is_empty() {
        return Err(format!("METAGEN | ERROR | {} | bundle has an empty grammar source", path.display()));
    }
    Ok(bundle)
}

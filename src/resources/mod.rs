use std::path::Path;

use anyhow::{Context, bail};

use crate::data_structures::block::BlockLibrary;

/**
 * This module contains all logic for loading block templates and rules from asset
 * files and for writing generated geometry back out.
 */
pub mod export;
pub mod rule;
pub mod template;

pub use export::{export_obj, write_obj};
pub use rule::parse_rule;
pub use template::parse_template;

/// Load every template and rule from `dir`.
///
/// Templates are numbered from zero: `0.txt` with `0rule.txt`, `1.txt` with
/// `1rule.txt` and so on, up to the first missing number.
pub fn load_library(dir: impl AsRef<Path>) -> anyhow::Result<BlockLibrary> {
    let dir = dir.as_ref();
    let mut templates = Vec::new();
    let mut rules = Vec::new();
    for id in 0.. {
        let template_name = format!("{id}.txt");
        let template_path = dir.join(&template_name);
        if !template_path.exists() {
            break;
        }
        let text = load_string(&template_path)?;
        templates.push(template::parse_template(id, &template_name, &text)?);

        let rule_name = format!("{id}rule.txt");
        let text = load_string(&dir.join(&rule_name))
            .with_context(|| format!("block template {id} has no substitution rule"))?;
        rules.push(rule::parse_rule(&rule_name, &text)?);
    }
    if templates.is_empty() {
        bail!("no block templates (0.txt, 1.txt, ...) in {}", dir.display());
    }
    log::info!("Loaded {} block templates from {}", templates.len(), dir.display());
    BlockLibrary::new(templates, rules)
}

pub fn load_string(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

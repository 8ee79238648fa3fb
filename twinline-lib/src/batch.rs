//! Sequential driver: scan, transform, render and write every template.

use crate::config::BatchConfig;
use crate::error::{InlineError, Result};
use crate::inline::Inliner;
use crate::scan::list_templates;
use crate::writer::{prepare_output_dir, render, write_template};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
}

/// Processes every template of `config.input`; the first error aborts the run.
pub fn run(config: &BatchConfig, inliner: &Inliner) -> Result<BatchReport> {
    let input = &config.input;
    let metadata = fs::metadata(input).map_err(|e| InlineError::io(input, e))?;
    if !metadata.is_dir() {
        return Err(InlineError::InputNotDirectory(input.clone()));
    }

    let templates = list_templates(input)?;
    log::info!("found {} templates in {}", templates.len(), input.display());

    prepare_output_dir(&config.output, config.clean)?;

    let mut report = BatchReport::default();
    for name in &templates {
        let source_path = input.join(name);
        let source =
            fs::read_to_string(&source_path).map_err(|e| InlineError::io(&source_path, e))?;
        let html = inliner.inline(&source);
        let contents = render(html, config.mode)?;
        let path = write_template(&config.output, name, &contents)?;
        log::info!("{} -> {}", source_path.display(), path.display());
        report.written.push(path);
    }

    log::info!(
        "wrote {} templates to {}",
        report.written.len(),
        config.output.display()
    );
    Ok(report)
}

//! Output side of the pipeline: directory preparation, minification, writes.

use crate::error::{InlineError, Result};
use minify_html::{minify, Cfg};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// HTML and embedded CSS minified, doctype untouched.
    #[default]
    Minified,
    /// Serialized HTML written as is.
    Raw,
}

impl OutputMode {
    /// `minified` selects the minifier; every other value means raw output.
    pub fn from_name(name: &str) -> Self {
        if name == "minified" {
            OutputMode::Minified
        } else {
            OutputMode::Raw
        }
    }
}

/// Creates `dir` (and parents), removing it first when `clean` is set.
pub fn prepare_output_dir(dir: &Path, clean: bool) -> Result<()> {
    if clean && dir.exists() {
        log::info!("cleaning {}", dir.display());
        fs::remove_dir_all(dir).map_err(|e| InlineError::io(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| InlineError::io(dir, e))
}

pub fn minify_document(html: &str) -> Result<String> {
    let mut cfg = Cfg::new();
    cfg.minify_css = true;
    cfg.do_not_minify_doctype = true;
    Ok(String::from_utf8(minify(html.as_bytes(), &cfg))?)
}

pub fn render(html: String, mode: OutputMode) -> Result<String> {
    match mode {
        OutputMode::Minified => minify_document(&html),
        OutputMode::Raw => Ok(html),
    }
}

/// Writes `contents` to `dir/name` and returns the written path.
pub fn write_template(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents).map_err(|e| InlineError::io(&path, e))?;
    Ok(path)
}

use crate::error::{InlineError, Result};
use std::fs;
use std::path::Path;

pub const TEMPLATE_EXTENSION: &str = ".html";

/// Names of the `.html` entries of `dir` that are not directories, in
/// directory-listing order. Symlinks are resolved; dangling ones are skipped.
pub fn list_templates(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| InlineError::io(dir, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| InlineError::io(dir, e))?;
        let name = match entry.file_name().into_string() {
            Ok(name) if name.ends_with(TEMPLATE_EXTENSION) => name,
            Ok(_) => continue,
            Err(name) => {
                log::warn!("skipping non UTF-8 file name {:?}", name);
                continue;
            }
        };
        // Follows symlinks, so linked templates are picked up.
        let path = entry.path();
        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_dir() => continue,
            Ok(_) => names.push(name),
            Err(err) => log::warn!("skipping {}: {}", path.display(), err),
        }
    }
    Ok(names)
}

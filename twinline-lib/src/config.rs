use crate::writer::OutputMode;
use std::path::PathBuf;

/// Switches for the template transformer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineOptions {
    /// Push the baseline stylesheet into inline styles before resolving classes.
    pub inject_baseline: bool,
    /// Drop the `class` attribute entirely; otherwise unresolved classes stay.
    pub strip_unresolved_classes: bool,
    /// Remove every `<style>` element once its rules have been used.
    pub remove_style_blocks: bool,
    /// Replaces the embedded preflight when set.
    pub baseline_css: Option<String>,
}

impl Default for InlineOptions {
    fn default() -> Self {
        InlineOptions {
            inject_baseline: true,
            strip_unresolved_classes: true,
            remove_style_blocks: true,
            baseline_css: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mode: OutputMode,
    /// Delete the output directory before writing.
    pub clean: bool,
}

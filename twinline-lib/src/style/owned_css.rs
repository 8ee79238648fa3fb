// Owned copies of the lightningcss rules we care about, free of the source lifetime.
use std::fmt;

/// A fully-owned CSS stylesheet: top-level style rules only.
#[derive(Debug, Default, Clone)]
pub struct OwnedStylesheet {
    pub rules: Vec<OwnedRule>,
}

#[derive(Debug, Clone)]
pub struct OwnedRule {
    /// e.g. "div", ".red", "[type=\"button\"]"
    pub selectors: Vec<String>,
    pub declarations: Vec<OwnedDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedDeclaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl OwnedDeclaration {
    pub fn new(property: &str, value: &str) -> Self {
        OwnedDeclaration {
            property: property.to_string(),
            value: value.to_string(),
            important: false,
        }
    }
}

impl fmt::Display for OwnedDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}

impl OwnedRule {
    /// Renders the declarations as inline style text: `prop: value; prop: value`.
    pub fn declaration_text(&self) -> String {
        render_declarations(&self.declarations)
    }
}

pub fn render_declarations(declarations: &[OwnedDeclaration]) -> String {
    declarations
        .iter()
        .filter(|decl| !decl.property.is_empty())
        .map(|decl| decl.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Appends `addition` to an existing inline style, separated by `; `.
///
/// Trailing separators of the existing value are trimmed; empty pieces are skipped.
pub fn merge_style(existing: Option<&str>, addition: &str) -> String {
    let existing = existing
        .map(|s| s.trim().trim_end_matches(';').trim_end())
        .unwrap_or("");
    let addition = addition.trim().trim_end_matches(';').trim_end();
    match (existing.is_empty(), addition.is_empty()) {
        (true, _) => addition.to_string(),
        (false, true) => existing.to_string(),
        (false, false) => format!("{}; {}", existing, addition),
    }
}

//! Class name → inline CSS lookups.
//!
//! The utility engine and the document's own `<style>` blocks are both
//! `ClassResolver`s, so the DOM walk in `crate::inline` never needs to know
//! which backend produced a declaration string.

use crate::style::owned_css::{render_declarations, OwnedStylesheet};
use crate::style::stylesheet::parse_stylesheet_lenient;
use std::cell::RefCell;
use std::collections::HashMap;
use tailwind_css::TailwindBuilder;

/// Outcome of resolving a class list: the merged declarations of the
/// recognized classes, and the tokens this resolver did not recognize.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub css: Option<String>,
    pub unresolved: Vec<&'a str>,
}

pub trait ClassResolver {
    /// CSS declarations (`prop: value; ...`) for one class, or `None` when the
    /// class is unknown to this resolver.
    fn resolve(&self, class_name: &str) -> Option<String>;

    /// Resolves a whole class list in one pass. Each token is looked up once.
    fn resolve_all<'a>(&self, class_names: &[&'a str]) -> Resolution<'a> {
        let mut parts = Vec::new();
        let mut unresolved = Vec::new();
        for &class_name in class_names {
            match self.resolve(class_name) {
                Some(css) => parts.push(css),
                None => unresolved.push(class_name),
            }
        }
        Resolution {
            css: (!parts.is_empty()).then(|| parts.join("; ")),
            unresolved,
        }
    }
}

/// Tailwind utility classes, compiled by `tailwind-css`.
pub struct TailwindResolver {
    builder: RefCell<TailwindBuilder>,
}

impl TailwindResolver {
    pub fn new() -> Self {
        TailwindResolver {
            builder: RefCell::new(TailwindBuilder::default()),
        }
    }

    /// Inline style produced by the engine for `classes`.
    fn inline(&self, classes: &str) -> Option<String> {
        let (_leftover, style) = self.builder.borrow_mut().inline(classes).ok()?;
        let style = style.trim();
        if style.is_empty() {
            None
        } else {
            Some(style.to_string())
        }
    }
}

impl Default for TailwindResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassResolver for TailwindResolver {
    /// Variant classes (`hover:`, `md:`, `dark:`) are never recognized: the
    /// engine would inline them as unconditional declarations.
    fn resolve(&self, class_name: &str) -> Option<String> {
        if class_name.trim().is_empty() || has_variant(class_name) {
            return None;
        }
        self.inline(class_name)
    }

    /// One engine call over the recognized classes, so the engine merges them.
    fn resolve_all<'a>(&self, class_names: &[&'a str]) -> Resolution<'a> {
        let (known, unresolved): (Vec<&'a str>, Vec<&'a str>) = class_names
            .iter()
            .copied()
            .partition(|class_name| self.resolve(class_name).is_some());
        let css = if known.is_empty() {
            None
        } else {
            self.inline(&known.join(" "))
        };
        Resolution { css, unresolved }
    }
}

/// True when `class_name` carries a variant prefix: a `:` outside `[...]`.
pub fn has_variant(class_name: &str) -> bool {
    let mut depth = 0usize;
    for ch in class_name.chars() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

/// Single-class rules found in a document's `<style>` blocks.
///
/// The CSS is parsed once; lookups are by class name.
#[derive(Debug, Default)]
pub struct StyleBlockResolver {
    by_class: HashMap<String, String>,
}

impl StyleBlockResolver {
    pub fn from_css(css_text: &str) -> Self {
        Self::from_stylesheet(&parse_stylesheet_lenient(css_text))
    }

    /// The first rule listing `.name` wins, like a linear search would.
    pub fn from_stylesheet(sheet: &OwnedStylesheet) -> Self {
        let mut by_class = HashMap::new();
        for rule in &sheet.rules {
            let text = render_declarations(&rule.declarations);
            for selector in &rule.selectors {
                if let Some(class_name) = class_selector_name(selector) {
                    by_class.entry(class_name).or_insert_with(|| text.clone());
                }
            }
        }
        StyleBlockResolver { by_class }
    }
}

impl ClassResolver for StyleBlockResolver {
    fn resolve(&self, class_name: &str) -> Option<String> {
        self.by_class
            .get(class_name)
            .filter(|text| !text.is_empty())
            .cloned()
    }
}

/// Returns the class name when `selector` is exactly one class selector
/// (`.foo`, `.md\:flex`), with CSS escapes removed.
pub fn class_selector_name(selector: &str) -> Option<String> {
    let rest = selector.trim().strip_prefix('.')?;
    let mut name = String::new();
    let mut chars = rest.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => name.push(chars.next()?),
            '.' | '#' | '[' | ':' | '>' | '+' | '~' | '*' | ',' => return None,
            ch if ch.is_whitespace() => return None,
            ch => name.push(ch),
        }
    }
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Fixed;

    impl ClassResolver for Fixed {
        fn resolve(&self, class_name: &str) -> Option<String> {
            match class_name {
                "a" => Some("color: red".into()),
                "b" => Some("margin: 0".into()),
                _ => None,
            }
        }
    }

    #[test]
    fn test_default_resolve_all_joins_known_classes() {
        let resolution = Fixed.resolve_all(&["a", "zzz", "b"]);
        assert_eq!(resolution.css.as_deref(), Some("color: red; margin: 0"));
        assert_eq!(resolution.unresolved, vec!["zzz"]);
        assert_eq!(
            Fixed.resolve_all(&["zzz"]),
            Resolution {
                css: None,
                unresolved: vec!["zzz"],
            }
        );
    }

    #[test]
    fn test_has_variant() {
        assert!(has_variant("hover:underline"));
        assert!(has_variant("md:flex"));
        assert!(has_variant("[&>p]:mt-2"));
        assert!(!has_variant("p-4"));
        assert!(!has_variant("bg-[url(a:b)]"));
        assert!(!has_variant("w-1/2"));
    }

    #[test]
    fn test_class_selector_name() {
        assert_eq!(class_selector_name(".foo").as_deref(), Some("foo"));
        assert_eq!(class_selector_name(".md\\:flex").as_deref(), Some("md:flex"));
        assert_eq!(class_selector_name(".w-1\\.5").as_deref(), Some("w-1.5"));
        assert_eq!(class_selector_name(".foo:hover"), None);
        assert_eq!(class_selector_name(".a.b"), None);
        assert_eq!(class_selector_name("div .a"), None);
        assert_eq!(class_selector_name("#foo"), None);
    }

    #[test]
    fn test_style_blocks_first_rule_wins() {
        let resolver = StyleBlockResolver::from_css(
            ".foo, .bar { text-align: center; }\n.foo { text-align: left; }\n.foo:hover { color: red; }",
        );
        assert_eq!(resolver.resolve("foo").as_deref(), Some("text-align: center"));
        assert_eq!(resolver.resolve("bar").as_deref(), Some("text-align: center"));
        assert_eq!(resolver.resolve("baz"), None);
    }

    #[test]
    fn test_style_blocks_keep_vendor_prefixes() {
        let resolver =
            StyleBlockResolver::from_css(".foo{-webkit-text-size-adjust:100%;-moz-tab-size:4}");
        assert_eq!(
            resolver.resolve("foo").as_deref(),
            Some("-webkit-text-size-adjust: 100%; -moz-tab-size: 4")
        );
    }

    #[test]
    fn test_style_block_literal_declarations() {
        let resolver = StyleBlockResolver::from_css(".foo { color: red }\n.bold{font-weight:bold}");
        assert_eq!(resolver.resolve("foo").as_deref(), Some("color: red"));
        assert_eq!(resolver.resolve("bold").as_deref(), Some("font-weight: bold"));
    }

    #[test]
    fn test_tailwind_resolves_spacing_utility() {
        let resolver = TailwindResolver::new();
        let css = resolver.resolve("p-4").unwrap();
        assert!(css.contains("padding"), "unexpected css: {}", css);
    }

    #[test]
    fn test_tailwind_ignores_variant_classes() {
        let resolver = TailwindResolver::new();
        assert_eq!(resolver.resolve("hover:text-red-500"), None);
        assert_eq!(resolver.resolve("md:p-4"), None);

        let resolution = resolver.resolve_all(&["hover:underline", "text-blue-600", "promo-banner"]);
        let css = resolution.css.unwrap();
        assert!(css.contains("color"), "unexpected css: {}", css);
        assert!(!css.contains("underline"), "variant leaked: {}", css);
        assert_eq!(resolution.unresolved, vec!["hover:underline", "promo-banner"]);
    }
}

//! The framework's reset stylesheet, pushed into inline styles.

use crate::dom::dom_tree::Document;
use crate::error::Result;
use crate::style::css_matcher::{matches_complex_selector, parse_complex_selector, ComplexSelector};
use crate::style::owned_css::{merge_style, OwnedStylesheet};
use crate::style::stylesheet::parse_stylesheet;

/// Tailwind's preflight, shipped with the binary.
pub const PREFLIGHT_CSS: &str = include_str!("../../assets/preflight.css");

#[derive(Debug)]
struct BaselineRule {
    selectors: Vec<ComplexSelector>,
    declarations: String,
}

#[derive(Debug)]
pub struct Baseline {
    rules: Vec<BaselineRule>,
}

impl Baseline {
    pub fn preflight() -> Result<Self> {
        Self::from_css(PREFLIGHT_CSS)
    }

    pub fn from_css(css_text: &str) -> Result<Self> {
        Ok(Self::from_stylesheet(&parse_stylesheet(css_text)?))
    }

    /// Selectors with a pseudo-class or pseudo-element (`:`) are dropped.
    /// `html` and `body` match as written; anything else only inside `body`.
    pub fn from_stylesheet(sheet: &OwnedStylesheet) -> Self {
        let rules = sheet
            .rules
            .iter()
            .filter_map(|rule| {
                let selectors: Vec<ComplexSelector> = rule
                    .selectors
                    .iter()
                    .filter(|selector| !selector.contains(':'))
                    .filter_map(|selector| {
                        let selector = selector.trim();
                        if selector == "html" || selector == "body" {
                            parse_complex_selector(selector)
                        } else {
                            parse_complex_selector(&format!("body {}", selector))
                        }
                    })
                    .collect();
                let declarations = rule.declaration_text();
                if selectors.is_empty() || declarations.is_empty() {
                    None
                } else {
                    Some(BaselineRule {
                        selectors,
                        declarations,
                    })
                }
            })
            .collect();
        Baseline { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Appends each matching rule's declarations to the element's `style`,
    /// at most once per rule and element. Returns the number of applications.
    pub fn inject(&self, document: &Document) -> usize {
        let elements = document.elements();
        let mut applied = 0;
        for rule in &self.rules {
            for node in &elements {
                if !rule
                    .selectors
                    .iter()
                    .any(|selector| matches_complex_selector(node, selector))
                {
                    continue;
                }
                let mut node = node.borrow_mut();
                if let Some(elem) = node.as_element_mut() {
                    let style = merge_style(elem.attr("style"), &rule.declarations);
                    elem.set_attr("style", &style);
                    applied += 1;
                }
            }
        }
        log::debug!("baseline: {} rule applications", applied);
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::html::create_dom_tree;
    use pretty_assertions::assert_eq;

    fn style_of(document: &Document, tag: &str) -> Option<String> {
        let node = document.elements_by_tag(tag).remove(0);
        let node = node.borrow();
        node.as_element()
            .and_then(|e| e.attr("style"))
            .map(str::to_string)
    }

    #[test]
    fn test_preflight_parses() {
        let baseline = Baseline::preflight().unwrap();
        assert!(!baseline.is_empty());
    }

    #[test]
    fn test_pseudo_selectors_are_never_applied() {
        let baseline = Baseline::from_css(
            "a:hover { text-align: center; }\np::first-line { text-align: left; }\np { text-align: right; }",
        )
        .unwrap();
        assert_eq!(baseline.len(), 1);

        let document = create_dom_tree("<p><a href=\"#\">x</a></p>");
        baseline.inject(&document);
        assert_eq!(style_of(&document, "a"), None);
        assert_eq!(style_of(&document, "p").as_deref(), Some("text-align: right"));
    }

    #[test]
    fn test_html_and_body_match_directly() {
        let baseline = Baseline::from_css(
            "html { text-align: center; }\nbody { display: block; }\n* { text-align: left; }",
        )
        .unwrap();
        let document = create_dom_tree("<div>x</div>");
        baseline.inject(&document);

        assert_eq!(style_of(&document, "html").as_deref(), Some("text-align: center"));
        assert_eq!(style_of(&document, "body").as_deref(), Some("display: block"));
        // `*` is scoped to body descendants
        assert_eq!(style_of(&document, "head"), None);
        assert_eq!(style_of(&document, "div").as_deref(), Some("text-align: left"));
    }

    #[test]
    fn test_rule_applies_once_per_element() {
        let baseline = Baseline::from_css("b, strong, .x { text-align: center; }").unwrap();
        let document = create_dom_tree("<b class=\"x\">x</b>");
        assert_eq!(baseline.inject(&document), 1);
        assert_eq!(style_of(&document, "b").as_deref(), Some("text-align: center"));
    }

    #[test]
    fn test_existing_style_comes_first() {
        let baseline = Baseline::from_css("p { text-align: center; }").unwrap();
        let document = create_dom_tree("<p style=\"display: block;\">x</p>");
        baseline.inject(&document);
        assert_eq!(
            style_of(&document, "p").as_deref(),
            Some("display: block; text-align: center")
        );
    }
}

//! The template transformer: classes in, inline styles out.

use crate::config::InlineOptions;
use crate::dom::dom_tree::{self, Document, NodeRef};
use crate::error::Result;
use crate::parser::html::create_dom_tree;
use crate::parser::serialize::to_html;
use crate::style::baseline::Baseline;
use crate::style::owned_css::merge_style;
use crate::style::resolver::{ClassResolver, Resolution, StyleBlockResolver};

pub struct Inliner {
    resolver: Box<dyn ClassResolver>,
    baseline: Option<Baseline>,
    options: InlineOptions,
}

impl Inliner {
    /// Builds a transformer; the baseline stylesheet is parsed here, once.
    pub fn new(resolver: Box<dyn ClassResolver>, options: InlineOptions) -> Result<Self> {
        let baseline = if options.inject_baseline {
            let baseline = match &options.baseline_css {
                Some(css) => Baseline::from_css(css)?,
                None => Baseline::preflight()?,
            };
            log::debug!("baseline stylesheet: {} applicable rules", baseline.len());
            Some(baseline)
        } else {
            None
        };
        Ok(Inliner {
            resolver,
            baseline,
            options,
        })
    }

    /// Transforms one HTML document.
    pub fn inline(&self, html: &str) -> String {
        let document = create_dom_tree(html);
        self.inline_document(&document);
        to_html(&document)
    }

    /// Applies baseline, class and style-block styles to a parsed document in place.
    pub fn inline_document(&self, document: &Document) {
        let style_blocks = collect_style_blocks(document);

        if let Some(baseline) = &self.baseline {
            baseline.inject(document);
        }

        for node in document.elements() {
            self.inline_element(&node, &style_blocks);
        }

        if self.options.remove_style_blocks {
            let removed = document.remove_elements("style");
            log::debug!("removed {} <style> blocks", removed);
        }
    }

    fn inline_element(&self, node: &NodeRef, style_blocks: &StyleBlockResolver) {
        let mut node = node.borrow_mut();
        let Some(elem) = node.as_element_mut() else {
            return;
        };
        let Some(class_attr) = elem.attr("class").map(str::to_string) else {
            return;
        };
        let classes: Vec<&str> = class_attr.split_whitespace().collect();

        let Resolution { css, unresolved } = self.resolver.resolve_all(&classes);
        if let Some(css) = css {
            let style = merge_style(elem.attr("style"), &css);
            elem.set_attr("style", &style);
        }

        for class_name in &unresolved {
            match style_blocks.resolve(class_name) {
                Some(css) => {
                    let style = merge_style(elem.attr("style"), &css);
                    elem.set_attr("style", &style);
                }
                None => log::debug!("class `{}` has no known style", class_name),
            }
        }

        if self.options.strip_unresolved_classes || unresolved.is_empty() {
            elem.remove_attr("class");
        } else {
            elem.set_attr("class", &unresolved.join(" "));
        }
    }
}

/// Parses the text of every `<style>` element once.
fn collect_style_blocks(document: &Document) -> StyleBlockResolver {
    let css = document
        .elements_by_tag("style")
        .iter()
        .map(dom_tree::text_content)
        .collect::<Vec<_>>()
        .join("\n");
    if css.trim().is_empty() {
        StyleBlockResolver::default()
    } else {
        StyleBlockResolver::from_css(&css)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::resolver::TailwindResolver;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct MapResolver(HashMap<&'static str, &'static str>);

    impl ClassResolver for MapResolver {
        fn resolve(&self, class_name: &str) -> Option<String> {
            self.0.get(class_name).map(|css| css.to_string())
        }
    }

    fn resolver() -> Box<dyn ClassResolver> {
        Box::new(MapResolver(HashMap::from([
            ("text-red-500", "color: rgb(239,68,68)"),
            ("p-4", "padding: 1rem"),
        ])))
    }

    fn no_baseline() -> InlineOptions {
        InlineOptions {
            inject_baseline: false,
            ..InlineOptions::default()
        }
    }

    fn body(html: &str) -> String {
        let start = html.find("<body>").map(|i| i + "<body>".len()).unwrap();
        let end = html.find("</body>").unwrap();
        html[start..end].to_string()
    }

    #[test]
    fn test_utility_and_style_block_classes_are_inlined() {
        let inliner = Inliner::new(resolver(), no_baseline()).unwrap();
        let out = inliner.inline(
            "<html><head><style>.foo { text-align: center; }</style></head><body><div class=\"text-red-500 foo\">x</div></body></html>",
        );
        assert_eq!(
            body(&out),
            "<div style=\"color: rgb(239,68,68); text-align: center\">x</div>"
        );
        assert!(!out.contains("<style>"));
    }

    #[test]
    fn test_utility_css_precedes_style_block_css() {
        let inliner = Inliner::new(resolver(), no_baseline()).unwrap();
        let out = inliner.inline(
            "<style>.foo{font-weight:bold}</style><div class=\"text-red-500 foo\">x</div>",
        );
        assert_eq!(
            body(&out),
            "<div style=\"color: rgb(239,68,68); font-weight: bold\">x</div>"
        );
    }

    #[test]
    fn test_unknown_class_falls_back_to_style_block() {
        let inliner = Inliner::new(resolver(), no_baseline()).unwrap();
        let out = inliner.inline("<style>.foo { color: red }</style><span class=\"foo\">x</span>");
        assert_eq!(body(&out), "<span style=\"color: red\">x</span>");
    }

    #[test]
    fn test_tailwind_variants_are_not_inlined() {
        let inliner = Inliner::new(Box::new(TailwindResolver::new()), no_baseline()).unwrap();
        let out = inliner.inline("<a href=\"#\" class=\"hover:underline text-blue-600\">go</a>");
        let link = body(&out);
        assert!(link.contains("color"), "missing utility css: {}", link);
        assert!(!link.contains("underline"), "variant inlined: {}", link);
        assert!(!link.contains("class="), "class kept: {}", link);
    }

    #[test]
    fn test_preflight_keeps_vendor_prefixes() {
        let inliner = Inliner::new(resolver(), InlineOptions::default()).unwrap();
        let out = inliner.inline("<!DOCTYPE html><html><head></head><body><p>x</p></body></html>");
        let html_tag = &out[out.find("<html").unwrap()..out.find("<head").unwrap()];
        assert!(html_tag.contains("-webkit-text-size-adjust: 100%"), "{}", html_tag);
        assert!(html_tag.contains("-moz-tab-size: 4; tab-size: 4"), "{}", html_tag);
        assert!(!html_tag.contains("; tab-size: 4; tab-size: 4"), "{}", html_tag);
    }

    #[test]
    fn test_existing_style_is_kept_first() {
        let inliner = Inliner::new(resolver(), no_baseline()).unwrap();
        let out = inliner.inline("<p style=\"margin: 0;\" class=\"p-4\">x</p>");
        assert_eq!(body(&out), "<p style=\"margin: 0; padding: 1rem\">x</p>");
    }

    #[test]
    fn test_keep_unresolved_classes() {
        let options = InlineOptions {
            strip_unresolved_classes: false,
            remove_style_blocks: false,
            ..no_baseline()
        };
        let inliner = Inliner::new(resolver(), options).unwrap();
        let out = inliner.inline(
            "<style>.foo { text-align: center; }</style><p class=\"p-4 foo bar\">x</p><p class=\"p-4\">y</p>",
        );
        assert_eq!(
            body(&out),
            "<p class=\"foo bar\" style=\"padding: 1rem; text-align: center\">x</p><p style=\"padding: 1rem\">y</p>"
        );
        assert!(out.contains("<style>"));
    }

    #[test]
    fn test_empty_class_attribute_is_removed() {
        let inliner = Inliner::new(resolver(), no_baseline()).unwrap();
        let out = inliner.inline("<p class=\"  \">x</p>");
        assert_eq!(body(&out), "<p>x</p>");
    }

    #[test]
    fn test_baseline_precedes_class_styles() {
        let options = InlineOptions {
            baseline_css: Some("p { text-align: center; }\np:hover { color: red; }".into()),
            ..InlineOptions::default()
        };
        let inliner = Inliner::new(resolver(), options).unwrap();
        let out = inliner.inline("<p class=\"p-4\">x</p>");
        assert_eq!(body(&out), "<p style=\"text-align: center; padding: 1rem\">x</p>");
    }

    #[test]
    fn test_output_is_deterministic() {
        let inliner = Inliner::new(resolver(), InlineOptions::default()).unwrap();
        let html = "<!DOCTYPE html><html><head><style>.x{text-align:left}</style></head><body><h1 class=\"p-4 x\">a</h1><ul><li class=\"text-red-500\">b</li></ul></body></html>";
        assert_eq!(inliner.inline(html), inliner.inline(html));
    }
}

use crate::error::{InlineError, Result};
use crate::style::owned_css::{OwnedDeclaration, OwnedRule, OwnedStylesheet};
use lightningcss::declaration::DeclarationBlock;
use lightningcss::rules::{style::StyleRule, CssRule};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet as LightningStyleSheet};
use lightningcss::traits::ToCss;

/// Parse a raw CSS string (LightningCSS) and convert it to a fully-owned stylesheet.
///
/// Unknown or invalid rules are skipped by the parser's error recovery; only a
/// fatal tokenizer error fails the whole sheet.
pub fn parse_stylesheet(css_text: &str) -> Result<OwnedStylesheet> {
    let parser_opts = ParserOptions {
        error_recovery: true,
        ..ParserOptions::default()
    };
    let sheet = LightningStyleSheet::parse(css_text, parser_opts)
        .map_err(|e| InlineError::Stylesheet(e.to_string()))?;

    let rules = sheet
        .rules
        .0
        .iter()
        .filter_map(|rule| match rule {
            CssRule::Style(style_rule) => Some(convert_style_rule(style_rule)),
            // @media, @font-face, @keyframes etc. cannot be inlined
            _ => None,
        })
        .collect();

    Ok(OwnedStylesheet { rules })
}

/// Like `parse_stylesheet`, but an unparsable sheet yields no rules.
pub fn parse_stylesheet_lenient(css_text: &str) -> OwnedStylesheet {
    parse_stylesheet(css_text).unwrap_or_else(|err| {
        log::warn!("ignoring unparsable <style> content: {}", err);
        OwnedStylesheet::default()
    })
}

/// Copy a single StyleRule's selectors + declarations into an OwnedRule.
fn convert_style_rule(style_rule: &StyleRule<'_>) -> OwnedRule {
    let selectors = style_rule
        .selectors
        .0
        .iter()
        .filter_map(|selector| selector.to_css_string(PrinterOptions::default()).ok())
        .collect();

    OwnedRule {
        selectors,
        declarations: convert_declarations(&style_rule.declarations),
    }
}

fn convert_declarations(block: &DeclarationBlock<'_>) -> Vec<OwnedDeclaration> {
    let normal = block.declarations.iter().map(|p| (p, false));
    let important = block.important_declarations.iter().map(|p| (p, true));

    normal
        .chain(important)
        .filter_map(|(property, important)| {
            // `PropertyId::name` drops the vendor prefix; the printer keeps it.
            let printed = property
                .property_id()
                .to_css_string(PrinterOptions::default())
                .and_then(|name| {
                    property
                        .value_to_css_string(PrinterOptions::default())
                        .map(|value| (name, value))
                });
            match printed {
                Ok((property, value)) => Some(OwnedDeclaration {
                    property,
                    value,
                    important,
                }),
                Err(err) => {
                    log::debug!("skipping unprintable declaration: {}", err);
                    None
                }
            }
        })
        .collect()
}

use crate::dom::dom_tree::{ElementData, NodeRef};
use std::iter::Peekable;
use std::rc::Rc;
use std::str::Chars;

// ------------------------------
// 1. Selector Parsing
// ------------------------------

/// Supported attribute selector operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeOperator {
    /// [attr="value"]
    Exact,
    /// [attr~="value"]
    Includes,
    /// [attr|="value"]
    DashMatch,
    /// [attr^="value"]
    Prefix,
    /// [attr$="value"]
    Suffix,
    /// [attr*="value"]
    Substring,
}

/// One attribute condition; `operator == None` only checks existence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: String,
    pub operator: Option<AttributeOperator>,
    pub value: Option<String>,
}

/// Optional tag, id, classes and attribute conditions, e.g. `input.big[type="text"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeSelector>,
}

/// A key compound selector plus its ancestor/sibling parts, right-to-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub key: CompoundSelector,
    pub ancestors: Vec<(Combinator, CompoundSelector)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// ` `
    Descendant,
    /// `>`
    Child,
    /// `+`
    AdjacentSibling,
    /// `~`
    GeneralSibling,
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|ch| ch.is_whitespace()).is_some() {}
}

fn read_until(chars: &mut Peekable<Chars<'_>>, stop: impl Fn(char) -> bool) -> String {
    let mut buffer = String::new();
    while let Some(ch) = chars.next_if(|&ch| !stop(ch)) {
        buffer.push(ch);
    }
    buffer
}

fn is_compound_boundary(ch: char) -> bool {
    matches!(ch, '#' | '.' | '[')
}

/// Parse a compound selector string, e.g. `div.red#header[disabled][data-type~="main"]`.
pub fn parse_compound_selector(selector: &str) -> CompoundSelector {
    let mut compound = CompoundSelector::default();
    let mut chars = selector.chars().peekable();

    if chars.peek().is_some_and(|ch| ch.is_alphabetic() || *ch == '*') {
        let tag = read_until(&mut chars, is_compound_boundary);
        if tag != "*" {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
    }

    while let Some(ch) = chars.next() {
        match ch {
            '#' => {
                let id = read_until(&mut chars, is_compound_boundary);
                if !id.is_empty() {
                    compound.id = Some(id);
                }
            }
            '.' => {
                let class = read_until(&mut chars, is_compound_boundary);
                if !class.is_empty() {
                    compound.classes.push(class);
                }
            }
            '[' => {
                if let Some(attr) = parse_attribute_selector(&mut chars) {
                    compound.attributes.push(attr);
                }
            }
            _ => {}
        }
    }

    compound
}

/// Parses the inside of `[...]`; the opening bracket is already consumed.
fn parse_attribute_selector(chars: &mut Peekable<Chars<'_>>) -> Option<AttributeSelector> {
    skip_whitespace(chars);
    let name = read_until(chars, |ch| {
        matches!(ch, '=' | ']' | '~' | '|' | '^' | '$' | '*') || ch.is_whitespace()
    });
    skip_whitespace(chars);

    let mut operator = None;
    let mut value = None;
    if let Some(op) = chars.next_if(|&ch| matches!(ch, '=' | '~' | '|' | '^' | '$' | '*')) {
        if op != '=' {
            chars.next_if_eq(&'=');
        }
        operator = match op {
            '=' => Some(AttributeOperator::Exact),
            '~' => Some(AttributeOperator::Includes),
            '|' => Some(AttributeOperator::DashMatch),
            '^' => Some(AttributeOperator::Prefix),
            '$' => Some(AttributeOperator::Suffix),
            '*' => Some(AttributeOperator::Substring),
            _ => None,
        };
        skip_whitespace(chars);
        value = Some(match chars.next_if(|&ch| ch == '"' || ch == '\'') {
            Some(quote) => {
                let quoted = read_until(chars, |ch| ch == quote);
                chars.next();
                quoted
            }
            None => read_until(chars, |ch| ch == ']' || ch.is_whitespace()),
        });
    }

    // Flags such as ` i` are ignored.
    for ch in chars.by_ref() {
        if ch == ']' {
            break;
        }
    }

    if name.is_empty() {
        None
    } else {
        Some(AttributeSelector {
            name,
            operator,
            value,
        })
    }
}

/// Splits a selector on whitespace that is outside `[...]` and quotes.
fn selector_tokens(selector: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for ch in selector.chars() {
        match (quote, ch) {
            (Some(q), ch) if ch == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ch) if ch.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Parse a complex selector string (e.g. `body div.red > p + span`).
/// Combinators are whitespace separated, as lightningcss prints them.
pub fn parse_complex_selector(selector: &str) -> Option<ComplexSelector> {
    let tokens = selector_tokens(selector);
    let mut tokens = tokens.iter().map(String::as_str);
    let mut key = parse_compound_selector(tokens.next()?);
    let mut ancestors = Vec::new();

    while let Some(token) = tokens.next() {
        let (combinator, compound_token) = match token {
            ">" => (Combinator::Child, tokens.next()),
            "+" => (Combinator::AdjacentSibling, tokens.next()),
            "~" => (Combinator::GeneralSibling, tokens.next()),
            _ => (Combinator::Descendant, Some(token)),
        };
        let Some(compound_token) = compound_token else {
            break;
        };
        ancestors.push((combinator, key));
        key = parse_compound_selector(compound_token);
    }
    ancestors.reverse();
    Some(ComplexSelector { key, ancestors })
}

// ------------------------------
// 2. Selector Matching
// ------------------------------

/// Returns true if the element satisfies every part of the compound selector.
pub fn matches_compound(elem: &ElementData, compound: &CompoundSelector) -> bool {
    if let Some(tag) = &compound.tag {
        if !elem.is(tag) {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if elem.attr("id") != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.is_empty() {
        let elem_classes: Vec<&str> = elem.attr("class").unwrap_or("").split_whitespace().collect();
        if !compound
            .classes
            .iter()
            .all(|class| elem_classes.contains(&class.as_str()))
        {
            return false;
        }
    }
    compound
        .attributes
        .iter()
        .all(|attr_sel| matches_attribute(elem, attr_sel))
}

fn matches_attribute(elem: &ElementData, attr_sel: &AttributeSelector) -> bool {
    let Some(actual) = elem.attr(&attr_sel.name) else {
        return false;
    };
    let Some(expected) = attr_sel.value.as_deref() else {
        return true;
    };
    match attr_sel.operator {
        Some(AttributeOperator::Exact) => actual == expected,
        Some(AttributeOperator::Includes) => actual.split_whitespace().any(|w| w == expected),
        Some(AttributeOperator::DashMatch) => {
            actual == expected || actual.starts_with(&format!("{}-", expected))
        }
        Some(AttributeOperator::Prefix) => !expected.is_empty() && actual.starts_with(expected),
        Some(AttributeOperator::Suffix) => !expected.is_empty() && actual.ends_with(expected),
        Some(AttributeOperator::Substring) => !expected.is_empty() && actual.contains(expected),
        None => true,
    }
}

/// Matches a ComplexSelector against a candidate element, right-to-left.
pub fn matches_complex_selector(candidate: &NodeRef, complex: &ComplexSelector) -> bool {
    if !node_matches(candidate, &complex.key) {
        return false;
    }
    let mut current = Rc::clone(candidate);
    for (combinator, compound) in &complex.ancestors {
        let found = match combinator {
            Combinator::Child => parent_element(&current).filter(|p| node_matches(p, compound)),
            Combinator::Descendant => {
                let mut ancestor = parent_element(&current);
                while let Some(node) = ancestor {
                    if node_matches(&node, compound) {
                        ancestor = Some(node);
                        break;
                    }
                    ancestor = parent_element(&node);
                }
                ancestor
            }
            Combinator::AdjacentSibling => previous_element_siblings(&current)
                .into_iter()
                .next()
                .filter(|s| node_matches(s, compound)),
            Combinator::GeneralSibling => previous_element_siblings(&current)
                .into_iter()
                .find(|s| node_matches(s, compound)),
        };
        match found {
            Some(node) => current = node,
            None => return false,
        }
    }
    true
}

fn node_matches(node: &NodeRef, compound: &CompoundSelector) -> bool {
    node.borrow()
        .as_element()
        .is_some_and(|elem| matches_compound(elem, compound))
}

fn parent_element(node: &NodeRef) -> Option<NodeRef> {
    node.borrow()
        .parent()
        .filter(|parent| parent.borrow().as_element().is_some())
}

/// Element siblings before `node`, nearest first.
fn previous_element_siblings(node: &NodeRef) -> Vec<NodeRef> {
    let Some(parent) = node.borrow().parent() else {
        return Vec::new();
    };
    let parent = parent.borrow();
    let Some(index) = parent.children.iter().position(|child| Rc::ptr_eq(child, node)) else {
        return Vec::new();
    };
    let siblings = parent.children[..index]
        .iter()
        .rev()
        .filter(|child| child.borrow().as_element().is_some())
        .cloned()
        .collect();
    siblings
}

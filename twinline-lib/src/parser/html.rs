//! Parsing of HTML templates into the mutable tree of `crate::dom::dom_tree`.
//!
//! html5ever drives the tokenizer and tree construction; `TwinlineTreeSink`
//! receives the callbacks and builds `Rc<RefCell<Node>>` handles.

use crate::dom::dom_tree::{self, ElementData, Node, NodeKind, NodeRef};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    interface::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink},
    Attribute, LocalName, Namespace, QualName,
};
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

/// Creates a DOM tree from the provided HTML content.
///
/// Parsing never fails: malformed markup is repaired the way browsers do it.
pub fn create_dom_tree(html_content: &str) -> dom_tree::Document {
    let tree_sink = TwinlineTreeSink::new();
    html5ever::parse_document(tree_sink, Default::default()).one(html_content.to_string())
}

/// A TreeSink building the document for the inliner.
pub struct TwinlineTreeSink {
    document: dom_tree::Document,
    quirks_mode: RefCell<QuirksMode>,
}

impl TwinlineTreeSink {
    pub fn new() -> Self {
        Self {
            document: dom_tree::new_document(),
            quirks_mode: RefCell::new(QuirksMode::NoQuirks),
        }
    }
}

impl Default for TwinlineTreeSink {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct TwinlineElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for TwinlineElemName {
    fn local_name(&self) -> &LocalName {
        &self.local
    }

    fn ns(&self) -> &Namespace {
        &self.ns
    }
}

fn into_node(child: NodeOrText<NodeRef>) -> NodeRef {
    match child {
        NodeOrText::AppendNode(node) => node,
        NodeOrText::AppendText(text) => Node::new(NodeKind::Text(text.to_string())),
    }
}

impl TreeSink for TwinlineTreeSink {
    type Handle = NodeRef;
    type Output = dom_tree::Document;
    type ElemName<'a>
        = TwinlineElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self.document
    }

    /// Markup errors are repaired by the tree builder; they are only worth a debug line.
    fn parse_error(&self, msg: Cow<'static, str>) {
        log::debug!("html parse error: {}", msg);
    }

    fn get_document(&self) -> Self::Handle {
        Rc::clone(&self.document.root)
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        match &target.borrow().kind {
            NodeKind::Element(elem) => TwinlineElemName {
                ns: elem.qual_name.ns.clone(),
                local: elem.qual_name.local.clone(),
            },
            _ => panic!("elem_name called on non-element node"),
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        Node::new(NodeKind::Element(ElementData::new(name, attrs)))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        Node::new(NodeKind::Comment(text.to_string()))
    }

    /// Processing instructions only exist in XML; keep them as comments.
    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        Node::new(NodeKind::Comment(format!("?{} {}", target, data)))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        dom_tree::append_child(parent, into_node(child));
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = element.borrow().parent().is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        *self.document.doctype.borrow_mut() = Some(dom_tree::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        });
    }

    /// Template contents are kept inline as regular children of the template.
    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        Rc::clone(target)
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        *self.quirks_mode.borrow_mut() = mode;
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, child: NodeOrText<Self::Handle>) {
        dom_tree::insert_before(sibling, into_node(child));
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut target_node = target.borrow_mut();
        if let Some(elem) = target_node.as_element_mut() {
            for attr in attrs {
                let exists = elem
                    .attributes
                    .iter()
                    .any(|existing| existing.name == attr.name);
                if !exists {
                    elem.attributes.push(attr);
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        dom_tree::detach(target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let children = std::mem::take(&mut node.borrow_mut().children);
        for child in children {
            child.borrow_mut().parent = None;
            dom_tree::append_child(new_parent, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tags(document: &dom_tree::Document) -> Vec<String> {
        document
            .elements()
            .iter()
            .filter_map(|node| node.borrow().as_element().map(|e| e.tag.clone()))
            .collect()
    }

    #[test]
    fn test_document_skeleton_is_completed() {
        let document = create_dom_tree("<p>Hello</p>");
        assert_eq!(tags(&document), vec!["html", "head", "body", "p"]);
    }

    #[test]
    fn test_doctype_is_recorded() {
        let document = create_dom_tree(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd"><html></html>"#,
        );
        let doctype = document.doctype.borrow().clone().unwrap();
        assert_eq!(doctype.name, "html");
        assert_eq!(doctype.public_id, "-//W3C//DTD XHTML 1.0 Transitional//EN");
        assert_eq!(
            doctype.system_id,
            "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd"
        );
    }

    #[test]
    fn test_attributes_keep_source_order() {
        let document = create_dom_tree(r#"<div id="a" class="x y" style="color: red"></div>"#);
        let div = document.elements_by_tag("div").remove(0);
        let node = div.borrow();
        let elem = node.as_element().unwrap();
        let names: Vec<&str> = elem.attributes.iter().map(|a| &*a.name.local).collect();
        assert_eq!(names, vec!["id", "class", "style"]);
        assert_eq!(elem.attr("class"), Some("x y"));
    }

    #[test]
    fn test_misnested_markup_is_repaired() {
        // Formatting elements are reconstructed after the misnested close tag.
        let document = create_dom_tree("<p><b>bold<i>both</b>italic</i></p>");
        let p = document.elements_by_tag("p").remove(0);
        let text: Vec<String> = dom_tree::descendant_elements(&p)
            .iter()
            .map(dom_tree::text_content)
            .collect();
        assert_eq!(text, vec!["bold", "both", "italic"]);
    }

    #[test]
    fn test_table_foster_parenting() {
        let document = create_dom_tree("<table>stray<tr><td>cell</td></tr></table>");
        let body = document.elements_by_tag("body").remove(0);
        assert_eq!(dom_tree::text_content(&body), "stray");
        assert_eq!(document.elements_by_tag("td").len(), 1);
    }
}

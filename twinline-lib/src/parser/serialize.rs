//! Serialization of a `dom_tree::Document` back to HTML text.

use crate::dom::dom_tree::{Doctype, Document, NodeKind, NodeRef};
use html5ever::serialize::{serialize, Serialize, SerializeOpts, Serializer, TraversalScope};
use std::io;

struct SerializableDocument<'a>(&'a Document);

impl Serialize for SerializableDocument<'_> {
    fn serialize<S: Serializer>(
        &self,
        serializer: &mut S,
        _traversal_scope: TraversalScope,
    ) -> io::Result<()> {
        if let Some(doctype) = &*self.0.doctype.borrow() {
            serializer.write_doctype(&doctype_text(doctype))?;
        }
        for child in &self.0.root.borrow().children {
            serialize_node(serializer, child)?;
        }
        Ok(())
    }
}

/// `html5ever` writes `<!DOCTYPE {text}>`, so the identifiers ride along in the name.
fn doctype_text(doctype: &Doctype) -> String {
    let mut text = doctype.name.clone();
    if !doctype.public_id.is_empty() {
        text.push_str(&format!(" PUBLIC \"{}\"", doctype.public_id));
        if !doctype.system_id.is_empty() {
            text.push_str(&format!(" \"{}\"", doctype.system_id));
        }
    } else if !doctype.system_id.is_empty() {
        text.push_str(&format!(" SYSTEM \"{}\"", doctype.system_id));
    }
    text
}

fn serialize_node<S: Serializer>(serializer: &mut S, node: &NodeRef) -> io::Result<()> {
    let node = node.borrow();
    match &node.kind {
        NodeKind::DocumentRoot => {
            for child in &node.children {
                serialize_node(serializer, child)?;
            }
            Ok(())
        }
        NodeKind::Element(elem) => {
            let attrs = elem
                .attributes
                .iter()
                .map(|attr| (&attr.name, &*attr.value));
            serializer.start_elem(elem.qual_name.clone(), attrs)?;
            for child in &node.children {
                serialize_node(serializer, child)?;
            }
            serializer.end_elem(elem.qual_name.clone())
        }
        NodeKind::Text(text) => serializer.write_text(text),
        NodeKind::Comment(text) => serializer.write_comment(text),
    }
}

/// Serializes the document, doctype included, to an HTML string.
pub fn to_html(document: &Document) -> String {
    let mut out = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };
    // Writing into a Vec cannot fail.
    if let Err(err) = serialize(&mut out, &SerializableDocument(document), opts) {
        log::error!("html serialization failed: {}", err);
    }
    String::from_utf8_lossy(&out).into_owned()
}

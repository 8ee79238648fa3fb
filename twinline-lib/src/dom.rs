use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub mod dom_tree {
    use super::*;

    /// Shared handle to a node of the tree.
    pub type NodeRef = Rc<RefCell<Node>>;

    #[derive(Debug)]
    pub struct Node {
        pub kind: NodeKind,
        pub parent: Option<Weak<RefCell<Node>>>,
        pub children: Vec<NodeRef>,
    }

    #[derive(Debug, Clone)]
    pub enum NodeKind {
        DocumentRoot,
        Element(ElementData),
        Text(String),
        Comment(String),
    }

    #[derive(Debug, Clone)]
    pub struct ElementData {
        pub tag: String,
        pub qual_name: QualName,
        /// Attributes in source order.
        pub attributes: Vec<Attribute>,
    }

    #[derive(Debug)]
    pub struct Document {
        pub root: NodeRef,
        pub doctype: RefCell<Option<Doctype>>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Doctype {
        pub name: String,
        pub public_id: String,
        pub system_id: String,
    }

    impl Node {
        pub fn new(kind: NodeKind) -> NodeRef {
            Rc::new(RefCell::new(Node {
                kind,
                parent: None,
                children: Vec::new(),
            }))
        }

        pub fn as_element(&self) -> Option<&ElementData> {
            match &self.kind {
                NodeKind::Element(elem) => Some(elem),
                _ => None,
            }
        }

        pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
            match &mut self.kind {
                NodeKind::Element(elem) => Some(elem),
                _ => None,
            }
        }

        pub fn parent(&self) -> Option<NodeRef> {
            self.parent.as_ref().and_then(Weak::upgrade)
        }
    }

    impl ElementData {
        pub fn new(qual_name: QualName, attributes: Vec<Attribute>) -> Self {
            ElementData {
                tag: qual_name.local.to_string(),
                qual_name,
                attributes,
            }
        }

        pub fn attr(&self, name: &str) -> Option<&str> {
            self.attributes
                .iter()
                .find(|attr| has_name(attr, name))
                .map(|attr| &*attr.value)
        }

        /// Replaces the value of `name`, appending the attribute when absent.
        pub fn set_attr(&mut self, name: &str, value: &str) {
            match self
                .attributes
                .iter_mut()
                .find(|attr| has_name(attr, name))
            {
                Some(attr) => attr.value = StrTendril::from_slice(value),
                None => self.attributes.push(Attribute {
                    name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
                    value: StrTendril::from_slice(value),
                }),
            }
        }

        pub fn remove_attr(&mut self, name: &str) {
            self.attributes
                .retain(|attr| !has_name(attr, name));
        }

        pub fn is(&self, tag: &str) -> bool {
            self.tag.eq_ignore_ascii_case(tag)
        }
    }

    fn has_name(attr: &Attribute, name: &str) -> bool {
        let local: &str = &attr.name.local;
        local.eq_ignore_ascii_case(name)
    }

    /// Appends `child` to `parent`, detaching it from any previous parent first.
    /// Adjacent text nodes are merged.
    pub fn append_child(parent: &NodeRef, child: NodeRef) {
        detach(&child);
        let mut parent_node = parent.borrow_mut();
        if let NodeKind::Text(text) = &child.borrow().kind {
            if let Some(last) = parent_node.children.last() {
                if let NodeKind::Text(existing) = &mut last.borrow_mut().kind {
                    existing.push_str(text);
                    return;
                }
            }
        }
        child.borrow_mut().parent = Some(Rc::downgrade(parent));
        parent_node.children.push(child);
    }

    /// Inserts `child` right before `sibling` in the sibling's parent.
    pub fn insert_before(sibling: &NodeRef, child: NodeRef) {
        let Some(parent) = sibling.borrow().parent() else {
            return;
        };
        detach(&child);
        let mut parent_node = parent.borrow_mut();
        let Some(index) = parent_node
            .children
            .iter()
            .position(|node| Rc::ptr_eq(node, sibling))
        else {
            return;
        };

        if let NodeKind::Text(text) = &child.borrow().kind {
            if index > 0 {
                if let NodeKind::Text(existing) =
                    &mut parent_node.children[index - 1].borrow_mut().kind
                {
                    existing.push_str(text);
                    return;
                }
            }
        }
        child.borrow_mut().parent = Some(Rc::downgrade(&parent));
        parent_node.children.insert(index, child);
    }

    /// Removes `node` from its parent's child list.
    pub fn detach(node: &NodeRef) {
        let parent = node.borrow_mut().parent.take().and_then(|weak| weak.upgrade());
        if let Some(parent) = parent {
            parent
                .borrow_mut()
                .children
                .retain(|child| !Rc::ptr_eq(child, node));
        }
    }

    /// Elements below `node` in document order.
    pub fn descendant_elements(node: &NodeRef) -> Vec<NodeRef> {
        let mut out = Vec::new();
        collect_elements(node, &mut out);
        out
    }

    fn collect_elements(node: &NodeRef, out: &mut Vec<NodeRef>) {
        for child in &node.borrow().children {
            if matches!(child.borrow().kind, NodeKind::Element(_)) {
                out.push(Rc::clone(child));
            }
            collect_elements(child, out);
        }
    }

    /// Concatenated text of the direct text children of `node`.
    pub fn text_content(node: &NodeRef) -> String {
        node.borrow()
            .children
            .iter()
            .filter_map(|child| match &child.borrow().kind {
                NodeKind::Text(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    impl Document {
        /// All elements of the document in document order.
        pub fn elements(&self) -> Vec<NodeRef> {
            descendant_elements(&self.root)
        }

        pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeRef> {
            self.elements()
                .into_iter()
                .filter(|node| node.borrow().as_element().is_some_and(|e| e.is(tag)))
                .collect()
        }

        /// Removes every element named `tag` together with its subtree.
        pub fn remove_elements(&self, tag: &str) -> usize {
            let doomed = self.elements_by_tag(tag);
            for node in &doomed {
                detach(node);
            }
            doomed.len()
        }
    }

    pub fn new_document() -> Document {
        Document {
            root: Node::new(NodeKind::DocumentRoot),
            doctype: RefCell::new(None),
        }
    }
}

//! Arena-backed document tree.

use crate::HostDocument;
use crate::NodeId;
use bb_core::BlockError;
use bb_core::BlockResult;

/// What a node in the arena holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element {
        tag_name: String,
        properties: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct ArenaNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory document with DOM-like append semantics.
///
/// Node IDs start at 1 and are never reused. Nodes are created detached; a
/// node only joins the tree when something appends it.
#[derive(Debug, Clone, Default)]
pub struct ArenaDocument {
    nodes: Vec<ArenaNode>,
}

impl ArenaDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).ok().map(|node| &node.kind)
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element { tag_name, .. } => Some(tag_name),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Text(_)))
    }

    pub fn property(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element { properties, .. } => properties
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn properties(&self, id: NodeId) -> &[(String, String)] {
        match self.kind(id) {
            Some(NodeKind::Element { properties, .. }) => properties.as_slice(),
            _ => &[],
        }
    }

    /// Class-list property, the host-side target of the `class` attribute.
    pub fn class_name(&self, id: NodeId) -> Option<&str> {
        self.property(id, "className")
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok()?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Element children only, skipping text nodes.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| !self.is_text(*child))
            .collect()
    }

    /// Concatenated text of the node and all its descendants, in tree order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    /// Compact markup rendering of a subtree, used for diagnostics and tests.
    pub fn outline(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_outline(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Ok(node) = self.node(id) else {
            return;
        };
        if let NodeKind::Text(text) = &node.kind {
            out.push_str(text);
        }
        for child in &node.children {
            self.collect_text(*child, out);
        }
    }

    fn write_outline(&self, id: NodeId, out: &mut String) {
        let Ok(node) = self.node(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(text) => out.push_str(&escape_markup(text)),
            NodeKind::Element {
                tag_name,
                properties,
            } => {
                out.push('<');
                out.push_str(tag_name);
                for (name, value) in properties {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_markup(value));
                    out.push('"');
                }
                out.push('>');
                for child in &node.children {
                    self.write_outline(*child, out);
                }
                out.push_str("</");
                out.push_str(tag_name);
                out.push('>');
            }
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(ArenaNode {
            kind,
            parent: None,
            children: Vec::new(),
        });
        self.nodes.len() as NodeId
    }

    fn index(&self, id: NodeId) -> BlockResult<usize> {
        let index = usize::try_from(id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .filter(|index| *index < self.nodes.len());
        index.ok_or_else(|| {
            BlockError::new(
                "dom.unknown_node",
                format!("node {id} is not part of this document"),
            )
        })
    }

    fn node(&self, id: NodeId) -> BlockResult<&ArenaNode> {
        let index = self.index(id)?;
        Ok(&self.nodes[index])
    }

    fn node_mut(&mut self, id: NodeId) -> BlockResult<&mut ArenaNode> {
        let index = self.index(id)?;
        Ok(&mut self.nodes[index])
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.parent(node) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }
}

impl HostDocument for ArenaDocument {
    type Handle = NodeId;

    fn create_element(&mut self, tag: &str) -> BlockResult<NodeId> {
        let id = self.push(NodeKind::Element {
            tag_name: tag.to_ascii_lowercase(),
            properties: Vec::new(),
        });
        tracing::trace!(id, tag, "created element");
        Ok(id)
    }

    fn create_text_node(&mut self, text: &str) -> BlockResult<NodeId> {
        let id = self.push(NodeKind::Text(text.to_owned()));
        tracing::trace!(id, bytes = text.len(), "created text node");
        Ok(id)
    }

    fn set_property(&mut self, element: &NodeId, name: &str, value: &str) -> BlockResult<()> {
        let element = *element;
        match &mut self.node_mut(element)?.kind {
            NodeKind::Element { properties, .. } => {
                match properties.iter_mut().find(|(key, _)| key == name) {
                    Some((_, slot)) => value.clone_into(slot),
                    None => properties.push((name.to_owned(), value.to_owned())),
                }
                Ok(())
            }
            NodeKind::Text(_) => Err(BlockError::new(
                "dom.not_an_element",
                format!("cannot set property `{name}` on text node {element}"),
            )),
        }
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> BlockResult<()> {
        let (parent, child) = (*parent, *child);
        self.node(child)?;
        if matches!(self.node(parent)?.kind, NodeKind::Text(_)) {
            return Err(BlockError::new(
                "dom.hierarchy_request",
                format!("text node {parent} cannot have children"),
            ));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(BlockError::new(
                "dom.hierarchy_request",
                format!("node {child} is an ancestor of (or equal to) node {parent}"),
            ));
        }

        self.detach(&child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        tracing::trace!(parent, child, "appended child");
        Ok(())
    }

    fn detach(&mut self, node: &NodeId) -> BlockResult<()> {
        let node = *node;
        let Some(parent) = self.node_mut(node)?.parent.take() else {
            return Ok(());
        };
        self.node_mut(parent)?
            .children
            .retain(|candidate| *candidate != node);
        Ok(())
    }
}

fn escape_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

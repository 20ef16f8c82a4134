//! Arena-backed in-memory document.
//!
//! Behaves like the subset of the DOM the engine uses. While observing it
//! records [`Mutation`]s for changes made under the root, the way a
//! `MutationObserver` on `document.body` with `subtree` would.

use crate::host::{is_editable_field, ChangeSource, DocumentTree, FieldHost, Mutation, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Value and selection of an editable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    pub selection: Option<(u32, u32)>,
    pub supports_selection: bool,
    pub listeners: usize,
}

#[derive(Debug, Clone)]
enum NodeData {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        field: Option<FieldState>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeEntry {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<NodeEntry>,
    root: NodeId,
    observing: bool,
    records: Vec<Mutation<NodeId>>,
    text_writes: usize,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// A document holding an empty `body` root.
    pub fn new() -> Self {
        let body = NodeEntry {
            data: NodeData::Element {
                tag: "body".to_string(),
                attributes: Vec::new(),
                field: None,
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![body],
            root: NodeId(0),
            observing: false,
            records: Vec::new(),
            text_writes: 0,
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeEntry {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let tag = tag.to_ascii_lowercase();
        let field = (tag == "textarea" || tag == "input").then(|| FieldState {
            value: String::new(),
            selection: Some((0, 0)),
            supports_selection: true,
            listeners: 0,
        });
        self.push(NodeData::Element {
            tag,
            attributes: Vec::new(),
            field,
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    /// Insert `child` as the last child of `parent`, moving it out of its
    /// current parent first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old) = self.nodes[child.0].parent.take() {
            self.nodes[old.0].children.retain(|&c| c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        if self.observing && self.is_connected(parent) {
            self.records.push(Mutation::ChildList { added: vec![child] });
        }
    }

    pub fn element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.create_element(tag);
        self.append(parent, id);
        id
    }

    pub fn add_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.create_text(text);
        self.append(parent, id);
        id
    }

    pub fn comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.push(NodeData::Comment(text.to_string()));
        self.append(parent, id);
        id
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeData::Element { attributes, .. } = &mut self.nodes[node.0].data {
            match attributes.iter_mut().find(|(n, _)| n == name) {
                Some(entry) => entry.1 = value.to_string(),
                None => attributes.push((name.to_string(), value.to_string())),
            }
        }
    }

    /// Append an `input`, with an optional `type` attribute and initial value.
    pub fn input(&mut self, parent: NodeId, ty: Option<&str>, value: &str) -> NodeId {
        let id = self.create_element("input");
        if let Some(ty) = ty {
            self.set_attribute(id, "type", ty);
        }
        self.set_value(id, value);
        self.append(parent, id);
        id
    }

    pub fn textarea(&mut self, parent: NodeId, value: &str) -> NodeId {
        let id = self.create_element("textarea");
        self.set_value(id, value);
        self.append(parent, id);
        id
    }

    /// Simulate the user typing: replace the value and place the selection.
    pub fn type_into(&mut self, field: NodeId, value: &str, selection: (u32, u32)) {
        if let Some(state) = self.field_mut(field) {
            state.value = value.to_string();
            if state.supports_selection {
                state.selection = Some(selection);
            }
        }
    }

    pub fn disable_selection(&mut self, field: NodeId) {
        if let Some(state) = self.field_mut(field) {
            state.supports_selection = false;
            state.selection = None;
        }
    }

    /// Edit a text node's content the way page script would.
    pub fn edit_text(&mut self, node: NodeId, text: &str) {
        self.write_text(node, text);
    }

    pub fn node_text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Concatenated text of every text node under `node`.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let entry = &self.nodes[current.0];
            if let NodeData::Text(t) = &entry.data {
                out.push_str(t);
            }
            stack.extend(entry.children.iter().rev().copied());
        }
        out
    }

    pub fn field(&self, node: NodeId) -> Option<&FieldState> {
        match &self.nodes[node.0].data {
            NodeData::Element { field, .. } => field.as_ref(),
            _ => None,
        }
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.field(node).map_or(0, |f| f.listeners)
    }

    /// Number of text writes made through [`DocumentTree::set_text`] or
    /// [`edit_text`](Self::edit_text).
    pub fn text_writes(&self) -> usize {
        self.text_writes
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Drain the recorded, undelivered mutations.
    pub fn take_records(&mut self) -> Vec<Mutation<NodeId>> {
        std::mem::take(&mut self.records)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    fn field_mut(&mut self, node: NodeId) -> Option<&mut FieldState> {
        match &mut self.nodes[node.0].data {
            NodeData::Element { field, .. } => field.as_mut(),
            _ => None,
        }
    }

    fn set_value(&mut self, field: NodeId, value: &str) {
        if let Some(state) = self.field_mut(field) {
            state.value = value.to_string();
        }
    }

    fn write_text(&mut self, node: NodeId, text: &str) {
        let NodeData::Text(content) = &mut self.nodes[node.0].data else {
            return;
        };
        *content = text.to_string();
        self.text_writes += 1;
        if self.observing && self.is_connected(node) {
            self.records.push(Mutation::CharacterData { target: node });
        }
    }
}

impl DocumentTree for MemoryDocument {
    type Node = NodeId;

    fn root(&self) -> Option<NodeId> {
        Some(self.root)
    }

    fn kind(&self, node: &NodeId) -> NodeKind {
        match self.nodes[node.0].data {
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment(_) => NodeKind::Other,
        }
    }

    fn tag_name(&self, node: &NodeId) -> Option<String> {
        match &self.nodes[node.0].data {
            NodeData::Element { tag, .. } => Some(tag.clone()),
            _ => None,
        }
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        match &self.nodes[node.0].data {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes[node.0].children.clone()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn text(&self, node: &NodeId) -> Option<String> {
        self.node_text(*node).map(str::to_string)
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        self.write_text(*node, text);
    }
}

impl FieldHost for MemoryDocument {
    fn field_value(&self, field: &NodeId) -> Option<String> {
        if !is_editable_field(self, field) {
            return None;
        }
        self.field(*field).map(|f| f.value.clone())
    }

    fn set_field_value(&mut self, field: &NodeId, value: &str) {
        // Assigning a value programmatically does not fire an input event,
        // and is not a tree mutation.
        self.set_value(*field, value);
    }

    fn selection(&self, field: &NodeId) -> Option<(u32, u32)> {
        self.field(*field)
            .filter(|f| f.supports_selection)
            .and_then(|f| f.selection)
    }

    fn set_selection(&mut self, field: &NodeId, start: u32, end: u32) -> bool {
        match self.field_mut(*field) {
            Some(state) if state.supports_selection => {
                state.selection = Some((start, end));
                true
            }
            _ => false,
        }
    }

    fn attach_input_listener(&mut self, field: &NodeId) {
        if let Some(state) = self.field_mut(*field) {
            state.listeners += 1;
        }
    }

    fn detach_input_listener(&mut self, field: &NodeId) {
        if let Some(state) = self.field_mut(*field) {
            state.listeners = state.listeners.saturating_sub(1);
        }
    }
}

impl ChangeSource for MemoryDocument {
    fn observe(&mut self) {
        self.observing = true;
    }

    fn disconnect(&mut self) {
        self.observing = false;
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_only_while_observing() {
        let mut doc = MemoryDocument::new();
        let root = doc.root_id();
        let p = doc.element(root, "p");
        assert!(doc.take_records().is_empty());

        doc.observe();
        let t = doc.add_text(p, "hi");
        doc.edit_text(t, "hello");
        assert_eq!(
            doc.take_records(),
            vec![
                Mutation::ChildList { added: vec![t] },
                Mutation::CharacterData { target: t },
            ]
        );
    }

    #[test]
    fn test_detached_changes_not_recorded() {
        let mut doc = MemoryDocument::new();
        doc.observe();
        let div = doc.create_element("div");
        doc.add_text(div, "inside");
        assert!(doc.take_records().is_empty());
        doc.append(doc.root_id(), div);
        assert_eq!(doc.take_records().len(), 1);
    }

    #[test]
    fn test_append_moves_node_between_parents() {
        let mut doc = MemoryDocument::new();
        let root = doc.root_id();
        let from = doc.element(root, "div");
        let to = doc.element(root, "section");
        let t = doc.add_text(from, "moved");

        doc.append(to, t);
        assert!(doc.children(&from).is_empty());
        assert_eq!(doc.children(&to), vec![t]);
        assert_eq!(doc.parent(&t), Some(to));
        assert_eq!(doc.text_content(root), "moved");
    }

    #[test]
    fn test_disconnect_discards_pending() {
        let mut doc = MemoryDocument::new();
        doc.observe();
        let root = doc.root_id();
        doc.element(root, "p");
        doc.disconnect();
        assert!(doc.take_records().is_empty());
    }

    #[test]
    fn test_text_content_in_order() {
        let mut doc = MemoryDocument::new();
        let root = doc.root_id();
        let a = doc.element(root, "p");
        doc.add_text(a, "one ");
        doc.comment(a, "skip");
        let b = doc.element(a, "b");
        doc.add_text(b, "two");
        doc.add_text(root, " three");
        assert_eq!(doc.text_content(root), "one two three");
    }

    #[test]
    fn test_field_value_only_for_editable_fields() {
        let mut doc = MemoryDocument::new();
        let root = doc.root_id();
        let text = doc.input(root, Some("TEXT"), "a");
        let password = doc.input(root, Some("password"), "secret");
        assert_eq!(doc.field_value(&text).as_deref(), Some("a"));
        assert_eq!(doc.field_value(&password), None);
    }
}

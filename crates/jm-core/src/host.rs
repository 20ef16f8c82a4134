//! Traits the engine drives a page through.
//!
//! The browser DOM (via web-sys) and [`crate::memory::MemoryDocument`] both
//! implement these, so the engine itself never touches a platform API.

use std::ops::{Deref, DerefMut};

/// Coarse classification of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    /// Comments, processing instructions, doctypes and the like.
    Other,
}

/// Read/write access to a live document tree.
pub trait DocumentTree {
    type Node: Clone + PartialEq;

    /// The node observation and full scans start from (the page body).
    fn root(&self) -> Option<Self::Node>;

    fn kind(&self, node: &Self::Node) -> NodeKind;

    /// Lowercase tag name, for element nodes.
    fn tag_name(&self, node: &Self::Node) -> Option<String>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Content of a text node.
    fn text(&self, node: &Self::Node) -> Option<String>;

    fn set_text(&mut self, node: &Self::Node, text: &str);
}

/// Editable single-line and multi-line text fields.
pub trait FieldHost: DocumentTree {
    fn field_value(&self, field: &Self::Node) -> Option<String>;

    fn set_field_value(&mut self, field: &Self::Node, value: &str);

    /// Current selection as `(start, end)` UTF-16 offsets, if the field
    /// supports selection.
    fn selection(&self, field: &Self::Node) -> Option<(u32, u32)>;

    /// Returns false when the field does not support selection ranges.
    fn set_selection(&mut self, field: &Self::Node, start: u32, end: u32) -> bool;

    fn attach_input_listener(&mut self, field: &Self::Node);

    fn detach_input_listener(&mut self, field: &Self::Node);
}

/// A source of tree change notifications.
pub trait ChangeSource {
    /// Start (or restart) watching the whole tree for insertions and text
    /// edits.
    fn observe(&mut self);

    /// Stop watching. Undelivered notifications are discarded.
    fn disconnect(&mut self);
}

/// Everything the redaction engine needs from a page.
pub trait Page: FieldHost + ChangeSource {}

impl<T: FieldHost + ChangeSource> Page for T {}

/// One observed change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<N> {
    /// Nodes inserted into the tree.
    ChildList { added: Vec<N> },
    /// Direct edit of a text node's content.
    CharacterData { target: N },
}

/// Observation suspended for as long as the guard lives.
///
/// Dropping the guard re-engages observation over the whole tree.
pub struct PausedObservation<'a, P: ChangeSource> {
    page: &'a mut P,
}

impl<'a, P: ChangeSource> PausedObservation<'a, P> {
    pub fn new(page: &'a mut P) -> Self {
        page.disconnect();
        Self { page }
    }
}

impl<P: ChangeSource> Deref for PausedObservation<'_, P> {
    type Target = P;

    fn deref(&self) -> &P {
        self.page
    }
}

impl<P: ChangeSource> DerefMut for PausedObservation<'_, P> {
    fn deref_mut(&mut self) -> &mut P {
        self.page
    }
}

impl<P: ChangeSource> Drop for PausedObservation<'_, P> {
    fn drop(&mut self) {
        self.page.observe();
    }
}

/// `textarea`, or `input` of type `text` or `search` (a missing type is text).
pub fn is_editable_field<T: DocumentTree + ?Sized>(tree: &T, node: &T::Node) -> bool {
    match tree.tag_name(node).as_deref() {
        Some("textarea") => true,
        Some("input") => match tree.attribute(node, "type") {
            None => true,
            Some(ty) => {
                let ty = ty.trim();
                ty.is_empty() || ty.eq_ignore_ascii_case("text") || ty.eq_ignore_ascii_case("search")
            }
        },
        _ => false,
    }
}

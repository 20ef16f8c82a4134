//! web-sys implementation of the host traits.

use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlInputElement, HtmlTextAreaElement, MutationObserver, MutationObserverInit,
    MutationRecord, Node,
};

use jm_core::{ChangeSource, DocumentTree, FieldHost, Mutation, NodeKind};

pub type MutationCallback = Closure<dyn FnMut(js_sys::Array, MutationObserver)>;
pub type InputCallback = Closure<dyn FnMut(Event)>;

/// The live page: `document.body`, one `MutationObserver` and the shared
/// `input` listener attached to editable fields.
pub struct WebPage {
    document: Document,
    observer: MutationObserver,
    input_listener: Function,
    _on_mutations: MutationCallback,
    _on_input: InputCallback,
}

impl WebPage {
    pub fn new(document: Document, on_mutations: MutationCallback, on_input: InputCallback) -> Result<Self, JsValue> {
        let observer = MutationObserver::new(on_mutations.as_ref().unchecked_ref())?;
        let input_listener: Function = on_input.as_ref().unchecked_ref::<Function>().clone();
        Ok(Self {
            document,
            observer,
            input_listener,
            _on_mutations: on_mutations,
            _on_input: on_input,
        })
    }
}

/// Convert a batch of `MutationRecord`s.
pub fn mutations_from_records(records: &js_sys::Array) -> Vec<Mutation<Node>> {
    let mut batch = Vec::with_capacity(records.length() as usize);
    for value in records.iter() {
        let Ok(record) = value.dyn_into::<MutationRecord>() else {
            continue;
        };
        match record.type_().as_str() {
            "childList" => {
                let added = node_list(&record.added_nodes());
                if !added.is_empty() {
                    batch.push(Mutation::ChildList { added });
                }
            }
            "characterData" => {
                if let Some(target) = record.target() {
                    batch.push(Mutation::CharacterData { target });
                }
            }
            _ => {}
        }
    }
    batch
}

fn node_list(list: &web_sys::NodeList) -> Vec<Node> {
    (0..list.length()).filter_map(|i| list.item(i)).collect()
}

impl DocumentTree for WebPage {
    type Node = Node;

    fn root(&self) -> Option<Node> {
        self.document.body().map(Node::from)
    }

    fn kind(&self, node: &Node) -> NodeKind {
        match node.node_type() {
            Node::ELEMENT_NODE => NodeKind::Element,
            Node::TEXT_NODE => NodeKind::Text,
            _ => NodeKind::Other,
        }
    }

    fn tag_name(&self, node: &Node) -> Option<String> {
        node.dyn_ref::<Element>().map(|e| e.tag_name().to_ascii_lowercase())
    }

    fn attribute(&self, node: &Node, name: &str) -> Option<String> {
        node.dyn_ref::<Element>().and_then(|e| e.get_attribute(name))
    }

    fn children(&self, node: &Node) -> Vec<Node> {
        node_list(&node.child_nodes())
    }

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn text(&self, node: &Node) -> Option<String> {
        if node.node_type() != Node::TEXT_NODE {
            return None;
        }
        node.text_content()
    }

    fn set_text(&mut self, node: &Node, text: &str) {
        node.set_text_content(Some(text));
    }
}

impl FieldHost for WebPage {
    fn field_value(&self, field: &Node) -> Option<String> {
        if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
            return Some(input.value());
        }
        field.dyn_ref::<HtmlTextAreaElement>().map(HtmlTextAreaElement::value)
    }

    fn set_field_value(&mut self, field: &Node, value: &str) {
        if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = field.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        }
    }

    fn selection(&self, field: &Node) -> Option<(u32, u32)> {
        // Inputs whose type lacks selection support throw here.
        let (start, end) = if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
            (input.selection_start(), input.selection_end())
        } else if let Some(area) = field.dyn_ref::<HtmlTextAreaElement>() {
            (area.selection_start(), area.selection_end())
        } else {
            return None;
        };
        Some((start.ok()??, end.ok()??))
    }

    fn set_selection(&mut self, field: &Node, start: u32, end: u32) -> bool {
        if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
            return input.set_selection_range(start, end).is_ok();
        }
        if let Some(area) = field.dyn_ref::<HtmlTextAreaElement>() {
            return area.set_selection_range(start, end).is_ok();
        }
        false
    }

    fn attach_input_listener(&mut self, field: &Node) {
        let _ = field.add_event_listener_with_callback("input", &self.input_listener);
    }

    fn detach_input_listener(&mut self, field: &Node) {
        let _ = field.remove_event_listener_with_callback("input", &self.input_listener);
    }
}

impl ChangeSource for WebPage {
    fn observe(&mut self) {
        let Some(body) = self.document.body() else {
            return;
        };
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        init.set_character_data(true);
        let _ = self.observer.observe_with_options(&body, &init);
    }

    fn disconnect(&mut self) {
        self.observer.disconnect();
    }
}

//! Redaction engine: applies the censor across a live, mutating page.
//!
//! The engine owns the enabled state and drives a [`Page`] through the host
//! traits. It has two states:
//!
//! - `Disabled`: nothing is scanned, field listeners are detached, and
//!   already-masked text is left as it is.
//! - `Observing`: the page was fully scanned once, fields carry an input
//!   listener, and every batch of observed changes goes through
//!   [`RedactionEngine::process_mutations`].
//!
//! Each batch runs with observation paused so the engine's own writes never
//! come back as new notifications.

use std::borrow::Cow;

use log::{debug, trace};

use crate::censor::Censor;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::host::{is_editable_field, DocumentTree, FieldHost, Mutation, NodeKind, Page, PausedObservation};
use crate::message::{Ack, ContentMessage};
use crate::state::{resolve_enabled, EngineState};

/// Counts of work done for one batch of changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Text nodes whose content was rewritten.
    pub text_rewrites: usize,
    /// Editable fields that had their listener (re)bound.
    pub fields_bound: usize,
    /// Changes ignored because they sit inside a content-excluded element.
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct RedactionEngine {
    censor: Censor,
    config: EngineConfig,
    state: EngineState,
}

impl RedactionEngine {
    /// The engine starts `Disabled` until [`load`](Self::load) applies the
    /// persisted flag.
    pub fn new(censor: Censor, config: EngineConfig) -> Self {
        Self {
            censor,
            config,
            state: EngineState::Disabled,
        }
    }

    pub fn from_config(config: EngineConfig) -> Result<Self> {
        let censor = Censor::from_config(&config)?;
        Ok(Self::new(censor, config))
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn censor(&self) -> &Censor {
        &self.censor
    }

    /// Censor a string. Returns `text` untouched while disabled.
    pub fn censor_text<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if !self.is_enabled() {
            return Cow::Borrowed(text);
        }
        self.censor.apply(text)
    }

    /// Apply the persisted flag read at page load.
    pub fn load<P: Page>(&mut self, page: &mut P, stored: Option<bool>) -> EngineState {
        let enabled = resolve_enabled(stored);
        debug!("Loaded enabled flag: stored={stored:?}, enabled={enabled}");
        self.set_enabled(page, enabled);
        self.state
    }

    /// Transition to `Observing` or `Disabled`.
    ///
    /// Enabling always performs a full scan, even when already enabled, and
    /// (re)starts observation. Disabling stops observation and detaches field
    /// listeners but never restores masked text.
    pub fn set_enabled<P: Page>(&mut self, page: &mut P, enabled: bool) {
        let previous = self.state;
        self.state = EngineState::from_enabled(enabled);
        debug!("Engine state {previous:?} -> {:?}", self.state);

        if enabled {
            let mut page = PausedObservation::new(page);
            if let Some(root) = page.root() {
                let rewritten = self.scan_and_mask(&mut *page, &root);
                let bound = self.bind_editable_listeners(&mut *page, &root);
                debug!("Initial pass: {rewritten} text nodes rewritten, {bound} fields bound");
            }
        } else {
            page.disconnect();
            if let Some(root) = page.root() {
                let unbound = self.unbind_editable_listeners(page, &root);
                debug!("Detached {unbound} field listeners");
            }
        }
    }

    pub fn handle_message<P: Page>(&mut self, page: &mut P, message: &ContentMessage) -> Ack {
        match *message {
            ContentMessage::ToggleCensoring { enabled } => self.set_enabled(page, enabled),
        }
        Ack::updated()
    }

    /// Depth-first walk from `root`, masking every text node outside
    /// content-excluded elements. Returns the number of nodes rewritten.
    pub fn scan_and_mask<T: DocumentTree + ?Sized>(&self, tree: &mut T, root: &T::Node) -> usize {
        if !self.is_enabled() {
            return 0;
        }

        let mut rewritten = 0;
        let mut stack = vec![root.clone()];
        while let Some(node) = stack.pop() {
            match tree.kind(&node) {
                NodeKind::Text => {
                    if self.mask_text_node(tree, &node) {
                        rewritten += 1;
                    }
                }
                NodeKind::Element => {
                    if self.is_excluded(&*tree, &node) {
                        continue;
                    }
                    let mut children = tree.children(&node);
                    children.reverse();
                    stack.extend(children);
                }
                NodeKind::Other => {}
            }
        }
        rewritten
    }

    /// Attach the input listener to every editable field at or under `node`,
    /// detaching first so no field ends up with two. Returns the number bound.
    pub fn bind_editable_listeners<F: FieldHost + ?Sized>(&self, host: &mut F, node: &F::Node) -> usize {
        let fields = collect_fields(&*host, node);
        for field in &fields {
            host.detach_input_listener(field);
            if self.is_enabled() {
                host.attach_input_listener(field);
            }
        }
        if self.is_enabled() {
            fields.len()
        } else {
            0
        }
    }

    /// Detach the input listener from every editable field at or under `node`.
    pub fn unbind_editable_listeners<F: FieldHost + ?Sized>(&self, host: &mut F, node: &F::Node) -> usize {
        let fields = collect_fields(&*host, node);
        for field in &fields {
            host.detach_input_listener(field);
        }
        fields.len()
    }

    /// React to an edit of `field`: mask its value in place and restore the
    /// selection. Returns whether the value changed.
    pub fn handle_input<F: FieldHost + ?Sized>(&self, host: &mut F, field: &F::Node) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let Some(value) = host.field_value(field) else {
            return false;
        };
        let Cow::Owned(censored) = self.censor.apply(&value) else {
            return false;
        };

        let selection = host.selection(field);
        host.set_field_value(field, &censored);
        if let Some((start, end)) = selection {
            if !host.set_selection(field, start, end) {
                trace!("Field does not support selection ranges, cursor not restored");
            }
        }
        true
    }

    /// Handle one batch of observed changes.
    ///
    /// Observation is paused for the whole batch and re-engaged over the full
    /// tree when it completes. Reads the live enabled state on every call.
    pub fn process_mutations<P: Page>(&self, page: &mut P, batch: Vec<Mutation<P::Node>>) -> BatchReport {
        let mut report = BatchReport::default();
        if !self.is_enabled() {
            return report;
        }

        let mut page = PausedObservation::new(page);
        for mutation in batch {
            match mutation {
                Mutation::ChildList { added } => {
                    for node in added {
                        if self.has_excluded_ancestor(&*page, &node) {
                            report.skipped += 1;
                            continue;
                        }
                        report.text_rewrites += self.scan_and_mask(&mut *page, &node);
                        if page.kind(&node) == NodeKind::Element {
                            report.fields_bound += self.bind_editable_listeners(&mut *page, &node);
                        }
                    }
                }
                Mutation::CharacterData { target } => {
                    if page.kind(&target) != NodeKind::Text {
                        continue;
                    }
                    if self.has_excluded_ancestor(&*page, &target) {
                        report.skipped += 1;
                        continue;
                    }
                    if self.mask_text_node(&mut *page, &target) {
                        report.text_rewrites += 1;
                    }
                }
            }
        }

        trace!(
            "Batch done: {} rewrites, {} fields bound, {} skipped",
            report.text_rewrites,
            report.fields_bound,
            report.skipped
        );
        report
    }

    /// Mask a single text node, writing only if its content changed.
    fn mask_text_node<T: DocumentTree + ?Sized>(&self, tree: &mut T, node: &T::Node) -> bool {
        let Some(text) = tree.text(node) else {
            return false;
        };
        if text.trim().is_empty() {
            return false;
        }
        match self.censor.apply(&text) {
            Cow::Owned(censored) => {
                tree.set_text(node, &censored);
                true
            }
            Cow::Borrowed(_) => false,
        }
    }

    fn is_excluded<T: DocumentTree + ?Sized>(&self, tree: &T, node: &T::Node) -> bool {
        tree.tag_name(node)
            .is_some_and(|tag| self.config.is_excluded_tag(&tag))
    }

    fn has_excluded_ancestor<T: DocumentTree + ?Sized>(&self, tree: &T, node: &T::Node) -> bool {
        let mut current = tree.parent(node);
        while let Some(parent) = current {
            if self.is_excluded(tree, &parent) {
                return true;
            }
            current = tree.parent(&parent);
        }
        false
    }
}

/// Editable fields at or under `node`, in document order.
fn collect_fields<T: DocumentTree + ?Sized>(tree: &T, node: &T::Node) -> Vec<T::Node> {
    let mut fields = Vec::new();
    let mut stack = vec![node.clone()];
    while let Some(current) = stack.pop() {
        if tree.kind(&current) != NodeKind::Element {
            continue;
        }
        if is_editable_field(tree, &current) {
            fields.push(current);
            continue;
        }
        let mut children = tree.children(&current);
        children.reverse();
        stack.extend(children);
    }
    fields
}

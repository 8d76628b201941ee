use super::{Document, NodeId, ScrollBehavior};
use crate::config::Selectors;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, PoisonError, RwLock};
use tokio::sync::watch;

/// An element of a [`MemoryDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub parent: Option<NodeId>,
    pub classes: BTreeSet<String>,
    pub data: BTreeMap<String, String>,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// A document held in memory.
///
/// Every write bumps a revision counter that observers can watch to know when
/// to re-render.
pub struct MemoryDocument {
    elements: RwLock<Vec<Element>>,
    scrolls: Mutex<Vec<ScrollBehavior>>,
    revision: watch::Sender<u64>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            elements: RwLock::new(Vec::new()),
            scrolls: Mutex::new(Vec::new()),
            revision,
        }
    }

    /// Build the site skeleton: a navigation bar with one link per route, the
    /// transition cover, and an app container holding the hero, two home
    /// strips and one section per route. Only the `home` section starts visible.
    pub fn scaffold<S: AsRef<str>>(selectors: &Selectors, home: &str, routes: &[S]) -> Self {
        let document = Self::new();

        let nav = document.append(None, Element::new("nav").class("topbar"));
        for route in routes {
            let route = route.as_ref();
            document.append(
                Some(nav),
                Element::new("a")
                    .class(&selectors.nav_link_class)
                    .data(&selectors.route_data_key, route)
                    .text(route),
            );
        }

        document.append(None, Element::new("div").id(&selectors.cover_id));

        let app = document.append(None, Element::new("main").id(&selectors.app_container_id));
        document.append(Some(app), Element::new("section").class(&selectors.hero_class));
        for _ in 0..2 {
            document.append(
                Some(app),
                Element::new("section").class(&selectors.home_strip_class),
            );
        }
        for route in routes {
            let route = route.as_ref();
            let mut section = Element::new("section").data(&selectors.view_data_key, route);
            if route != home {
                section = section.class(&selectors.hidden_class);
            }
            document.append(Some(app), section);
        }

        document
    }

    /// Insert `element` as the last child of `parent` (or at the top level).
    pub fn append(&self, parent: Option<NodeId>, mut element: Element) -> NodeId {
        element.parent = parent;
        let node = {
            let mut elements = self.write();
            elements.push(element);
            NodeId::new(elements.len() - 1)
        };
        self.bump();
        node
    }

    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.read().get(node.index()).cloned()
    }

    /// Every element, in document order.
    pub fn snapshot(&self) -> Vec<Element> {
        self.read().clone()
    }

    /// Children of `parent` (or top-level elements), in document order.
    pub fn children(&self, parent: Option<NodeId>) -> Vec<NodeId> {
        self.read()
            .iter()
            .enumerate()
            .filter(|(_, element)| element.parent == parent)
            .map(|(index, _)| NodeId::new(index))
            .collect()
    }

    pub fn set_text(&self, node: NodeId, text: impl Into<String>) {
        self.modify(node, |element| {
            element.text = text.into();
            true
        });
    }

    /// Scroll requests received so far.
    pub fn scroll_requests(&self) -> Vec<ScrollBehavior> {
        self.scrolls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Watch the revision counter.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Element>> {
        self.elements.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Element>> {
        self.elements.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    fn modify(&self, node: NodeId, f: impl FnOnce(&mut Element) -> bool) {
        let changed = self.write().get_mut(node.index()).is_some_and(f);
        if changed {
            self.bump();
        }
    }

    fn is_descendant(elements: &[Element], node: usize, scope: NodeId) -> bool {
        let mut parent = elements[node].parent;
        while let Some(ancestor) = parent {
            if ancestor == scope {
                return true;
            }
            parent = elements.get(ancestor.index()).and_then(|e| e.parent);
        }
        false
    }

    fn query(&self, scope: Option<NodeId>, predicate: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        let elements = self.read();
        (0..elements.len())
            .filter(|&index| predicate(&elements[index]))
            .filter(|&index| {
                scope.is_none_or(|scope| Self::is_descendant(&elements, index, scope))
            })
            .map(NodeId::new)
            .collect()
    }
}

impl Document for MemoryDocument {
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.read()
            .iter()
            .position(|element| element.id.as_deref() == Some(id))
            .map(NodeId::new)
    }

    fn elements_with_class(&self, scope: Option<NodeId>, class: &str) -> Vec<NodeId> {
        self.query(scope, |element| element.has_class(class))
    }

    fn elements_with_data(&self, scope: Option<NodeId>, key: &str) -> Vec<NodeId> {
        self.query(scope, |element| element.data.contains_key(key))
    }

    fn data(&self, node: NodeId, key: &str) -> Option<String> {
        self.read()
            .get(node.index())
            .and_then(|element| element.data.get(key).cloned())
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.read()
            .get(node.index())
            .is_some_and(|element| element.has_class(class))
    }

    fn toggle_class(&self, node: NodeId, class: &str, on: bool) {
        self.modify(node, |element| {
            if on {
                element.classes.insert(class.to_string())
            } else {
                element.classes.remove(class)
            }
        });
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.read()
            .get(node.index())
            .and_then(|element| element.attributes.get(name).cloned())
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        self.modify(node, |element| {
            element.attributes.insert(name.to_string(), value.to_string()).as_deref() != Some(value)
        });
    }

    fn remove_attribute(&self, node: NodeId, name: &str) {
        self.modify(node, |element| element.attributes.remove(name).is_some());
    }

    fn scroll_to_top(&self, behavior: ScrollBehavior) {
        self.scrolls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(behavior);
        self.bump();
    }
}

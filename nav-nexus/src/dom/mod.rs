//! Document access.
//!
//! The router never touches a concrete DOM. It talks to a [`Document`], which a
//! host implements over whatever it renders to. [`MemoryDocument`] is the
//! in-process implementation used by the preview shell and the tests.

pub mod memory;
pub mod surface;

pub use memory::{Element, MemoryDocument};
pub use surface::{NavLink, Surface};

/// Handle to an element of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

/// The subset of DOM operations the router needs.
///
/// Queries return elements in document order. A `scope` restricts a query to
/// descendants of that element; `None` searches the whole document. Writes to
/// unknown nodes are ignored.
pub trait Document: Send + Sync {
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    fn elements_with_class(&self, scope: Option<NodeId>, class: &str) -> Vec<NodeId>;

    /// Elements carrying the data attribute `key` (`data-<key>`).
    fn elements_with_data(&self, scope: Option<NodeId>, key: &str) -> Vec<NodeId>;

    fn data(&self, node: NodeId, key: &str) -> Option<String>;

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Add `class` when `on`, remove it otherwise.
    fn toggle_class(&self, node: NodeId, class: &str, on: bool);

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&self, node: NodeId, name: &str, value: &str);

    fn remove_attribute(&self, node: NodeId, name: &str);

    fn scroll_to_top(&self, behavior: ScrollBehavior);
}

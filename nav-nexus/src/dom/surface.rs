use super::{Document, NodeId};
use crate::config::Selectors;
use crate::route::RouteName;

/// A navigation link and the route it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub node: NodeId,
    pub route: RouteName,
}

/// Site-level operations over a [`Document`]: the cover, the view sections,
/// the home hero and strips, and the navigation links.
pub struct Surface<'a> {
    document: &'a dyn Document,
    selectors: &'a Selectors,
}

impl<'a> Surface<'a> {
    pub fn new(document: &'a dyn Document, selectors: &'a Selectors) -> Self {
        Self { document, selectors }
    }

    pub fn cover(&self) -> Option<NodeId> {
        self.document.element_by_id(&self.selectors.cover_id)
    }

    /// Raise or drop the transition cover. Returns `false` when the page has
    /// no cover.
    pub fn set_cover_active(&self, active: bool) -> bool {
        match self.cover() {
            Some(cover) => {
                self.document
                    .toggle_class(cover, &self.selectors.cover_active_class, active);
                true
            }
            None => false,
        }
    }

    pub fn is_cover_active(&self) -> bool {
        self.cover()
            .is_some_and(|cover| self.document.has_class(cover, &self.selectors.cover_active_class))
    }

    fn container(&self) -> Option<NodeId> {
        self.document.element_by_id(&self.selectors.app_container_id)
    }

    fn home_decorations(&self) -> Vec<NodeId> {
        let mut nodes = self.document.elements_with_class(None, &self.selectors.hero_class);
        nodes.extend(
            self.document
                .elements_with_class(None, &self.selectors.home_strip_class),
        );
        nodes
    }

    /// Show the section tagged `route` and hide every other one. The hero and
    /// home strips follow `is_home`.
    pub fn show_view(&self, route: &RouteName, is_home: bool) {
        let hidden = &self.selectors.hidden_class;
        for node in self.home_decorations() {
            self.document.toggle_class(node, hidden, !is_home);
        }

        let key = &self.selectors.view_data_key;
        for node in self.document.elements_with_data(self.container(), key) {
            let matches = self.document.data(node, key).as_deref() == Some(route.as_str());
            self.document.toggle_class(node, hidden, !matches);
        }
    }

    /// Force the hero and home strips visible.
    pub fn reveal_home(&self) {
        for node in self.home_decorations() {
            self.document
                .toggle_class(node, &self.selectors.hidden_class, false);
        }
    }

    pub fn nav_links(&self) -> Vec<NavLink> {
        self.document
            .elements_with_class(None, &self.selectors.nav_link_class)
            .into_iter()
            .filter_map(|node| {
                self.link_route(node)
                    .map(|route| NavLink { node, route })
            })
            .collect()
    }

    /// The route a navigation link points at.
    pub fn link_route(&self, node: NodeId) -> Option<RouteName> {
        self.document
            .data(node, &self.selectors.route_data_key)
            .map(RouteName::new)
    }

    /// Mark the link for `route` as the current page and unmark the rest.
    pub fn mark_current(&self, route: &RouteName) {
        let attribute = &self.selectors.current_attribute;
        for link in self.nav_links() {
            if &link.route == route {
                self.document
                    .set_attribute(link.node, attribute, &self.selectors.current_value);
            } else {
                self.document.remove_attribute(link.node, attribute);
            }
        }
    }

    /// Routes of the links currently marked as the current page.
    pub fn current_links(&self) -> Vec<RouteName> {
        let attribute = &self.selectors.current_attribute;
        self.nav_links()
            .into_iter()
            .filter(|link| {
                self.document.attribute(link.node, attribute).as_deref()
                    == Some(self.selectors.current_value.as_str())
            })
            .map(|link| link.route)
            .collect()
    }

    /// Routes of the sections that are not hidden.
    pub fn visible_views(&self) -> Vec<RouteName> {
        let key = &self.selectors.view_data_key;
        self.document
            .elements_with_data(self.container(), key)
            .into_iter()
            .filter(|&node| !self.document.has_class(node, &self.selectors.hidden_class))
            .filter_map(|node| self.document.data(node, key).map(RouteName::new))
            .collect()
    }

    /// Whether the hero and every home strip are visible.
    pub fn home_revealed(&self) -> bool {
        self.home_decorations()
            .into_iter()
            .all(|node| !self.document.has_class(node, &self.selectors.hidden_class))
    }

    /// Whether the hero and every home strip are hidden.
    pub fn home_hidden(&self) -> bool {
        self.home_decorations()
            .into_iter()
            .all(|node| self.document.has_class(node, &self.selectors.hidden_class))
    }
}

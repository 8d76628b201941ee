//! Lifecycle bootstrapper.
//!
//! Connects a [`Navigator`] to its host: fragment changes trigger a
//! navigation, navigation link clicks rewrite the fragment, and the first
//! navigation runs once startup has yielded.

use super::engine::Navigator;
use crate::dom::{NodeId, ScrollBehavior};
use crate::route::RouteName;
use crate::task::TaskTracker;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// What a click on an element did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The element is not a bound navigation link; default behaviour applies.
    Ignored,
    /// The link points at the active route; the page scrolled to the top.
    ScrolledToTop,
    /// The fragment was rewritten to the link's route.
    HashChanged(RouteName),
}

impl ClickOutcome {
    /// Whether the host should suppress the element's default action.
    pub fn prevents_default(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

pub struct Bootstrapper {
    navigator: Arc<Navigator>,
    started: AtomicBool,
    links: Mutex<Vec<(NodeId, RouteName)>>,
    tasks: Mutex<TaskTracker>,
}

impl Bootstrapper {
    pub fn new(navigator: Arc<Navigator>) -> Self {
        Self {
            navigator,
            started: AtomicBool::new(false),
            links: Mutex::new(Vec::new()),
            tasks: Mutex::new(TaskTracker::new()),
        }
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Start routing. Must be called from within a tokio runtime. Calls after
    /// the first are no-ops and return `false`.
    pub fn start(&self) -> bool {
        if self.started.swap(true, Ordering::SeqCst) {
            return false;
        }

        let links: Vec<_> = self
            .navigator
            .surface()
            .nav_links()
            .into_iter()
            .map(|link| (link.node, link.route))
            .collect();
        tracing::debug!(links = links.len(), "binding navigation links");
        *self.links.lock().unwrap_or_else(PoisonError::into_inner) = links;

        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);

        // Subscribe before the first navigation so no change is missed.
        let mut changes = self.navigator.location().subscribe();
        let navigator = Arc::clone(&self.navigator);
        tasks.spawn("hashchange", async move {
            while changes.changed().await.is_ok() {
                let navigator = Arc::clone(&navigator);
                tokio::spawn(async move {
                    navigator.navigate(None).await;
                });
            }
        });

        let navigator = Arc::clone(&self.navigator);
        tasks.spawn("initial-navigation", async move {
            tokio::task::yield_now().await;
            navigator.navigate(None).await;
        });

        let navigator = Arc::clone(&self.navigator);
        tasks.spawn("startup-check", async move {
            tokio::time::sleep(navigator.config().safety_check_delay).await;
            if navigator.active_route() == navigator.home() {
                let surface = navigator.surface();
                if surface.is_cover_active() || !surface.home_revealed() {
                    tracing::debug!("startup check: forcing home page visible");
                }
                surface.set_cover_active(false);
                surface.reveal_home();
            }
        });

        tracing::info!(route = %self.navigator.active_route(), "router started");
        true
    }

    /// Handle a click on `node`.
    pub fn click(&self, node: NodeId) -> ClickOutcome {
        let route = self
            .links
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(bound, _)| *bound == node)
            .map(|(_, route)| route.clone());
        let Some(route) = route else {
            return ClickOutcome::Ignored;
        };

        if self.navigator.active_route() == route {
            self.navigator.document().scroll_to_top(ScrollBehavior::Smooth);
            ClickOutcome::ScrolledToTop
        } else {
            self.navigator.location().set_hash(route.to_fragment());
            ClickOutcome::HashChanged(route)
        }
    }

    /// Cancel the listeners. Navigations already running finish on their own.
    pub fn stop(&self) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .abort_all();
    }
}

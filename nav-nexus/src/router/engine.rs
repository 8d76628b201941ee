//! Navigation engine.
//!
//! A navigation moves through [`NavPhase::TransitioningOut`],
//! [`NavPhase::Loading`] and [`NavPhase::Mounting`] and always ends back in
//! [`NavPhase::Idle`]. Load, contract and mount failures are recovered inside
//! [`Navigator::navigate`]; they never reach the caller.

use crate::config::{OverlapPolicy, RouterConfig};
use crate::dom::{Document, Surface};
use crate::error::{
    Error, HomeRouteMismatchSnafu, LoadFailedSnafu, MissingMountSnafu, MountFailedSnafu, Result,
    UnmountFailedSnafu,
};
use crate::location::Location;
use crate::registry::ViewRegistry;
use crate::route::RouteName;
use crate::view::{Lifecycle, ViewModule};
use snafu::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Where the engine is in a navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavPhase {
    #[default]
    Idle,
    TransitioningOut,
    Loading,
    Mounting,
}

/// How a navigation ended.
#[derive(Debug)]
pub enum NavigationOutcome {
    /// The target view mounted and is now the current view.
    Mounted(RouteName),
    /// A step failed; the page was left in its fallback state.
    Recovered { route: RouteName, error: Error },
    /// A newer navigation took over before this one finished.
    Superseded(RouteName),
}

impl NavigationOutcome {
    pub fn route(&self) -> &RouteName {
        match self {
            Self::Mounted(route) | Self::Superseded(route) => route,
            Self::Recovered { route, .. } => route,
        }
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self, Self::Mounted(_))
    }
}

enum Progress {
    Mounted,
    Superseded,
}

/// The view that is currently mounted.
#[derive(Clone)]
struct CurrentView {
    route: RouteName,
    module: Arc<ViewModule>,
}

/// Owns the current view and performs navigations.
pub struct Navigator {
    registry: Arc<ViewRegistry>,
    document: Arc<dyn Document>,
    location: Arc<Location>,
    config: RouterConfig,
    current: Mutex<Option<CurrentView>>,
    phase: watch::Sender<NavPhase>,
    sequence: AtomicU64,
}

impl Navigator {
    /// Fails when the registry's fallback route is not the configured home
    /// route.
    pub fn new(
        registry: Arc<ViewRegistry>,
        document: Arc<dyn Document>,
        location: Arc<Location>,
        config: RouterConfig,
    ) -> Result<Self> {
        ensure!(
            registry.home().as_str() == config.home_route,
            HomeRouteMismatchSnafu {
                registry: registry.home().as_str(),
                config: config.home_route.as_str(),
            }
        );
        let (phase, _) = watch::channel(NavPhase::Idle);
        Ok(Self {
            registry,
            document,
            location,
            config,
            current: Mutex::new(None),
            phase,
            sequence: AtomicU64::new(0),
        })
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn location(&self) -> &Arc<Location> {
        &self.location
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn surface(&self) -> Surface<'_> {
        Surface::new(self.document.as_ref(), &self.config.selectors)
    }

    pub fn home(&self) -> &str {
        &self.config.home_route
    }

    pub fn document(&self) -> &Arc<dyn Document> {
        &self.document
    }

    /// The route the location fragment leads to, with unregistered names
    /// replaced by home.
    pub fn active_route(&self) -> RouteName {
        self.registry.canonical(&self.location.route(self.home()))
    }

    /// The route of the last successfully mounted view.
    pub fn current_route(&self) -> Option<RouteName> {
        self.current
            .lock()
            .ok()
            .and_then(|current| current.as_ref().map(|view| view.route.clone()))
    }

    pub fn phase(&self) -> NavPhase {
        *self.phase.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<NavPhase> {
        self.phase.subscribe()
    }

    /// Navigate to `target`, or to the route in the location fragment when
    /// `target` is `None`. Unregistered routes are treated as home.
    pub async fn navigate(&self, target: Option<&str>) -> NavigationOutcome {
        let requested = match target {
            Some(target) => RouteName::new(target),
            None => self.location.route(self.home()),
        };
        // Unregistered names fall back to the registry's home, which `new`
        // guarantees is the configured one.
        let route = self.registry.canonical(&requested);
        if route != requested {
            tracing::debug!(requested = %requested, fallback = %route, "unknown route, using home");
        }

        let ticket = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let surface = self.surface();

        let outcome = match self.run(&route, ticket, &surface).await {
            Ok(Progress::Mounted) => {
                tracing::info!(route = %route, "navigation complete");
                NavigationOutcome::Mounted(route)
            }
            Ok(Progress::Superseded) => {
                tracing::debug!(route = %route, "navigation superseded");
                self.set_phase(NavPhase::Idle);
                return NavigationOutcome::Superseded(route);
            }
            Err(error) => {
                tracing::warn!(route = %route, %error, "navigation failed, recovering");
                if self.is_home(&route) {
                    surface.reveal_home();
                }
                surface.mark_current(&route);
                NavigationOutcome::Recovered { route, error }
            }
        };

        if surface.cover().is_some() {
            tokio::time::sleep(self.config.frame_delay).await;
            surface.set_cover_active(false);
        }
        self.set_phase(NavPhase::Idle);
        outcome
    }

    async fn run(&self, route: &RouteName, ticket: u64, surface: &Surface<'_>) -> Result<Progress> {
        self.set_phase(NavPhase::TransitioningOut);
        if surface.set_cover_active(true) {
            tokio::time::sleep(self.config.transition_delay).await;
        }
        if self.is_superseded(ticket) {
            return Ok(Progress::Superseded);
        }

        self.set_phase(NavPhase::Loading);
        let module = match self.registry.resolve(route.as_str()).load().await {
            Ok(module) => module,
            Err(error) => return LoadFailedSnafu { route: route.as_str(), error }.fail(),
        };
        let mount = module
            .resolve(Lifecycle::Mount)
            .context(MissingMountSnafu { route: route.as_str() })?;
        if self.is_superseded(ticket) {
            return Ok(Progress::Superseded);
        }

        self.unmount_previous().await?;
        if self.is_superseded(ticket) {
            return Ok(Progress::Superseded);
        }

        surface.show_view(route, self.is_home(route));
        surface.mark_current(route);

        self.set_phase(NavPhase::Mounting);
        if let Err(error) = mount().await {
            return MountFailedSnafu { route: route.as_str(), error }.fail();
        }

        if self.is_superseded(ticket) {
            // A newer navigation already owns the page; do not leave this
            // view mounted behind it.
            Self::unmount(route, &module).await;
            return Ok(Progress::Superseded);
        }

        let mut current = self.current.lock().map_err(|_| Error::LockPoisoned)?;
        *current = Some(CurrentView {
            route: route.clone(),
            module,
        });
        Ok(Progress::Mounted)
    }

    /// Unmount the current view, if any. Its failures are logged and dropped.
    ///
    /// Unguarded navigations only borrow the handle, so overlapping ones may
    /// unmount the same view twice. Under `LatestWins` the handle is taken
    /// and each view is unmounted at most once.
    async fn unmount_previous(&self) -> Result<()> {
        let previous = {
            let mut current = self.current.lock().map_err(|_| Error::LockPoisoned)?;
            let view = match self.config.overlap {
                OverlapPolicy::LatestWins => current.take(),
                OverlapPolicy::Unguarded => current.as_ref().cloned(),
            };
            view.map(|view| (view.route, view.module))
        };
        if let Some((route, module)) = previous {
            Self::unmount(&route, &module).await;
        }
        Ok(())
    }

    async fn unmount(route: &RouteName, module: &ViewModule) {
        let Some(unmount) = module.resolve(Lifecycle::Unmount) else {
            return;
        };
        if let Err(error) = unmount().await {
            let error = UnmountFailedSnafu { route: route.as_str(), error }.build();
            tracing::warn!(%error, "ignoring unmount failure");
        }
    }

    fn is_home(&self, route: &RouteName) -> bool {
        route.as_str() == self.home()
    }

    fn is_superseded(&self, ticket: u64) -> bool {
        self.config.overlap == OverlapPolicy::LatestWins
            && self.sequence.load(Ordering::SeqCst) != ticket
    }

    fn set_phase(&self, phase: NavPhase) {
        self.phase.send_if_modified(|current| {
            let changed = *current != phase;
            if changed {
                tracing::debug!(from = ?*current, to = ?phase, "navigation phase");
            }
            *current = phase;
            changed
        });
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("current", &self.current_route())
            .field("phase", &self.phase())
            .field("overlap", &self.config.overlap)
            .finish()
    }
}

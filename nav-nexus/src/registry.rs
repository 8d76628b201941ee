//! View registry.
//!
//! Maps route names to lazy loaders. A loader runs its load function the first
//! time it is asked for a module and keeps the result, so later navigations to
//! the same route reuse the module and only call `mount()` again.

use crate::error::{DuplicateRouteSnafu, MissingHomeRouteSnafu, Result};
use crate::route::{HOME, RouteName};
use crate::view::{View, ViewModule};
use snafu::prelude::*;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::OnceCell;

/// Future returned by a load function.
pub type LoadFuture = Pin<Box<dyn Future<Output = anyhow::Result<ViewModule>> + Send + 'static>>;

type LoadFn = dyn Fn() -> LoadFuture + Send + Sync;

/// A lazily loaded, cached view module.
pub struct Loader {
    route: RouteName,
    load: Box<LoadFn>,
    module: OnceCell<Arc<ViewModule>>,
    attempts: AtomicUsize,
}

impl Loader {
    fn new<F, Fut>(route: RouteName, load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<ViewModule>> + Send + 'static,
    {
        Self {
            route,
            load: Box::new(move || Box::pin(load()) as LoadFuture),
            module: OnceCell::new(),
            attempts: AtomicUsize::new(0),
        }
    }

    /// The route this loader was registered under.
    pub fn route(&self) -> &RouteName {
        &self.route
    }

    /// Load the module, running the load function only if no earlier attempt
    /// succeeded. Failed loads are not cached.
    pub async fn load(&self) -> anyhow::Result<Arc<ViewModule>> {
        let module = self
            .module
            .get_or_try_init(|| async {
                self.attempts.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(route = %self.route, "loading view module");
                (self.load)().await.map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(module))
    }

    pub fn is_loaded(&self) -> bool {
        self.module.initialized()
    }

    /// How many times the load function has run.
    pub fn load_attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("route", &self.route)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Immutable route table with a guaranteed home entry.
#[derive(Debug)]
pub struct ViewRegistry {
    home: Loader,
    loaders: HashMap<RouteName, Loader>,
}

impl ViewRegistry {
    pub fn builder() -> ViewRegistryBuilder {
        ViewRegistryBuilder::new()
    }

    /// The loader for `route`, or the home loader when `route` is unknown.
    pub fn resolve(&self, route: &str) -> &Loader {
        self.loaders.get(route).unwrap_or(&self.home)
    }

    /// `route` itself when registered, otherwise the home route.
    pub fn canonical(&self, route: &RouteName) -> RouteName {
        self.resolve(route.as_str()).route().clone()
    }

    pub fn contains(&self, route: &str) -> bool {
        self.home.route() == route || self.loaders.contains_key(route)
    }

    pub fn home(&self) -> &RouteName {
        self.home.route()
    }

    /// Registered route names, sorted.
    pub fn routes(&self) -> Vec<RouteName> {
        let mut routes: Vec<_> = self.loaders.keys().cloned().collect();
        routes.push(self.home.route().clone());
        routes.sort();
        routes
    }
}

/// Collects loaders before freezing them into a [`ViewRegistry`].
pub struct ViewRegistryBuilder {
    home: RouteName,
    loaders: Vec<Loader>,
}

impl ViewRegistryBuilder {
    fn new() -> Self {
        Self {
            home: RouteName::new(HOME),
            loaders: Vec::new(),
        }
    }

    /// Use a different fallback route.
    pub fn home(mut self, route: impl AsRef<str>) -> Self {
        self.home = RouteName::new(route);
        self
    }

    /// Register a lazy loader.
    pub fn route<F, Fut>(mut self, route: impl AsRef<str>, load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<ViewModule>> + Send + 'static,
    {
        self.loaders.push(Loader::new(RouteName::new(route), load));
        self
    }

    /// Register an already constructed module.
    pub fn module(self, route: impl AsRef<str>, module: ViewModule) -> Self {
        self.route(route, move || {
            let module = module.clone();
            async move { Ok::<_, anyhow::Error>(module) }
        })
    }

    /// Register a [`View`] value.
    pub fn view<V: View>(self, route: impl AsRef<str>, view: Arc<V>) -> Self {
        self.module(route, ViewModule::from_view(view))
    }

    pub fn build(self) -> Result<ViewRegistry> {
        let mut loaders = HashMap::with_capacity(self.loaders.len());
        for loader in self.loaders {
            ensure!(
                !loaders.contains_key(loader.route()),
                DuplicateRouteSnafu { route: loader.route().as_str() }
            );
            loaders.insert(loader.route().clone(), loader);
        }
        let home = loaders
            .remove(&self.home)
            .context(MissingHomeRouteSnafu { home: self.home.as_str() })?;
        Ok(ViewRegistry { home, loaders })
    }
}

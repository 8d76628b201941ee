use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by a lifecycle hook.
pub type HookFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

/// A lifecycle hook: an async function the router can call any number of times.
pub type Hook = Arc<dyn Fn() -> HookFuture + Send + Sync>;

/// Wrap an async closure as a [`Hook`].
pub fn hook<F, Fut>(f: F) -> Hook
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()) as HookFuture)
}

/// The lifecycle steps a view can take part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Mount,
    Unmount,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Mount => f.write_str("mount"),
            Lifecycle::Unmount => f.write_str("unmount"),
        }
    }
}

/// The default export of a view module.
#[derive(Clone)]
pub enum DefaultExport {
    /// A bare function, treated as `mount`.
    Callable(Hook),
    /// An object carrying its own hooks.
    Object {
        mount: Option<Hook>,
        unmount: Option<Hook>,
    },
}

/// A loaded view module.
///
/// A module may expose its hooks as named exports, as a callable default
/// export, or as hooks on a default export object. [`ViewModule::resolve`]
/// looks them up in that order.
#[derive(Clone, Default)]
pub struct ViewModule {
    mount: Option<Hook>,
    unmount: Option<Hook>,
    default: Option<DefaultExport>,
}

impl ViewModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the named `mount` export.
    pub fn with_mount(mut self, mount: Hook) -> Self {
        self.mount = Some(mount);
        self
    }

    /// Set the named `unmount` export.
    pub fn with_unmount(mut self, unmount: Hook) -> Self {
        self.unmount = Some(unmount);
        self
    }

    /// Set the default export.
    pub fn with_default(mut self, default: DefaultExport) -> Self {
        self.default = Some(default);
        self
    }

    /// Expose a [`View`] through named `mount`/`unmount` exports.
    pub fn from_view<V: View>(view: Arc<V>) -> Self {
        let mounted = Arc::clone(&view);
        let unmounted = view;
        Self::new()
            .with_mount(hook(move || {
                let view = Arc::clone(&mounted);
                async move { view.mount().await }
            }))
            .with_unmount(hook(move || {
                let view = Arc::clone(&unmounted);
                async move { view.unmount().await }
            }))
    }

    /// Find the hook for `lifecycle`.
    ///
    /// Named exports win. A callable default export only ever counts as
    /// `mount`; a default export object is searched for either hook.
    pub fn resolve(&self, lifecycle: Lifecycle) -> Option<Hook> {
        let named = match lifecycle {
            Lifecycle::Mount => &self.mount,
            Lifecycle::Unmount => &self.unmount,
        };
        if let Some(hook) = named {
            return Some(Arc::clone(hook));
        }

        match (&self.default, lifecycle) {
            (Some(DefaultExport::Callable(hook)), Lifecycle::Mount) => Some(Arc::clone(hook)),
            (Some(DefaultExport::Object { mount, .. }), Lifecycle::Mount) => mount.clone(),
            (Some(DefaultExport::Object { unmount, .. }), Lifecycle::Unmount) => unmount.clone(),
            _ => None,
        }
    }
}

impl fmt::Debug for ViewModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModule")
            .field("mount", &self.resolve(Lifecycle::Mount).is_some())
            .field("unmount", &self.resolve(Lifecycle::Unmount).is_some())
            .finish()
    }
}

/// A view implemented as a Rust type.
pub trait View: Send + Sync + 'static {
    /// Render the view; resolves once it is ready for display.
    fn mount(&self) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Tear the view down before another one replaces it.
    fn unmount(&self) -> impl Future<Output = anyhow::Result<()>> + Send {
        async { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>) -> Hook {
        let counter = Arc::clone(counter);
        hook(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
    }

    #[tokio::test]
    async fn test_named_export_wins() {
        let named = Arc::new(AtomicUsize::new(0));
        let fallback = Arc::new(AtomicUsize::new(0));
        let module = ViewModule::new()
            .with_mount(counting(&named))
            .with_default(DefaultExport::Callable(counting(&fallback)));

        module.resolve(Lifecycle::Mount).unwrap()().await.unwrap();
        assert_eq!(named.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_callable_default_is_mount_only() {
        let calls = Arc::new(AtomicUsize::new(0));
        let module = ViewModule::new().with_default(DefaultExport::Callable(counting(&calls)));

        module.resolve(Lifecycle::Mount).unwrap()().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(module.resolve(Lifecycle::Unmount).is_none());
    }

    #[tokio::test]
    async fn test_default_object_hooks() {
        let mounts = Arc::new(AtomicUsize::new(0));
        let unmounts = Arc::new(AtomicUsize::new(0));
        let module = ViewModule::new().with_default(DefaultExport::Object {
            mount: Some(counting(&mounts)),
            unmount: Some(counting(&unmounts)),
        });

        module.resolve(Lifecycle::Mount).unwrap()().await.unwrap();
        module.resolve(Lifecycle::Unmount).unwrap()().await.unwrap();
        assert_eq!(mounts.load(Ordering::SeqCst), 1);
        assert_eq!(unmounts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_module_has_no_hooks() {
        let module = ViewModule::new().with_default(DefaultExport::Object {
            mount: None,
            unmount: None,
        });
        assert!(module.resolve(Lifecycle::Mount).is_none());
        assert!(module.resolve(Lifecycle::Unmount).is_none());
    }

    struct Banner {
        mounted: AtomicUsize,
    }

    impl View for Banner {
        async fn mount(&self) -> anyhow::Result<()> {
            self.mounted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_from_view() {
        let banner = Arc::new(Banner { mounted: AtomicUsize::new(0) });
        let module = ViewModule::from_view(Arc::clone(&banner));

        module.resolve(Lifecycle::Mount).unwrap()().await.unwrap();
        module.resolve(Lifecycle::Mount).unwrap()().await.unwrap();
        module.resolve(Lifecycle::Unmount).unwrap()().await.unwrap();
        assert_eq!(banner.mounted.load(Ordering::SeqCst), 2);
    }
}

//! Hash-fragment view router with lifecycle management.
//!
//! Lazily loads view modules, sequences their `mount`/`unmount` hooks behind a
//! transition cover, and keeps section visibility and the active navigation
//! link consistent even when a view fails.

pub mod config;
pub mod dom;
pub mod error;
pub mod location;
pub mod registry;
pub mod route;
pub mod router;
pub mod task;
pub mod view;

pub use error::{Error, Result};

// Re-export common types for convenience
pub use config::{OverlapPolicy, RouterConfig, Selectors};
pub use dom::{Document, MemoryDocument, NodeId, ScrollBehavior, Surface};
pub use location::Location;
pub use registry::{Loader, ViewRegistry};
pub use route::{HOME, KNOWN_ROUTES, RouteName, parse};
pub use router::{Bootstrapper, ClickOutcome, NavPhase, NavigationOutcome, Navigator};
pub use task::{TaskHandle, TaskTracker};
pub use view::{DefaultExport, Hook, Lifecycle, View, ViewModule, hook};

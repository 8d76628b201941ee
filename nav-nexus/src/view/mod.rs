//! View module contract.
//!
//! Defines the lifecycle hooks a view exposes and how the router finds them.

pub mod traits;

pub use traits::{DefaultExport, Hook, HookFuture, Lifecycle, View, ViewModule, hook};

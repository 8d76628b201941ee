//! Router module.
//!
//! `Navigator` runs the navigation state machine; `Bootstrapper` wires it to
//! location changes and navigation link clicks.

pub mod bootstrap;
pub mod engine;

pub use bootstrap::{Bootstrapper, ClickOutcome};
pub use engine::{NavPhase, NavigationOutcome, Navigator};

//! Location fragment state.
//!
//! Holds the current `#...` fragment and notifies subscribers when it changes,
//! the way a browser fires `hashchange`.

use crate::route::{RouteName, parse_with_home};
use tokio::sync::watch;

#[derive(Debug)]
pub struct Location {
    hash: watch::Sender<String>,
}

impl Default for Location {
    fn default() -> Self {
        Self::new("")
    }
}

impl Location {
    pub fn new(hash: impl Into<String>) -> Self {
        let (tx, _) = watch::channel(normalize(hash.into()));
        Self { hash: tx }
    }

    /// The current fragment, including the leading `#`, or empty.
    pub fn hash(&self) -> String {
        self.hash.borrow().clone()
    }

    /// Replace the fragment. Subscribers are only notified when the value
    /// actually changes. Returns whether it changed.
    pub fn set_hash(&self, hash: impl Into<String>) -> bool {
        let hash = normalize(hash.into());
        self.hash.send_if_modified(|current| {
            if *current == hash {
                false
            } else {
                *current = hash;
                true
            }
        })
    }

    /// The route the fragment selects.
    pub fn route(&self, home: &str) -> RouteName {
        let hash = self.hash.borrow();
        parse_with_home(Some(hash.as_str()), home)
    }

    /// Receive a notification on every fragment change after this call.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.hash.subscribe()
    }
}

fn normalize(hash: String) -> String {
    if hash.is_empty() || hash.starts_with('#') {
        hash
    } else {
        format!("#{hash}")
    }
}

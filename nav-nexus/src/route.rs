//! Route names and fragment parsing.
//!
//! Routes are encoded in the location fragment as `#/<name>`. Reading is
//! case-insensitive; every name the router handles internally is lowercase.

use std::borrow::Borrow;
use std::fmt;

/// Name of the landing route.
pub const HOME: &str = "home";

/// Routes of the site, in navigation bar order.
pub const KNOWN_ROUTES: [&str; 7] = [
    HOME,
    "stream",
    "music",
    "beatsaber",
    "software",
    "artwork",
    "about",
];

/// A canonical, lowercase route identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteName(String);

impl RouteName {
    /// Create a route name, lower-casing the input.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().to_lowercase())
    }

    pub fn home() -> Self {
        Self(HOME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fragment that selects this route, e.g. `#/music`.
    pub fn to_fragment(&self) -> String {
        format!("#/{}", self.0)
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for RouteName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RouteName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for RouteName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RouteName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Derive the route from a location fragment, defaulting to [`HOME`].
///
/// A leading `#` and then a leading `/` are stripped before lower-casing, so
/// `#/Stream`, `#stream` and `/stream` all name `stream`.
pub fn parse(fragment: Option<&str>) -> RouteName {
    parse_with_home(fragment, HOME)
}

/// Like [`parse`], with a configurable home route.
pub fn parse_with_home(fragment: Option<&str>, home: &str) -> RouteName {
    let raw = fragment.unwrap_or_default();
    let raw = raw.strip_prefix('#').unwrap_or(raw);
    let segment = raw.strip_prefix('/').unwrap_or(raw);
    if segment.is_empty() {
        RouteName::new(home)
    } else {
        RouteName::new(segment)
    }
}

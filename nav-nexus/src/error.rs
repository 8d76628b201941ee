use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Failed to lock mutex: poisoned"))]
    LockPoisoned,

    #[snafu(display("View '{route}' failed to load: {error:#}"))]
    LoadFailed { route: String, error: anyhow::Error },

    #[snafu(display("View '{route}' has no mount() export"))]
    MissingMount { route: String },

    #[snafu(display("View '{route}' failed to mount: {error:#}"))]
    MountFailed { route: String, error: anyhow::Error },

    #[snafu(display("View '{route}' failed to unmount: {error:#}"))]
    UnmountFailed { route: String, error: anyhow::Error },

    #[snafu(display("Route '{route}' is registered twice"))]
    DuplicateRoute { route: String },

    #[snafu(display("No view registered for the home route '{home}'"))]
    MissingHomeRoute { home: String },

    #[snafu(display("Registry home '{registry}' differs from configured home '{config}'"))]
    HomeRouteMismatch { registry: String, config: String },

    #[snafu(display("Home route must be a non-empty lowercase name, got '{value}'"))]
    InvalidHomeRoute { value: String },

    #[snafu(display("Invalid router configuration: {source}"))]
    InvalidConfig { source: toml::de::Error },
}

pub type Result<T> = std::result::Result<T, Error>;

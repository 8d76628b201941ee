//! Router configuration.
//!
//! Every timing and DOM name the router depends on lives here so a host page
//! with different markup can still be driven. Defaults match the site markup.

use crate::error::{InvalidConfigSnafu, InvalidHomeRouteSnafu, Result};
use crate::route::HOME;
use serde::{Deserialize, Deserializer};
use snafu::prelude::*;
use std::time::Duration;

/// How overlapping navigations are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// Every navigation runs to completion and may race earlier ones.
    #[default]
    Unguarded,
    /// A navigation that is no longer the most recent one stops at its next
    /// suspension point without touching the page. The current view is handed
    /// to exactly one navigation for unmounting.
    LatestWins,
}

/// Names used to find router-managed elements in the document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// Id of the container holding every view section.
    pub app_container_id: String,
    /// Data attribute (without the `data-` prefix) naming a section's route.
    pub view_data_key: String,
    /// Class carried by navigation links.
    pub nav_link_class: String,
    /// Data attribute (without the `data-` prefix) naming a link's route.
    pub route_data_key: String,
    /// Id of the transition cover.
    pub cover_id: String,
    pub cover_active_class: String,
    pub hidden_class: String,
    pub hero_class: String,
    pub home_strip_class: String,
    /// Attribute set on the active navigation link, and its value.
    pub current_attribute: String,
    pub current_value: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            app_container_id: "app".to_string(),
            view_data_key: "view".to_string(),
            nav_link_class: "nav__link".to_string(),
            route_data_key: "route".to_string(),
            cover_id: "page-fade".to_string(),
            cover_active_class: "is-active".to_string(),
            hidden_class: "is-hidden".to_string(),
            hero_class: "hero".to_string(),
            home_strip_class: "home-strip".to_string(),
            current_attribute: "aria-current".to_string(),
            current_value: "page".to_string(),
        }
    }
}

/// Router settings. Durations are written as milliseconds in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub home_route: String,
    /// How long the cover stays up before the view swap starts.
    #[serde(rename = "transition_delay_ms", deserialize_with = "millis")]
    pub transition_delay: Duration,
    /// Stand-in for one animation frame; the cover is cleared after it.
    #[serde(rename = "frame_delay_ms", deserialize_with = "millis")]
    pub frame_delay: Duration,
    /// Delay before the startup check that unsticks the home page.
    #[serde(rename = "safety_check_delay_ms", deserialize_with = "millis")]
    pub safety_check_delay: Duration,
    pub overlap: OverlapPolicy,
    pub selectors: Selectors,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            home_route: HOME.to_string(),
            transition_delay: Duration::from_millis(220),
            frame_delay: Duration::from_millis(16),
            safety_check_delay: Duration::from_millis(600),
            overlap: OverlapPolicy::default(),
            selectors: Selectors::default(),
        }
    }
}

impl RouterConfig {
    /// Parse a configuration from TOML, filling unspecified keys with defaults.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).context(InvalidConfigSnafu)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let home = self.home_route.as_str();
        ensure!(
            !home.is_empty() && home == home.to_lowercase(),
            InvalidHomeRouteSnafu { value: home }
        );
        Ok(())
    }
}

fn millis<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_defaults_match_site_markup() {
        let config = RouterConfig::default();
        assert_eq!(config.home_route, "home");
        assert_eq!(config.transition_delay, Duration::from_millis(220));
        assert_eq!(config.safety_check_delay, Duration::from_millis(600));
        assert_eq!(config.overlap, OverlapPolicy::Unguarded);
        assert_eq!(config.selectors.cover_id, "page-fade");
        assert_eq!(config.selectors.nav_link_class, "nav__link");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RouterConfig::from_toml_str(
            r#"
            transition_delay_ms = 90
            overlap = "latest-wins"

            [selectors]
            hero_class = "banner"
            "#,
        )
        .unwrap();

        assert_eq!(config.transition_delay, Duration::from_millis(90));
        assert_eq!(config.frame_delay, Duration::from_millis(16));
        assert_eq!(config.overlap, OverlapPolicy::LatestWins);
        assert_eq!(config.selectors.hero_class, "banner");
        assert_eq!(config.selectors.hidden_class, "is-hidden");
    }

    #[test]
    fn test_rejects_bad_input() {
        let err = RouterConfig::from_toml_str("transition_delay_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));

        let err = RouterConfig::from_toml_str("home_route = \"Home\"").unwrap_err();
        assert!(matches!(err, Error::InvalidHomeRoute { .. }));
    }
}

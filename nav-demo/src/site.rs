//! Site layout loaded from TOML.

use anyhow::{Context as _, bail};
use nav_nexus::{Document, KNOWN_ROUTES, MemoryDocument, RouterConfig};
use serde::Deserialize;
use std::path::Path;

/// One routed section of the page.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionConfig {
    pub route: String,
    /// Label shown in the navigation bar; defaults to the route name.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub body: String,
    /// Simulated network time before the view module is available.
    #[serde(default)]
    pub load_delay_ms: u64,
    /// The view module cannot be fetched at all.
    #[serde(default)]
    pub missing: bool,
}

impl SectionConfig {
    fn new(route: &str, body: &str) -> Self {
        Self {
            route: route.to_string(),
            label: None,
            body: body.to_string(),
            load_delay_ms: 0,
            missing: false,
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.route)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub tagline: String,
    pub strips: Vec<String>,
    pub router: RouterConfig,
    pub sections: Vec<SectionConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut sections: Vec<_> = KNOWN_ROUTES
            .iter()
            .map(|route| SectionConfig::new(route, ""))
            .collect();
        for section in &mut sections {
            match section.route.as_str() {
                "home" => section.body = "Latest activity: the site rebuild has started.".into(),
                "stream" => {
                    section.body = "Upcoming and archived live streams.".into();
                    section.load_delay_ms = 400;
                }
                "music" => section.body = "Releases, tracks and playlists.".into(),
                "beatsaber" => {
                    section.label = Some("Beat Saber".into());
                    section.body = "Custom maps and play sessions.".into();
                }
                "software" => section.missing = true,
                "artwork" => section.body = "Gallery of illustrations.".into(),
                "about" => section.body = "Who we are and how to reach us.".into(),
                _ => {}
            }
        }

        Self {
            title: "USAGI.NETWORK".to_string(),
            tagline: "Streams, music and everything in between".to_string(),
            strips: vec![
                "Now playing: nothing yet".to_string(),
                "Next stream: to be announced".to_string(),
            ],
            router: RouterConfig::default(),
            sections,
        }
    }
}

impl SiteConfig {
    /// Load the layout from `path`, or use the built-in one.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read site config '{}'", path.display()))?;
        let site: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse site config '{}'", path.display()))?;
        site.validate()?;
        Ok(site)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.router.validate()?;
        if self.sections.is_empty() {
            bail!("Site config has no sections");
        }
        let home = &self.router.home_route;
        if !self.sections.iter().any(|s| s.route.to_lowercase() == *home) {
            bail!("Site config has no section for the home route '{home}'");
        }
        Ok(())
    }

    pub fn routes(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.route.to_lowercase()).collect()
    }

    /// Build the page: navigation bar, cover, hero, strips and one empty
    /// section per route. Views fill their sections when mounted.
    pub fn build_document(&self) -> MemoryDocument {
        let selectors = &self.router.selectors;
        let document = MemoryDocument::scaffold(selectors, &self.router.home_route, &self.routes());

        for node in document.elements_with_class(None, &selectors.hero_class) {
            document.set_text(node, format!("{}\n{}", self.title, self.tagline));
        }
        let strips = document.elements_with_class(None, &selectors.home_strip_class);
        for (node, text) in strips.into_iter().zip(&self.strips) {
            document.set_text(node, text.as_str());
        }
        for link in document.elements_with_class(None, &selectors.nav_link_class) {
            let route = document.data(link, &selectors.route_data_key);
            let section = self
                .sections
                .iter()
                .find(|s| Some(s.route.to_lowercase()) == route);
            if let Some(section) = section {
                document.set_text(link, section.label());
            }
        }
        document
    }
}

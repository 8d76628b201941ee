//! Demo views: each one fills its own section of the page when mounted.

use crate::site::{SectionConfig, SiteConfig};
use anyhow::anyhow;
use nav_nexus::{Document, MemoryDocument, RouteName, View, ViewModule, ViewRegistry};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub struct SectionView {
    route: RouteName,
    body: String,
    data_key: String,
    document: Arc<MemoryDocument>,
    mounts: AtomicUsize,
}

impl SectionView {
    pub fn new(section: &SectionConfig, data_key: &str, document: Arc<MemoryDocument>) -> Self {
        Self {
            route: RouteName::new(&section.route),
            body: section.body.clone(),
            data_key: data_key.to_string(),
            document,
            mounts: AtomicUsize::new(0),
        }
    }

    fn sections(&self) -> Vec<nav_nexus::NodeId> {
        self.document
            .elements_with_data(None, &self.data_key)
            .into_iter()
            .filter(|node| {
                self.document.data(*node, &self.data_key).as_deref() == Some(self.route.as_str())
            })
            .collect()
    }
}

impl View for SectionView {
    async fn mount(&self) -> anyhow::Result<()> {
        let count = self.mounts.fetch_add(1, Ordering::SeqCst) + 1;
        let sections = self.sections();
        if sections.is_empty() {
            return Err(anyhow!("no section for view '{}'", self.route));
        }
        for node in sections {
            self.document
                .set_text(node, format!("{}\n\n(rendered {count}x)", self.body));
        }
        tracing::debug!(route = %self.route, count, "view mounted");
        Ok(())
    }

    async fn unmount(&self) -> anyhow::Result<()> {
        tracing::debug!(route = %self.route, "view unmounted");
        Ok(())
    }
}

/// Register one lazily loaded view per section.
pub fn registry(
    site: &SiteConfig,
    document: &Arc<MemoryDocument>,
) -> nav_nexus::Result<ViewRegistry> {
    let data_key = site.router.selectors.view_data_key.clone();
    let mut builder = ViewRegistry::builder().home(&site.router.home_route);

    for section in &site.sections {
        let route = section.route.clone();
        if section.missing {
            builder = builder.route(&route, {
                let route = route.clone();
                move || {
                    let route = route.clone();
                    async move {
                        Err::<ViewModule, _>(anyhow!(
                            "failed to fetch view module 'views/{route}'"
                        ))
                    }
                }
            });
            continue;
        }

        let view = Arc::new(SectionView::new(section, &data_key, Arc::clone(document)));
        let delay = Duration::from_millis(section.load_delay_ms);
        builder = builder.route(&route, move || {
            let view = Arc::clone(&view);
            async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok::<_, anyhow::Error>(ViewModule::from_view(view))
            }
        });
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nav_nexus::{Location, Navigator};

    fn site() -> (SiteConfig, Arc<MemoryDocument>, Arc<Navigator>) {
        let site = SiteConfig::default();
        let document = Arc::new(site.build_document());
        let registry = Arc::new(registry(&site, &document).unwrap());
        let navigator = Navigator::new(
            registry,
            document.clone(),
            Arc::new(Location::default()),
            site.router.clone(),
        )
        .unwrap();
        let navigator = Arc::new(navigator);
        (site, document, navigator)
    }

    fn section_text(document: &MemoryDocument, route: &str) -> String {
        document
            .elements_with_data(None, "view")
            .into_iter()
            .find(|node| document.data(*node, "view").as_deref() == Some(route))
            .and_then(|node| document.element(node))
            .map(|element| element.text)
            .unwrap_or_default()
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_renders_section() {
        let (_, document, navigator) = site();
        let outcome = navigator.navigate(Some("about")).await;
        assert!(outcome.is_mounted());
        assert!(section_text(&document, "about").contains("(rendered 1x)"));

        navigator.navigate(Some("home")).await;
        navigator.navigate(Some("about")).await;
        assert!(section_text(&document, "about").contains("(rendered 2x)"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_view_is_recovered() {
        let (_, _, navigator) = site();
        let outcome = navigator.navigate(Some("software")).await;
        assert!(!outcome.is_mounted());
        assert_eq!(navigator.surface().current_links(), vec![RouteName::new("software")]);
        // Only the link moves; the page keeps showing home.
        assert_eq!(navigator.surface().visible_views(), vec![RouteName::new("home")]);
        assert!(navigator.surface().home_revealed());
    }
}

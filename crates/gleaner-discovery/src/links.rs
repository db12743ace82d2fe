//! Offer link harvesting from listing pages.

use crate::error::{DiscoveryError, Result};
use gleaner_browser::PageRenderer;
use scraper::{Html, Selector};

/// One site's discovery configuration: where its listing lives and which
/// anchors on it are offer links.
#[derive(Debug, Clone)]
pub struct DiscoveryTarget {
    /// Source name, matching the scraping side
    pub source: String,
    /// Listing page to render
    pub listing_url: String,
    /// Anchor selector for offer links
    pub link_selector: String,
    /// Prefix for relative hrefs; absolute hrefs are kept as-is
    pub base_url: Option<String>,
    /// File name the harvested list is saved under
    pub url_file: String,
}

/// The discovery targets for the supported job boards.
#[must_use]
pub fn targets() -> Vec<DiscoveryTarget> {
    vec![
        DiscoveryTarget {
            source: "pracuj.pl".to_string(),
            listing_url: "https://it.pracuj.pl/praca".to_string(),
            link_selector: r#"[data-test="link-offer"]"#.to_string(),
            base_url: None,
            url_file: "pracuj_urls.txt".to_string(),
        },
        DiscoveryTarget {
            source: "nofluffjobs.com".to_string(),
            listing_url: "https://nofluffjobs.com/pl/backend".to_string(),
            link_selector: "a.posting-list-item".to_string(),
            base_url: Some("https://nofluffjobs.com".to_string()),
            url_file: "nofluff_urls.txt".to_string(),
        },
        DiscoveryTarget {
            source: "justjoin.it".to_string(),
            listing_url: "https://justjoin.it/".to_string(),
            link_selector: "a.offer-card".to_string(),
            base_url: Some("https://justjoin.it".to_string()),
            url_file: "justjoin_urls.txt".to_string(),
        },
    ]
}

/// Render a target's listing page and collect its offer links.
///
/// Relative hrefs are prefixed with the target's base URL; anchors without
/// an `href` are skipped.
pub async fn collect_offer_links<R: PageRenderer>(
    renderer: &R,
    target: &DiscoveryTarget,
) -> Result<Vec<String>> {
    let html = renderer.render(&target.listing_url).await?;
    let links = extract_links(&html, target)?;

    tracing::info!(
        source = %target.source,
        found = links.len(),
        "offer links collected"
    );

    Ok(links)
}

fn extract_links(html: &str, target: &DiscoveryTarget) -> Result<Vec<String>> {
    let selector =
        Selector::parse(&target.link_selector).map_err(|e| DiscoveryError::Selector {
            selector: target.link_selector.clone(),
            reason: e.to_string(),
        })?;

    let document = Html::parse_document(html);
    let mut collected = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if href.starts_with("http") {
            collected.push(href.to_string());
        } else if let Some(base) = &target.base_url {
            collected.push(format!("{base}{href}"));
        } else {
            collected.push(href.to_string());
        }
    }

    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedRenderer {
        html: String,
    }

    #[async_trait]
    impl PageRenderer for FixedRenderer {
        async fn render(&self, _url: &str) -> gleaner_browser::Result<String> {
            Ok(self.html.clone())
        }
    }

    fn test_target(base_url: Option<&str>) -> DiscoveryTarget {
        DiscoveryTarget {
            source: "mock.site".to_string(),
            listing_url: "https://mock.site/listing".to_string(),
            link_selector: "a.offer".to_string(),
            base_url: base_url.map(ToString::to_string),
            url_file: "mock_urls.txt".to_string(),
        }
    }

    #[tokio::test]
    async fn test_collects_matching_hrefs_in_page_order() {
        let renderer = FixedRenderer {
            html: r#"
                <a class="offer" href="https://mock.site/offer/1">one</a>
                <a class="other" href="https://mock.site/nope">skip</a>
                <a class="offer" href="https://mock.site/offer/2">two</a>
                <a class="offer">no href</a>
            "#
            .to_string(),
        };

        let links = collect_offer_links(&renderer, &test_target(None))
            .await
            .expect("collect links");
        assert_eq!(
            links,
            vec!["https://mock.site/offer/1", "https://mock.site/offer/2"],
        );
    }

    #[tokio::test]
    async fn test_relative_hrefs_get_base_prefix() {
        let renderer = FixedRenderer {
            html: r#"
                <a class="offer" href="/pl/job/rust-dev">relative</a>
                <a class="offer" href="https://elsewhere.example/abs">absolute</a>
            "#
            .to_string(),
        };

        let links = collect_offer_links(&renderer, &test_target(Some("https://mock.site")))
            .await
            .expect("collect links");
        assert_eq!(
            links,
            vec![
                "https://mock.site/pl/job/rust-dev",
                "https://elsewhere.example/abs",
            ],
        );
    }

    #[tokio::test]
    async fn test_invalid_selector_is_reported() {
        let renderer = FixedRenderer {
            html: String::new(),
        };
        let mut target = test_target(None);
        target.link_selector = "a[".to_string();

        let err = collect_offer_links(&renderer, &target)
            .await
            .expect_err("selector error");
        assert!(matches!(err, DiscoveryError::Selector { .. }));
    }

    #[test]
    fn test_builtin_targets_have_distinct_files() {
        let targets = targets();
        assert_eq!(targets.len(), 3);
        let mut files: Vec<_> = targets.iter().map(|t| t.url_file.as_str()).collect();
        files.sort_unstable();
        files.dedup();
        assert_eq!(files.len(), 3);
    }
}

use super::CLOUDFLARE_MARKER;
use crate::extract::{OfferSelectors, SalaryKind, SalaryRule};
use crate::machine::SiteConfig;
use std::time::Duration;

/// Site configuration for justjoin.it offer pages.
///
/// justjoin encodes salary as `amount | arrangement` pairs, and an offer may
/// list several workplace badges (city plus remote), which end up joined in
/// the location field.
#[must_use]
pub fn justjoin(urls: Vec<String>, pace_min: Duration, pace_max: Duration) -> SiteConfig {
    SiteConfig {
        source: "justjoin.it".to_string(),
        urls,
        challenge_marker: CLOUDFLARE_MARKER.to_string(),
        pace_min,
        pace_max,
        selectors: OfferSelectors {
            title: "h1".to_string(),
            company: "a[data-test-id='company-link']".to_string(),
            location: "span[data-test-id='workplace']".to_string(),
            description_sections: vec!["div[data-test-id='offer-description']".to_string()],
            detail_sections: None,
            skills: vec!["ul[data-test-id='tech-stack'] h4".to_string()],
            salary_sections: "div[data-test-id='salary-section']".to_string(),
            salary_rules: vec![
                SalaryRule::new("umowa o pracę", SalaryKind::Employment),
                SalaryRule::new("permanent", SalaryKind::Employment),
                SalaryRule::new("zlecenie", SalaryKind::Contract),
                SalaryRule::new("mandate", SalaryKind::Contract),
                SalaryRule::new("b2b", SalaryKind::B2b),
            ],
            salary_pairs: true,
            published: None,
            id_pattern: None,
        },
    }
}

use super::CLOUDFLARE_MARKER;
use crate::extract::{OfferSelectors, SalaryKind, SalaryRule};
use crate::machine::SiteConfig;
use std::time::Duration;

/// Site configuration for nofluffjobs.com offer pages.
#[must_use]
pub fn nofluff(urls: Vec<String>, pace_min: Duration, pace_max: Duration) -> SiteConfig {
    SiteConfig {
        source: "nofluffjobs.com".to_string(),
        urls,
        challenge_marker: CLOUDFLARE_MARKER.to_string(),
        pace_min,
        pace_max,
        selectors: OfferSelectors {
            title: "h1[data-cy='jobTitle']".to_string(),
            company: "a[data-cy='JobOffer_CompanyProfile']".to_string(),
            location: "span[data-cy='location-pin']".to_string(),
            description_sections: vec![
                "section[data-cy='JobOffer_Project']".to_string(),
                "section[data-cy='JobOffer_Requirements']".to_string(),
            ],
            detail_sections: None,
            skills: vec!["#posting-requirements span.posting-tag".to_string()],
            salary_sections: "div[data-cy='JobOffer_Salary'] .salary".to_string(),
            // nofluffjobs abbreviates the arrangement inside the salary box.
            salary_rules: vec![
                SalaryRule::new("uop", SalaryKind::Employment),
                SalaryRule::new("umowa o pracę", SalaryKind::Employment),
                SalaryRule::new("zlecenie", SalaryKind::Contract),
                SalaryRule::new("b2b", SalaryKind::B2b),
            ],
            salary_pairs: false,
            published: None,
            id_pattern: None,
        },
    }
}

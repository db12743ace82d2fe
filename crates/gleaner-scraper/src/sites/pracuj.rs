use super::CLOUDFLARE_MARKER;
use crate::extract::{OfferSelectors, SalaryKind, SalaryRule};
use crate::machine::SiteConfig;
use std::time::Duration;

/// Site configuration for pracuj.pl offer pages.
///
/// Salary is presented as one labeled section per contract type, with the
/// Polish arrangement name inside the section text. Everything under
/// `#offer-details` beyond the project description lands in the description
/// as bullet lines.
#[must_use]
pub fn pracuj(urls: Vec<String>, pace_min: Duration, pace_max: Duration) -> SiteConfig {
    SiteConfig {
        source: "pracuj.pl".to_string(),
        urls,
        challenge_marker: CLOUDFLARE_MARKER.to_string(),
        pace_min,
        pace_max,
        selectors: OfferSelectors {
            title: "h1[data-scroll-id='job-title']".to_string(),
            company: "h2[data-scroll-id='employer-name']".to_string(),
            location: "div[data-test='offer-badge-title']".to_string(),
            description_sections: vec![r#"ul[data-test="text-about-project"]"#.to_string()],
            detail_sections: Some("#offer-details section".to_string()),
            skills: vec![
                r#"span[data-test="item-technologies-expected"], span[data-test="item-technologies-optional"]"#
                    .to_string(),
            ],
            salary_sections: r#"div[data-test="section-salaryPerContractType"]"#.to_string(),
            salary_rules: vec![
                SalaryRule::new("umowa o pracę", SalaryKind::Employment),
                SalaryRule::new("umowa zlecenie", SalaryKind::Contract),
                SalaryRule::new("b2b", SalaryKind::B2b),
            ],
            salary_pairs: false,
            published: None,
            id_pattern: Some(r",oferta,(\d+)".to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_compile() {
        let site = pracuj(Vec::new(), Duration::from_secs(5), Duration::from_secs(10));
        assert_eq!(site.source, "pracuj.pl");
        site.selectors.compile().expect("pracuj selectors compile");
    }
}

//! The harvested record type shared by every scraper and the storage layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One harvested job posting.
///
/// `url` and `source` are always populated when an offer is emitted by a
/// scraper; every other field may be empty or absent. Sites present salary as
/// free-form text per employment arrangement, so the three salary fields stay
/// textual. Offers are never mutated once emitted - the orchestrator only
/// relays them to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOffer {
    /// Identifier derived from the offer URL (site id pattern or URL tail)
    pub id: String,
    /// Position title
    pub title: String,
    /// Hiring company name
    pub company: String,
    /// Free-text location; multiple matches are joined with `", "`
    pub location: String,
    /// Salary offered under a permanent employment contract
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_employment: Option<String>,
    /// Salary offered under a civil contract
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_contract: Option<String>,
    /// Salary offered under a business-to-business contract
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_b2b: Option<String>,
    /// Description assembled from one or more page sections
    pub description: String,
    /// Source URL the offer was scraped from
    pub url: String,
    /// Name of the source site
    pub source: String,
    /// Publication timestamp, when the site exposes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Skill tags in page order; duplicates across offers are expected
    #[serde(default)]
    pub skills: Vec<String>,
}

impl JobOffer {
    /// Create an empty offer for the given source and URL.
    #[must_use]
    pub fn new(source: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            company: String::new(),
            location: String::new(),
            salary_employment: None,
            salary_contract: None,
            salary_b2b: None,
            description: String::new(),
            url: url.into(),
            source: source.into(),
            published_at: None,
            skills: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_populates_invariant_fields() {
        let offer = JobOffer::new("pracuj.pl", "https://www.pracuj.pl/praca/x,oferta,1");
        assert_eq!(offer.source, "pracuj.pl");
        assert_eq!(offer.url, "https://www.pracuj.pl/praca/x,oferta,1");
        assert!(offer.title.is_empty());
        assert!(offer.salary_b2b.is_none());
        assert!(offer.skills.is_empty());
    }

    #[test]
    fn test_serialization_omits_absent_fields() {
        let offer = JobOffer::new("s1", "https://example.com/offer/1");
        let json = serde_json::to_string(&offer).expect("serialize offer");
        assert!(!json.contains("salary_b2b"));
        assert!(!json.contains("published_at"));

        let back: JobOffer = serde_json::from_str(&json).expect("deserialize offer");
        assert_eq!(back, offer);
    }
}

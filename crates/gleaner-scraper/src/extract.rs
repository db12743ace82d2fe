use crate::error::{Result, ScrapeError};
use chrono::{DateTime, NaiveDate, Utc};
use gleaner_core::{normalize, JobOffer};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Employment arrangement a salary figure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryKind {
    /// Permanent employment contract
    Employment,
    /// Civil contract
    Contract,
    /// Business-to-business contract
    B2b,
}

/// Maps a label substring found in a salary section to an arrangement.
///
/// Matching is lowercase substring containment, so locale-specific labels
/// ("umowa o pracę", "b2b") and their abbreviations both work.
#[derive(Debug, Clone)]
pub struct SalaryRule {
    pub keyword: String,
    pub kind: SalaryKind,
}

impl SalaryRule {
    pub fn new(keyword: impl Into<String>, kind: SalaryKind) -> Self {
        Self {
            keyword: keyword.into(),
            kind,
        }
    }
}

/// Per-site selector table. The strings are configuration data; they compile
/// into [`CompiledSelectors`] once, when the scraper is constructed.
#[derive(Debug, Clone)]
pub struct OfferSelectors {
    pub title: String,
    pub company: String,
    pub location: String,
    /// Sections concatenated into the description, newline-separated
    pub description_sections: Vec<String>,
    /// Additional sections appended to the description as bullet lines
    pub detail_sections: Option<String>,
    pub skills: Vec<String>,
    /// Labeled salary sections, one per employment arrangement
    pub salary_sections: String,
    pub salary_rules: Vec<SalaryRule>,
    /// Sections encode salary as `amount | arrangement-label` pairs
    pub salary_pairs: bool,
    pub published: Option<String>,
    /// Regex with one capture group deriving the offer id from the URL
    pub id_pattern: Option<String>,
}

#[derive(Debug)]
pub(crate) struct CompiledSelectors {
    title: Selector,
    company: Selector,
    location: Selector,
    description_sections: Vec<Selector>,
    detail_sections: Option<Selector>,
    skills: Vec<Selector>,
    salary_sections: Selector,
    salary_rules: Vec<(String, SalaryKind)>,
    salary_pairs: bool,
    published: Option<Selector>,
    id_pattern: Option<Regex>,
}

impl OfferSelectors {
    pub(crate) fn compile(&self) -> Result<CompiledSelectors> {
        Ok(CompiledSelectors {
            title: parse_selector(&self.title)?,
            company: parse_selector(&self.company)?,
            location: parse_selector(&self.location)?,
            description_sections: self
                .description_sections
                .iter()
                .map(|s| parse_selector(s))
                .collect::<Result<_>>()?,
            detail_sections: self
                .detail_sections
                .as_deref()
                .map(parse_selector)
                .transpose()?,
            skills: self
                .skills
                .iter()
                .map(|s| parse_selector(s))
                .collect::<Result<_>>()?,
            salary_sections: parse_selector(&self.salary_sections)?,
            salary_rules: self
                .salary_rules
                .iter()
                .map(|r| (r.keyword.to_lowercase(), r.kind))
                .collect(),
            salary_pairs: self.salary_pairs,
            published: self.published.as_deref().map(parse_selector).transpose()?,
            id_pattern: self
                .id_pattern
                .as_deref()
                .map(|p| {
                    Regex::new(p).map_err(|e| ScrapeError::Selector {
                        selector: p.to_string(),
                        reason: e.to_string(),
                    })
                })
                .transpose()?,
        })
    }
}

fn parse_selector(expr: &str) -> Result<Selector> {
    Selector::parse(expr).map_err(|e| ScrapeError::Selector {
        selector: expr.to_string(),
        reason: e.to_string(),
    })
}

/// Pull an offer out of rendered markup.
///
/// Extraction never fails: a field whose selector matches nothing is simply
/// left empty. The markup parser is lenient, so malformed input degrades to
/// an offer with empty fields rather than an error.
pub(crate) fn extract_offer(
    selectors: &CompiledSelectors,
    html: &str,
    url: &str,
    source: &str,
) -> JobOffer {
    let document = Html::parse_document(html);

    let mut offer = JobOffer::new(source, url);
    offer.id = derive_id(selectors, url);
    offer.title = first_text(&document, &selectors.title).unwrap_or_default();
    offer.company = first_text(&document, &selectors.company).unwrap_or_default();
    offer.location = all_texts(&document, &selectors.location).join(", ");
    offer.description = assemble_description(selectors, &document);

    for selector in &selectors.skills {
        for element in document.select(selector) {
            let text = element_text(element);
            if !text.is_empty() {
                offer.skills.push(text);
            }
        }
    }

    extract_salaries(selectors, &document, &mut offer);

    if let Some(selector) = &selectors.published {
        offer.published_at = first_text(&document, selector)
            .as_deref()
            .and_then(parse_published);
    }

    offer
}

fn assemble_description(selectors: &CompiledSelectors, document: &Html) -> String {
    let mut description = String::new();

    for selector in &selectors.description_sections {
        for element in document.select(selector) {
            let text = element_text(element);
            if !text.is_empty() {
                description.push_str(&text);
                description.push('\n');
            }
        }
    }

    if let Some(selector) = &selectors.detail_sections {
        for element in document.select(selector) {
            for line in element.text().collect::<String>().lines() {
                let line = line.trim();
                if !line.is_empty() {
                    description.push_str("• ");
                    description.push_str(line);
                    description.push('\n');
                }
            }
        }
    }

    description.trim_end().to_string()
}

fn extract_salaries(selectors: &CompiledSelectors, document: &Html, offer: &mut JobOffer) {
    for element in document.select(&selectors.salary_sections) {
        let text = element_text(element).replace('\u{a0}', " ");
        if text.is_empty() {
            continue;
        }

        if selectors.salary_pairs {
            // `10 000 zł | umowa o pracę` - the label picks the field, the
            // amount is the value.
            let Some((amount, label)) = text.split_once('|') else {
                continue;
            };
            let label = label.to_lowercase();
            let amount = amount.trim();
            for (keyword, kind) in &selectors.salary_rules {
                if label.contains(keyword) {
                    assign_salary(offer, *kind, amount);
                    break;
                }
            }
        } else {
            let lower = text.to_lowercase();
            for (keyword, kind) in &selectors.salary_rules {
                if lower.contains(keyword) {
                    assign_salary(offer, *kind, text.trim());
                    break;
                }
            }
        }
    }
}

fn assign_salary(offer: &mut JobOffer, kind: SalaryKind, value: &str) {
    let slot = match kind {
        SalaryKind::Employment => &mut offer.salary_employment,
        SalaryKind::Contract => &mut offer.salary_contract,
        SalaryKind::B2b => &mut offer.salary_b2b,
    };
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}

fn derive_id(selectors: &CompiledSelectors, url: &str) -> String {
    if let Some(pattern) = &selectors.id_pattern {
        if let Some(captures) = pattern.captures(url) {
            if let Some(id) = captures.get(1) {
                return id.as_str().to_string();
            }
        }
    }

    let canonical = normalize(url);
    canonical
        .rsplit('/')
        .next()
        .unwrap_or(canonical.as_str())
        .to_string()
}

fn parse_published(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

fn all_texts(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFER_HTML: &str = r#"
        <html>
        <body>
        <h1 data-scroll-id="job-title">Senior Rust Developer</h1>
        <h2 data-scroll-id="employer-name">Tech Corp</h2>
        <div data-test="offer-badge-title">Warszawa</div>
        <ul data-test="text-about-project">
            <li>Praca nad API</li>
            <li>Mikroserwisy</li>
        </ul>
        <span data-test="item-technologies-expected">Rust</span>
        <span data-test="item-technologies-optional">Docker</span>
        <div data-test="section-salaryPerContractType">10&#160;000 zł brutto / mies. umowa o pracę</div>
        <div data-test="section-salaryPerContractType">15&#160;000 zł netto / mies. B2B</div>
        </body>
        </html>
    "#;

    fn test_selectors() -> OfferSelectors {
        OfferSelectors {
            title: "h1[data-scroll-id='job-title']".to_string(),
            company: "h2[data-scroll-id='employer-name']".to_string(),
            location: "div[data-test='offer-badge-title']".to_string(),
            description_sections: vec![r#"ul[data-test="text-about-project"]"#.to_string()],
            detail_sections: None,
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
        }
    }

    #[test]
    fn test_extract_full_offer() {
        let compiled = test_selectors().compile().expect("compile selectors");
        let offer = extract_offer(
            &compiled,
            OFFER_HTML,
            "https://www.pracuj.pl/praca/senior-rust,oferta,1004500759?s=abc",
            "pracuj.pl",
        );

        assert_eq!(offer.id, "1004500759");
        assert_eq!(offer.title, "Senior Rust Developer");
        assert_eq!(offer.company, "Tech Corp");
        assert_eq!(offer.location, "Warszawa");
        assert!(offer.description.contains("Praca nad API"));
        assert!(offer.description.contains("Mikroserwisy"));
        assert_eq!(offer.skills, vec!["Rust", "Docker"]);
        assert_eq!(
            offer.salary_employment.as_deref(),
            Some("10 000 zł brutto / mies. umowa o pracę"),
        );
        assert_eq!(
            offer.salary_b2b.as_deref(),
            Some("15 000 zł netto / mies. B2B"),
        );
        assert!(offer.salary_contract.is_none());
        assert_eq!(offer.source, "pracuj.pl");
    }

    #[test]
    fn test_missing_fields_stay_empty() {
        let compiled = test_selectors().compile().expect("compile selectors");
        let offer = extract_offer(
            &compiled,
            "<html><body><p>nothing here</p></body></html>",
            "https://www.pracuj.pl/praca/empty,oferta,42",
            "pracuj.pl",
        );

        assert_eq!(offer.id, "42");
        assert!(offer.title.is_empty());
        assert!(offer.company.is_empty());
        assert!(offer.skills.is_empty());
        assert!(offer.salary_employment.is_none());
        // Invariant fields survive regardless of page content.
        assert_eq!(offer.source, "pracuj.pl");
        assert_eq!(offer.url, "https://www.pracuj.pl/praca/empty,oferta,42");
    }

    #[test]
    fn test_salary_pair_splitting() {
        let mut selectors = test_selectors();
        selectors.salary_pairs = true;
        let compiled = selectors.compile().expect("compile selectors");

        let html = r#"
            <div data-test="section-salaryPerContractType">10 000 zł | umowa o pracę</div>
            <div data-test="section-salaryPerContractType">18 000 zł | B2B</div>
            <div data-test="section-salaryPerContractType">no separator here</div>
        "#;
        let offer = extract_offer(&compiled, html, "https://x.pl/a,oferta,1", "pracuj.pl");

        assert_eq!(offer.salary_employment.as_deref(), Some("10 000 zł"));
        assert_eq!(offer.salary_b2b.as_deref(), Some("18 000 zł"));
        assert!(offer.salary_contract.is_none());
    }

    #[test]
    fn test_multi_valued_location_is_joined() {
        let compiled = test_selectors().compile().expect("compile selectors");
        let html = r#"
            <div data-test="offer-badge-title">Warszawa</div>
            <div data-test="offer-badge-title">Zdalnie</div>
        "#;
        let offer = extract_offer(&compiled, html, "https://x.pl/a,oferta,1", "pracuj.pl");
        assert_eq!(offer.location, "Warszawa, Zdalnie");
    }

    #[test]
    fn test_detail_sections_become_bullet_lines() {
        let mut selectors = test_selectors();
        selectors.detail_sections = Some("#offer-details section".to_string());
        let compiled = selectors.compile().expect("compile selectors");

        let html = r#"
            <ul data-test="text-about-project"><li>Core work</li></ul>
            <div id="offer-details">
                <section>Benefits
                    private healthcare</section>
            </div>
        "#;
        let offer = extract_offer(&compiled, html, "https://x.pl/a,oferta,1", "pracuj.pl");

        assert!(offer.description.starts_with("Core work"));
        assert!(offer.description.contains("• Benefits"));
        assert!(offer.description.contains("• private healthcare"));
    }

    #[test]
    fn test_id_falls_back_to_canonical_url_tail() {
        let mut selectors = test_selectors();
        selectors.id_pattern = None;
        let compiled = selectors.compile().expect("compile selectors");

        let offer = extract_offer(
            &compiled,
            "<html></html>",
            "https://justjoin.it/offers/acme-rust-dev-f3a1?ref=listing",
            "justjoin.it",
        );
        assert_eq!(offer.id, "acme-rust-dev-f3a1");
    }

    #[test]
    fn test_invalid_selector_fails_compilation() {
        let mut selectors = test_selectors();
        selectors.title = "div[".to_string();
        let err = selectors.compile().expect_err("compilation should fail");
        assert!(matches!(err, ScrapeError::Selector { .. }));
    }

    #[test]
    fn test_published_date_parsing() {
        assert!(parse_published("2026-08-01").is_some());
        assert!(parse_published("2026-08-01T10:30:00+02:00").is_some());
        assert!(parse_published("wczoraj").is_none());
    }
}

//! Canonical URL normalization.
//!
//! Offer links picked up from listing pages carry tracking parameters and
//! session ids that make the same posting look like many distinct URLs. The
//! storage layer deduplicates by the canonical form produced here.

use url::Url;

/// Reduce a raw URL to its canonical, comparable form.
///
/// Drops the query string and fragment entirely and strips trailing path
/// separators. Unparseable input is returned unchanged - callers treat the
/// result as an opaque deduplication key either way. The function is
/// idempotent: `normalize(normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };

    url.set_query(None);
    url.set_fragment(None);

    url.to_string().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_query_and_fragment() {
        assert_eq!(normalize("https://x.pl/a?b=1#c"), "https://x.pl/a");
    }

    #[test]
    fn test_strips_trailing_slash() {
        assert_eq!(normalize("https://x.pl/a/"), "https://x.pl/a");
        assert_eq!(normalize("https://x.pl/"), "https://x.pl");
    }

    #[test]
    fn test_tracking_parameters_collapse_to_one_key() {
        let a = normalize(
            "https://www.pracuj.pl/praca/senior-engineer-mobile-android-krakow-kapelanka-42a,oferta,1004500759?s=1f7c2c91&searchId=MTc2NDUyMDk4NTY0MS40NDQ2",
        );
        let b = normalize(
            "https://www.pracuj.pl/praca/senior-engineer-mobile-android-krakow-kapelanka-42a,oferta,1004500759",
        );
        assert_eq!(
            a,
            "https://www.pracuj.pl/praca/senior-engineer-mobile-android-krakow-kapelanka-42a,oferta,1004500759"
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_malformed_input_returned_unchanged() {
        assert_eq!(normalize("not a url"), "not a url");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("x.pl/relative/path"), "x.pl/relative/path");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "https://x.pl/a?b=1#c",
            "https://x.pl/a/",
            "https://x.pl",
            "https://nofluffjobs.com/pl/job/rust-dev-acme-warszawa?ref=mail",
            "not a url",
            "",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_query_order_irrelevant() {
        assert_eq!(
            normalize("https://x.pl/a?b=1&c=2"),
            normalize("https://x.pl/a?c=2&b=1"),
        );
    }
}

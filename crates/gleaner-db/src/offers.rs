//! Offer table operations.
//!
//! Inserts deduplicate by canonical URL: the same posting reached through
//! differently-decorated links (tracking parameters, session ids) is stored
//! once. The caller never computes the canonical form itself - it is derived
//! here from the offer's source URL.

use crate::error::{DatabaseError, Result};
use chrono::{DateTime, Utc};
use gleaner_core::{normalize, JobOffer};
use sqlx::{Pool, Row, Sqlite};

/// One stored offer row.
#[derive(Debug, Clone)]
pub struct StoredOffer {
    /// Row id
    pub id: String,
    /// Source-derived offer identifier
    pub offer_id: String,
    /// Deduplication key
    pub canonical_url: String,
    /// Offer as it was harvested
    pub offer: JobOffer,
    /// When the offer was stored
    pub scraped_at: DateTime<Utc>,
}

/// Insert a harvested offer unless its canonical URL is already stored.
///
/// Returns `true` when a row was inserted, `false` when the canonical URL
/// was already present.
pub async fn insert_offer(pool: &Pool<Sqlite>, offer: &JobOffer) -> Result<bool> {
    let canonical_url = normalize(&offer.url);
    let skills = serde_json::to_string(&offer.skills)
        .map_err(|e| DatabaseError::Serialization(e.to_string()))?;

    let result = sqlx::query(
        "INSERT INTO offers (
            id, offer_id, canonical_url, url, source, title, company, location,
            salary_employment, salary_contract, salary_b2b, description,
            published_at, skills, scraped_at
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(canonical_url) DO NOTHING",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(&offer.id)
    .bind(&canonical_url)
    .bind(&offer.url)
    .bind(&offer.source)
    .bind(&offer.title)
    .bind(&offer.company)
    .bind(&offer.location)
    .bind(&offer.salary_employment)
    .bind(&offer.salary_contract)
    .bind(&offer.salary_b2b)
    .bind(&offer.description)
    .bind(offer.published_at.map(|t| t.to_rfc3339()))
    .bind(&skills)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    let inserted = result.rows_affected() > 0;
    if inserted {
        tracing::debug!(source = %offer.source, url = %offer.url, "offer stored");
    } else {
        tracing::debug!(canonical_url = %canonical_url, "duplicate offer skipped");
    }

    Ok(inserted)
}

/// Check whether an offer with the given canonical URL is already stored.
pub async fn exists(pool: &Pool<Sqlite>, canonical_url: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM offers WHERE canonical_url = ?")
        .bind(canonical_url)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Total number of stored offers.
pub async fn count(pool: &Pool<Sqlite>) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM offers")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Number of stored offers per source, alphabetically by source name.
pub async fn count_by_source(pool: &Pool<Sqlite>) -> Result<Vec<(String, i64)>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT source, COUNT(*) FROM offers GROUP BY source ORDER BY source",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetch one stored offer by its canonical URL.
pub async fn get_by_canonical_url(
    pool: &Pool<Sqlite>,
    canonical_url: &str,
) -> Result<Option<StoredOffer>> {
    let row = sqlx::query("SELECT * FROM offers WHERE canonical_url = ?")
        .bind(canonical_url)
        .fetch_optional(pool)
        .await?;

    row.map(|row| decode_row(&row)).transpose()
}

fn decode_row(row: &sqlx::sqlite::SqliteRow) -> Result<StoredOffer> {
    let skills_json: String = row.try_get("skills")?;
    let skills: Vec<String> = serde_json::from_str(&skills_json)
        .map_err(|e| DatabaseError::Decode(format!("invalid skills column: {e}")))?;

    let published_at: Option<String> = row.try_get("published_at")?;
    let published_at = published_at
        .as_deref()
        .map(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| DatabaseError::Decode(format!("invalid published_at: {e}")))
        })
        .transpose()?;

    let scraped_at: String = row.try_get("scraped_at")?;
    let scraped_at = DateTime::parse_from_rfc3339(&scraped_at)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DatabaseError::Decode(format!("invalid scraped_at: {e}")))?;

    let mut offer = JobOffer::new(
        row.try_get::<String, _>("source")?,
        row.try_get::<String, _>("url")?,
    );
    offer.id = row.try_get("offer_id")?;
    offer.title = row.try_get("title")?;
    offer.company = row.try_get("company")?;
    offer.location = row.try_get("location")?;
    offer.salary_employment = row.try_get("salary_employment")?;
    offer.salary_contract = row.try_get("salary_contract")?;
    offer.salary_b2b = row.try_get("salary_b2b")?;
    offer.description = row.try_get("description")?;
    offer.published_at = published_at;
    offer.skills = skills;

    Ok(StoredOffer {
        id: row.try_get("id")?,
        offer_id: offer.id.clone(),
        canonical_url: row.try_get("canonical_url")?,
        offer,
        scraped_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::new(":memory:").await.expect("create database");
        db.run_migrations().await.expect("run migrations");
        db
    }

    fn sample_offer() -> JobOffer {
        let mut offer = JobOffer::new(
            "pracuj.pl",
            "https://www.pracuj.pl/praca/rust-dev,oferta,123?s=abc#apply",
        );
        offer.id = "123".to_string();
        offer.title = "Rust Developer".to_string();
        offer.company = "Acme".to_string();
        offer.location = "Warszawa".to_string();
        offer.salary_b2b = Some("20 000 zł".to_string());
        offer.description = "Ship things".to_string();
        offer.skills = vec!["Rust".to_string(), "SQL".to_string()];
        offer
    }

    #[tokio::test]
    async fn test_insert_and_fetch_round_trip() {
        let db = test_db().await;
        let offer = sample_offer();

        let inserted = insert_offer(db.pool(), &offer).await.expect("insert");
        assert!(inserted);

        let canonical = normalize(&offer.url);
        let stored = get_by_canonical_url(db.pool(), &canonical)
            .await
            .expect("fetch")
            .expect("offer present");

        assert_eq!(stored.offer_id, "123");
        assert_eq!(stored.offer.title, "Rust Developer");
        assert_eq!(stored.offer.salary_b2b.as_deref(), Some("20 000 zł"));
        assert_eq!(stored.offer.skills, vec!["Rust", "SQL"]);
        assert_eq!(
            stored.canonical_url,
            "https://www.pracuj.pl/praca/rust-dev,oferta,123"
        );
    }

    #[tokio::test]
    async fn test_decorated_urls_deduplicate_to_one_row() {
        let db = test_db().await;

        let first = sample_offer();
        assert!(insert_offer(db.pool(), &first).await.expect("insert"));

        // Same posting reached through a different tracking link.
        let mut second = sample_offer();
        second.url =
            "https://www.pracuj.pl/praca/rust-dev,oferta,123?searchId=zzz".to_string();
        assert!(!insert_offer(db.pool(), &second).await.expect("insert"));

        assert_eq!(count(db.pool()).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn test_exists_by_canonical_url() {
        let db = test_db().await;
        let offer = sample_offer();
        let canonical = normalize(&offer.url);

        assert!(!exists(db.pool(), &canonical).await.expect("exists"));
        insert_offer(db.pool(), &offer).await.expect("insert");
        assert!(exists(db.pool(), &canonical).await.expect("exists"));
    }

    #[tokio::test]
    async fn test_count_by_source() {
        let db = test_db().await;

        insert_offer(db.pool(), &sample_offer()).await.expect("insert");

        let mut other = sample_offer();
        other.source = "justjoin.it".to_string();
        other.url = "https://justjoin.it/offers/acme-rust".to_string();
        insert_offer(db.pool(), &other).await.expect("insert");

        let counts = count_by_source(db.pool()).await.expect("count");
        assert_eq!(
            counts,
            vec![("justjoin.it".to_string(), 1), ("pracuj.pl".to_string(), 1)],
        );
    }

    #[tokio::test]
    async fn test_offer_without_optional_fields() {
        let db = test_db().await;
        let offer = JobOffer::new("nofluffjobs.com", "https://nofluffjobs.com/pl/job/x");

        assert!(insert_offer(db.pool(), &offer).await.expect("insert"));

        let stored = get_by_canonical_url(db.pool(), "https://nofluffjobs.com/pl/job/x")
            .await
            .expect("fetch")
            .expect("offer present");
        assert!(stored.offer.title.is_empty());
        assert!(stored.offer.salary_employment.is_none());
        assert!(stored.offer.published_at.is_none());
        assert!(stored.offer.skills.is_empty());
    }
}

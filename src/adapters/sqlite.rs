//! libSQL-backed storage.
//!
//! A single connection is opened per store and shared by every request.
//! Timestamps are stored as fixed-width RFC 3339 text so lexical order in
//! SQL matches chronological order; plan features are stored as JSON text.

use crate::domain::model::{NewReview, Plan, Rating, Review};
use crate::domain::ports::{PlanStore, ReviewStore};
use crate::utils::error::{Result, SiteError};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use libsql::Builder;

const MIGRATION_001: &str = include_str!("../../migrations/001_initial.sql");

pub struct SqliteStore {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and applies the schema.
    /// `":memory:"` gives a throwaway database.
    pub async fn open(path: &str) -> Result<Self> {
        tracing::debug!("Opening libSQL database at {}", path);
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let store = Self { db, conn };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<()> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| SiteError::storage(format!("Migration 001_initial failed: {e}")))?;
        Ok(())
    }

    /// Inserts `plans` only when the plans table is empty. Returns the number inserted.
    pub async fn seed_plans(&self, plans: &[Plan]) -> Result<usize> {
        let mut rows = self.conn.query("SELECT COUNT(*) FROM plans", ()).await?;
        let existing = match rows.next().await? {
            Some(row) => row.get::<i64>(0)?,
            None => 0,
        };
        if existing > 0 {
            tracing::info!("Plans table already holds {} rows, skipping seed", existing);
            return Ok(0);
        }

        let now = format_timestamp(&Utc::now());
        let tx = self.conn.transaction().await?;
        for plan in plans {
            let features = serde_json::to_string(&plan.features)?;
            tx.execute(
                "INSERT INTO plans (name, price, features, created_at) VALUES (?1, ?2, ?3, ?4)",
                libsql::params![plan.name.as_str(), plan.price.as_str(), features, now.as_str()],
            )
            .await?;
        }
        tx.commit().await?;

        tracing::info!("Seeded {} plans", plans.len());
        Ok(plans.len())
    }

    /// Inserts the demo reviews shown on a fresh install.
    pub async fn insert_sample_reviews(&self) -> Result<usize> {
        let samples = sample_reviews()?;
        let count = samples.len();
        for review in samples {
            self.insert_review(review).await?;
        }
        tracing::info!("Inserted {} sample reviews", count);
        Ok(count)
    }
}

fn sample_reviews() -> Result<Vec<NewReview>> {
    let samples = [
        ("John Smith", 5, "Excellent service! Highly recommended."),
        (
            "Sarah Johnson",
            4,
            "Great product, would use again. The dashboard is very intuitive.",
        ),
        (
            "Michael Brown",
            5,
            "The best cybersecurity tool I've used. Worth every penny!",
        ),
    ];

    samples
        .into_iter()
        .map(|(name, rating, comment)| {
            Ok(NewReview {
                name: name.to_string(),
                rating: Rating::new(rating)?,
                comment: comment.to_string(),
                created_at: Utc::now(),
            })
        })
        .collect()
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Accepts RFC 3339 and SQLite's `datetime('now')` format.
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| SiteError::storage(format!("Failed to parse timestamp '{s}': {e}")))
}

fn parse_features(raw: Option<String>) -> Vec<String> {
    match raw {
        Some(text) if !text.is_empty() => serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed plan features {:?}: {}", text, e);
            Vec::new()
        }),
        _ => Vec::new(),
    }
}

fn row_to_plan(row: &libsql::Row) -> Result<Plan> {
    Ok(Plan {
        name: row.get::<String>(0)?,
        price: row.get::<String>(1)?,
        features: parse_features(row.get::<Option<String>>(2)?),
    })
}

fn row_to_review(row: &libsql::Row) -> Result<Review> {
    Ok(Review {
        id: row.get::<i64>(0)?,
        name: row.get::<String>(1)?,
        rating: Rating::new(row.get::<i64>(2)?)
            .map_err(|_| SiteError::storage("Stored review has an out-of-range rating"))?,
        comment: row.get::<String>(3)?,
        created_at: parse_timestamp(&row.get::<String>(4)?)?,
    })
}

#[async_trait]
impl PlanStore for SqliteStore {
    async fn list_plans(&self) -> Result<Vec<Plan>> {
        let mut rows = self
            .conn
            .query("SELECT name, price, features FROM plans ORDER BY id ASC", ())
            .await?;

        let mut plans = Vec::new();
        while let Some(row) = rows.next().await? {
            plans.push(row_to_plan(&row)?);
        }
        Ok(plans)
    }
}

#[async_trait]
impl ReviewStore for SqliteStore {
    async fn list_reviews(&self, limit: Option<usize>) -> Result<Vec<Review>> {
        // SQLite treats a negative LIMIT as unbounded
        let limit = limit.map_or(-1, |l| l as i64);
        let mut rows = self
            .conn
            .query(
                "SELECT id, name, rating, comment, created_at FROM reviews
                 ORDER BY created_at DESC, id DESC LIMIT ?1",
                libsql::params![limit],
            )
            .await?;

        let mut reviews = Vec::new();
        while let Some(row) = rows.next().await? {
            reviews.push(row_to_review(&row)?);
        }
        Ok(reviews)
    }

    async fn insert_review(&self, review: NewReview) -> Result<Review> {
        let stamp = format_timestamp(&review.created_at);
        let mut rows = self
            .conn
            .query(
                "INSERT INTO reviews (name, rating, comment, created_at)
                 VALUES (?1, ?2, ?3, ?4) RETURNING id",
                libsql::params![
                    review.name.as_str(),
                    i64::from(review.rating),
                    review.comment.as_str(),
                    stamp.as_str()
                ],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| SiteError::storage("Insert returned no id"))?;
        let id = row.get::<i64>(0)?;

        // Echo the stored precision, not the in-memory one
        let created_at = parse_timestamp(&stamp)?;
        Ok(NewReview {
            created_at,
            ..review
        }
        .into_review(id))
    }

    async fn ping(&self) -> Result<()> {
        let mut rows = self.conn.query("SELECT 1", ()).await?;
        rows.next().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::static_catalog::default_plans;
    use chrono::{Duration, TimeZone};

    async fn test_store() -> SqliteStore {
        SqliteStore::open(":memory:").await.unwrap()
    }

    fn review_at(name: &str, rating: i64, secs: i64) -> NewReview {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        NewReview {
            name: name.to_string(),
            rating: Rating::new(rating).unwrap(),
            comment: format!("{} says hi", name),
            created_at: base + Duration::seconds(secs),
        }
    }

    #[tokio::test]
    async fn test_open_is_idempotent_on_schema() {
        let store = test_store().await;
        store.run_migrations().await.unwrap();
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_seed_plans_preserves_order_and_features() {
        let store = test_store().await;
        assert_eq!(store.seed_plans(&default_plans()).await.unwrap(), 3);

        let plans = store.list_plans().await.unwrap();
        assert_eq!(plans, default_plans());
    }

    #[tokio::test]
    async fn test_seed_plans_skips_non_empty_table() {
        let store = test_store().await;
        store.seed_plans(&default_plans()).await.unwrap();
        assert_eq!(store.seed_plans(&default_plans()).await.unwrap(), 0);
        assert_eq!(store.list_plans().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_features_read_as_empty() {
        let store = test_store().await;
        store
            .conn
            .execute(
                "INSERT INTO plans (name, price, features, created_at)
                 VALUES ('Odd', '$1', 'not json', '2025-01-01 00:00:00')",
                (),
            )
            .await
            .unwrap();

        let plans = store.list_plans().await.unwrap();
        assert_eq!(plans.len(), 1);
        assert!(plans[0].features.is_empty());
    }

    #[tokio::test]
    async fn test_reviews_listed_newest_first() {
        let store = test_store().await;
        store.insert_review(review_at("first", 3, 0)).await.unwrap();
        store.insert_review(review_at("third", 5, 120)).await.unwrap();
        store.insert_review(review_at("second", 4, 60)).await.unwrap();

        let reviews = store.list_reviews(None).await.unwrap();
        let names: Vec<&str> = reviews.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["third", "second", "first"]);
        assert!(reviews
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[tokio::test]
    async fn test_equal_timestamps_break_ties_by_insertion() {
        let store = test_store().await;
        store.insert_review(review_at("a", 3, 10)).await.unwrap();
        store.insert_review(review_at("b", 3, 10)).await.unwrap();

        let reviews = store.list_reviews(None).await.unwrap();
        assert_eq!(reviews[0].name, "b");
        assert_eq!(reviews[1].name, "a");
    }

    #[tokio::test]
    async fn test_insert_echoes_stored_record() {
        let store = test_store().await;
        let stored = store.insert_review(review_at("echo", 2, 0)).await.unwrap();

        let listed = store.list_reviews(Some(1)).await.unwrap();
        assert_eq!(listed, vec![stored]);
    }

    #[tokio::test]
    async fn test_limit_returns_latest_window() {
        let store = test_store().await;
        for i in 0..4 {
            store.insert_review(review_at("r", 4, i)).await.unwrap();
        }

        let latest = store.list_reviews(Some(2)).await.unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].id, 4);
        assert_eq!(latest[1].id, 3);
    }

    #[tokio::test]
    async fn test_sample_reviews_are_inserted() {
        let store = test_store().await;
        assert_eq!(store.insert_sample_reviews().await.unwrap(), 3);
        assert_eq!(store.list_reviews(None).await.unwrap().len(), 3);
    }

    #[test]
    fn test_parse_timestamp_accepts_sqlite_format() {
        let parsed = parse_timestamp("2025-02-09 14:30:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 2, 9, 14, 30, 0).unwrap());
    }
}

use crate::core::{NewReview, Rating, Result, Review, ReviewStore};
use crate::utils::error::SiteError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};

const INVALID_RATING: &str = "Invalid rating";
const EMPTY_COMMENT: &str = "Review comment cannot be empty";

/// A review as submitted by a client, before validation.
///
/// `rating` stays loosely typed so that strings, floats and other junk are
/// reported as an invalid rating rather than a body parse failure. The legacy
/// frontend sends `review`/`author`; when both spellings are present the
/// `comment`/`name` ones win.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReviewSubmission {
    pub rating: Option<Value>,
    pub comment: Option<String>,
    pub review: Option<String>,
    pub name: Option<String>,
    pub author: Option<String>,
}

impl ReviewSubmission {
    pub fn new(rating: impl Into<Value>, comment: &str, name: Option<&str>) -> Self {
        Self {
            rating: Some(rating.into()),
            comment: Some(comment.to_string()),
            name: name.map(str::to_string),
            ..Self::default()
        }
    }

    fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref().or(self.review.as_deref())
    }

    fn author_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.author.as_deref())
    }
}

/// Hands out acceptance timestamps that never go backwards, even if the
/// wall clock is stepped back between two submissions.
#[derive(Debug, Default)]
struct MonotonicClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl MonotonicClock {
    fn now(&self) -> DateTime<Utc> {
        self.stamp(Utc::now())
    }

    fn stamp(&self, wall: DateTime<Utc>) -> DateTime<Utc> {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let stamp = match *last {
            Some(prev) if prev > wall => prev,
            _ => wall,
        };
        *last = Some(stamp);
        stamp
    }
}

/// Integers are accepted as-is; strings holding an integer are coerced.
fn parse_rating(raw: Option<&Value>) -> Result<Rating> {
    let value = match raw {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    value
        .ok_or_else(|| SiteError::validation(INVALID_RATING))
        .and_then(Rating::new)
}

#[derive(Clone)]
pub struct ReviewService {
    store: Arc<dyn ReviewStore>,
    clock: Arc<MonotonicClock>,
    default_author: String,
    public_limit: usize,
}

impl ReviewService {
    pub fn new(store: Arc<dyn ReviewStore>, default_author: &str, public_limit: usize) -> Self {
        Self {
            store,
            clock: Arc::new(MonotonicClock::default()),
            default_author: default_author.to_string(),
            public_limit,
        }
    }

    /// Every review, newest first.
    pub async fn list_reviews(&self) -> Result<Vec<Review>> {
        self.store.list_reviews(None).await
    }

    /// The latest `public_limit` reviews, newest first.
    pub async fn list_recent_reviews(&self) -> Result<Vec<Review>> {
        self.store.list_reviews(Some(self.public_limit)).await
    }

    /// Checks a submission without touching storage.
    pub fn validate(&self, submission: &ReviewSubmission) -> Result<NewReview> {
        let rating = parse_rating(submission.rating.as_ref())?;

        let comment = submission
            .comment_text()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| SiteError::validation(EMPTY_COMMENT))?;

        let name = submission
            .author_name()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.default_author.as_str());

        Ok(NewReview {
            name: name.to_string(),
            rating,
            comment: comment.to_string(),
            created_at: self.clock.now(),
        })
    }

    pub async fn submit_review(&self, submission: ReviewSubmission) -> Result<Review> {
        let review = self.validate(&submission)?;
        let stored = self.store.insert_review(review).await?;
        tracing::info!(
            "Stored review {} from {} ({}/5)",
            stored.id,
            stored.name,
            stored.rating.value()
        );
        Ok(stored)
    }

    pub async fn storage_reachable(&self) -> Result<()> {
        self.store.ping().await
    }
}

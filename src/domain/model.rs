use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::error::{Result, SiteError};

/// A subscription tier as shown on the pricing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    /// Display string, never parsed as currency.
    pub price: String,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Plan {
    pub fn new(name: &str, price: &str, features: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            price: price.to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Star rating in the closed range `[1, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    pub fn new(value: i64) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(SiteError::validation("Invalid rating"))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = SiteError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        i64::from(rating.0)
    }
}

/// A stored review, as returned by the listing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub name: String,
    pub rating: Rating,
    #[serde(rename = "review", alias = "comment")]
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// An accepted submission that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub name: String,
    pub rating: Rating,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl NewReview {
    pub fn into_review(self, id: i64) -> Review {
        Review {
            id,
            name: self.name,
            rating: self.rating,
            comment: self.comment,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(1).is_ok());
        assert!(Rating::new(5).is_ok());
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert!(Rating::new(-1).is_err());
    }

    #[test]
    fn test_review_serializes_with_frontend_field_names() {
        let review = Review {
            id: 7,
            name: "Alice".to_string(),
            rating: Rating::new(5).unwrap(),
            comment: "Great!".to_string(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["name"], "Alice");
        assert_eq!(value["rating"], 5);
        assert_eq!(value["review"], "Great!");
        assert!(value.get("comment").is_none());
        assert!(value["created_at"].is_string());
    }

    #[test]
    fn test_rating_deserialization_rejects_out_of_range() {
        assert!(serde_json::from_str::<Rating>("4").is_ok());
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }
}

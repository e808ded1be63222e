//! # Domain Models
//!
//! These structs represent the core entities of Rusty-Bazaar.
//! Users, content, messages and ads use UUID v7 for time-ordered identification;
//! ranks are static reference data keyed by a small integer.

use std::fmt;
use std::ops::Add;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// A non-negative rating with one fractional digit, stored as whole tenths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u64);

impl Rating {
    pub const ZERO: Rating = Rating(0);

    pub const fn from_tenths(tenths: u64) -> Self {
        Rating(tenths)
    }

    /// Whole points, e.g. a tier reward of `3` is `Rating::from_points(3)`.
    pub const fn from_points(points: u64) -> Self {
        Rating(points * 10)
    }

    /// Rounds to the nearest tenth. Negative and non-finite input clamps to zero.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Rating::ZERO;
        }
        Rating((value * 10.0).round() as u64)
    }

    pub const fn tenths(self) -> u64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 10.0
    }

    pub fn saturating_mul(self, times: u64) -> Self {
        Rating(self.0.saturating_mul(times))
    }
}

impl Add for Rating {
    type Output = Rating;

    fn add(self, rhs: Rating) -> Rating {
        Rating(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

// On the wire a rating is a plain JSON number (`4.9`), never the tenths count.
impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if value < 0.0 {
            return Err(serde::de::Error::custom("rating cannot be negative"));
        }
        Ok(Rating::from_f64(value))
    }
}

/// Identifier of a seeded rank row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RankId(pub i64);

/// A named tier. `threshold` is the minimum rating required to hold it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub id: RankId,
    pub title: String,
    pub threshold: Rating,
}

/// A (threshold, title) pair used to seed the ranks table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankSeed {
    pub threshold: Rating,
    pub title: String,
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone_number: String,
    pub birthday: Option<NaiveDate>,
    /// Argon2 PHC string, never leaves the server.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub registered_at: DateTime<Utc>,
    pub rating: Rating,
    pub rank_id: RankId,
}

/// Registration payload after the password has been hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone_number: String,
    pub birthday: Option<NaiveDate>,
    pub password_hash: String,
}

/// Partial profile edit; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub phone_number: Option<String>,
}

/// The slice of a user the leaderboard needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingEntry {
    pub user_id: Uuid,
    pub name: String,
    pub surname: String,
    pub rating: Rating,
    pub rank_id: RankId,
}

/// A text blob referenced by exactly one message or advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub id: Uuid,
    pub body: String,
}

/// A directed message. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: Content,
    pub created_at: DateTime<Utc>,
}

/// Everything the store needs to append a message and credit its sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub body: String,
    pub delta: Rating,
}

/// Result of a committed send: the new message and the sender's updated standing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub message: Message,
    pub rating: Rating,
    pub rank: Rank,
}

/// A classified advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advertisement {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub price: i64,
    pub content: Content,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewAdvertisement {
    pub title: String,
    pub price: i64,
    pub content: String,
}

/// Partial ad edit; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AdvertisementUpdate {
    pub title: Option<String>,
    pub price: Option<i64>,
    pub content: Option<String>,
}

impl AdvertisementUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.price.is_none() && self.content.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_displays_one_fraction_digit() {
        assert_eq!(Rating::from_tenths(49).to_string(), "4.9");
        assert_eq!(Rating::from_points(3).to_string(), "3.0");
        assert_eq!(Rating::ZERO.to_string(), "0.0");
    }

    #[test]
    fn rating_from_f64_rounds_to_tenths() {
        assert_eq!(Rating::from_f64(4.94), Rating::from_tenths(49));
        assert_eq!(Rating::from_f64(0.05), Rating::from_tenths(1));
        assert_eq!(Rating::from_f64(-2.0), Rating::ZERO);
        assert_eq!(Rating::from_f64(f64::NAN), Rating::ZERO);
    }

    #[test]
    fn rating_serializes_as_number() {
        let json = serde_json::to_value(Rating::from_tenths(123)).unwrap();
        assert_eq!(json, serde_json::json!(12.3));
        let back: Rating = serde_json::from_value(json).unwrap();
        assert_eq!(back, Rating::from_tenths(123));
        assert!(serde_json::from_value::<Rating>(serde_json::json!(-1.0)).is_err());
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User {
            id: Uuid::now_v7(),
            name: "Ann".into(),
            surname: "Lee".into(),
            email: "ann@example.com".into(),
            phone_number: "+100".into(),
            birthday: None,
            password_hash: "$argon2id$secret".into(),
            registered_at: Utc::now(),
            rating: Rating::ZERO,
            rank_id: RankId(1),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
    }
}

//! Response bodies. Domain types never go over the wire directly.

use bz_core::leaderboard::Standing;
use bz_core::models::{Advertisement, Message, Rating, SendReceipt, User};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Public profile. Contact details appear only when viewing yourself.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub registered_at: DateTime<Utc>,
    pub rating: Rating,
    pub rank: String,
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
}

impl ProfileView {
    pub fn new(user: User, rank: String, position: usize, is_self: bool) -> Self {
        let birthday = if is_self { user.birthday } else { None };
        let (email, phone_number) = if is_self {
            (Some(user.email), Some(user.phone_number))
        } else {
            (None, None)
        };
        Self {
            id: user.id,
            name: user.name,
            surname: user.surname,
            registered_at: user.registered_at,
            rating: user.rating,
            rank,
            position,
            email,
            phone_number,
            birthday,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageView {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageView {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            recipient_id: message.recipient_id,
            content: message.content.body,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SendView {
    pub message: MessageView,
    pub rating: Rating,
    pub rank: String,
}

impl From<SendReceipt> for SendView {
    fn from(receipt: SendReceipt) -> Self {
        Self {
            message: receipt.message.into(),
            rating: receipt.rating,
            rank: receipt.rank.title,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeaderboardRow {
    pub position: usize,
    pub user_id: Uuid,
    pub name: String,
    pub surname: String,
    pub rating: Rating,
    pub rank: String,
}

impl LeaderboardRow {
    pub fn new(standing: Standing, rank: String) -> Self {
        Self {
            position: standing.position,
            user_id: standing.entry.user_id,
            name: standing.entry.name,
            surname: standing.entry.surname,
            rating: standing.entry.rating,
            rank,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdView {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub price: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Advertisement> for AdView {
    fn from(ad: Advertisement) -> Self {
        Self {
            id: ad.id,
            author_id: ad.author_id,
            title: ad.title,
            price: ad.price,
            content: ad.content.body,
            created_at: ad.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bz_core::models::RankId;

    fn user() -> User {
        User {
            id: Uuid::now_v7(),
            name: "Ada".into(),
            surname: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone_number: "+44 20 0000".into(),
            birthday: NaiveDate::from_ymd_opt(1815, 12, 10),
            password_hash: "$argon2id$secret".into(),
            registered_at: Utc::now(),
            rating: Rating::from_tenths(75),
            rank_id: RankId(1),
        }
    }

    #[test]
    fn contact_details_only_for_self() {
        let other = serde_json::to_value(ProfileView::new(user(), "Novice".into(), 3, false)).unwrap();
        assert!(other.get("email").is_none());
        assert!(other.get("phone_number").is_none());
        assert!(other.get("birthday").is_none());
        assert_eq!(other["rating"], serde_json::json!(7.5));
        assert_eq!(other["position"], 3);

        let own = serde_json::to_value(ProfileView::new(user(), "Novice".into(), 3, true)).unwrap();
        assert_eq!(own["email"], "ada@example.com");
        assert!(own.get("password_hash").is_none());
    }
}

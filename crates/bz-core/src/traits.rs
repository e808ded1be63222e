//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.
//! Store handles are created once at startup and passed into each service.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Advertisement, AdvertisementUpdate, Content, Message, MessageDraft, NewAdvertisement,
    NewUser, ProfileUpdate, Rank, RankId, RankSeed, RatingEntry, SendReceipt, User,
};
use crate::rank::RankTable;

/// Persistence contract for user accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Inserts a user with rating 0 holding `rank_id`. Duplicate email is a `Conflict`.
    async fn create_user(&self, user: NewUser, rank_id: RankId) -> Result<User>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User>;

    /// Every user's current rating, in no particular order.
    async fn list_ratings(&self) -> Result<Vec<RatingEntry>>;
}

/// Static rank reference data.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait RankRepo: Send + Sync {
    /// Writes the seed table if the store holds no ranks yet, then returns
    /// whatever ranks are stored.
    async fn seed_ranks(&self, seeds: Vec<RankSeed>) -> Result<Vec<Rank>>;
}

/// Free-standing text blobs referenced by messages and ads.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ContentRepo: Send + Sync {
    async fn create_content(&self, body: String) -> Result<Content>;
    async fn get_content(&self, id: Uuid) -> Result<Option<Content>>;
    /// Replaces the body in place; the id is unchanged.
    async fn replace_content(&self, id: Uuid, body: String) -> Result<Content>;
}

/// The messaging ledger's storage contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MessageRepo: Send + Sync {
    /// In one transaction: verify the recipient, create the content, append the
    /// message, add `draft.delta` to the sender's rating and reassign the
    /// sender's rank from `ranks`. Nothing is visible unless all of it commits.
    ///
    /// Returns `RecipientNotFound`, `NotFound` for a missing sender, or
    /// `Concurrency` when the write lost a race and may be retried.
    async fn record_message(&self, draft: MessageDraft, ranks: &RankTable) -> Result<SendReceipt>;

    /// Messages between `a` and `b` in either direction, oldest first.
    async fn conversation(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>>;

    /// Messages sent or received by `user`, oldest first.
    async fn messages_involving(&self, user: Uuid) -> Result<Vec<Message>>;
}

/// Classified advertisements.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AdRepo: Send + Sync {
    /// Creates the content and the ad referencing it atomically.
    async fn create_ad(&self, author_id: Uuid, ad: NewAdvertisement) -> Result<Advertisement>;
    async fn get_ad(&self, id: Uuid) -> Result<Option<Advertisement>>;
    /// Applies every present field in one transaction. A new body replaces the
    /// text of the ad's existing Content record, keeping its id.
    async fn update_ad(&self, id: Uuid, update: AdvertisementUpdate) -> Result<Advertisement>;
    /// Removes the ad together with its content.
    async fn delete_ad(&self, id: Uuid) -> Result<()>;
    /// Newest first, optionally restricted to one author.
    async fn list_recent_ads(&self, author_id: Option<Uuid>, limit: i64)
        -> Result<Vec<Advertisement>>;
}

/// Identity contract: credential hashing and bearer tokens.
pub trait IdentityProvider: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String>;

    /// Verifies a password against a stored PHC hash.
    fn verify_password(&self, password: &str, hash: &str) -> bool;

    fn issue_token(&self, user_id: Uuid) -> Result<String>;

    /// Returns the user id the token was issued for; `Unauthorized` when the
    /// token is malformed, forged or expired.
    fn verify_token(&self, token: &str) -> Result<Uuid>;
}

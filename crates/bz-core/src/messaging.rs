//! # Messaging Ledger
//!
//! Appends direct messages and credits the sender: every send runs the rating
//! accumulator over the body and hands the store a draft that is committed,
//! together with the sender's new rating and rank, as one unit.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Message, MessageDraft, SendReceipt};
use crate::rank::RankTable;
use crate::rating::TierTable;
use crate::traits::MessageRepo;

pub const DEFAULT_MAX_SEND_ATTEMPTS: u32 = 3;

const RETRY_BACKOFF: Duration = Duration::from_millis(15);

pub struct MessagingLedger {
    messages: Arc<dyn MessageRepo>,
    tiers: TierTable,
    ranks: Arc<RankTable>,
    max_attempts: u32,
}

impl MessagingLedger {
    pub fn new(messages: Arc<dyn MessageRepo>, tiers: TierTable, ranks: Arc<RankTable>) -> Self {
        Self {
            messages,
            tiers,
            ranks,
            max_attempts: DEFAULT_MAX_SEND_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Sends `body` from `sender_id` to `recipient_id`.
    ///
    /// Messaging yourself is allowed. Conflicting concurrent writes are retried
    /// up to `max_attempts` times before `Concurrency` reaches the caller.
    pub async fn send(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        body: &str,
    ) -> Result<SendReceipt> {
        if body.is_empty() {
            return Err(AppError::EmptyContent);
        }

        let draft = MessageDraft {
            sender_id,
            recipient_id,
            body: body.to_string(),
            delta: self.tiers.accumulate_text(body),
        };

        let mut attempt = 1;
        loop {
            match self.messages.record_message(draft.clone(), &self.ranks).await {
                Ok(receipt) => {
                    log::debug!(
                        "message {} from {} to {}: +{} -> {} ({})",
                        receipt.message.id,
                        sender_id,
                        recipient_id,
                        draft.delta,
                        receipt.rating,
                        receipt.rank.title
                    );
                    return Ok(receipt);
                }
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    log::warn!(
                        "send from {} conflicted (attempt {}/{}): {}",
                        sender_id,
                        attempt,
                        self.max_attempts,
                        err
                    );
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Both directions between `a` and `b`, oldest first.
    pub async fn history(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>> {
        self.messages.conversation(a, b).await
    }

    /// The latest message per conversation partner, newest conversation first.
    pub async fn inbox_summary(&self, user_id: Uuid) -> Result<Vec<Message>> {
        let messages = self.messages.messages_involving(user_id).await?;
        Ok(summarize_inbox(user_id, messages))
    }
}

/// Groups `messages` by the other party and keeps the most recent one of each.
pub fn summarize_inbox(user_id: Uuid, messages: impl IntoIterator<Item = Message>) -> Vec<Message> {
    let mut latest: HashMap<Uuid, Message> = HashMap::new();

    for message in messages {
        let partner = if message.sender_id == user_id {
            message.recipient_id
        } else if message.recipient_id == user_id {
            message.sender_id
        } else {
            continue;
        };

        match latest.get(&partner) {
            Some(kept) if (kept.created_at, kept.id) >= (message.created_at, message.id) => {}
            _ => {
                latest.insert(partner, message);
            }
        }
    }

    let mut summary: Vec<Message> = latest.into_values().collect();
    summary.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
    summary
}

use async_trait::async_trait;
use bz_core::error::{AppError, Result};
use bz_core::models::{Content, Message, MessageDraft, SendReceipt};
use bz_core::rank::RankTable;
use bz_core::traits::MessageRepo;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::contents::insert_content;
use crate::{blob_to_uuid, db_err, i64_to_rating, rating_to_i64, uuid_to_blob, SqliteStore};

const MESSAGE_SELECT: &str = "SELECT m.id, m.sender_id, m.recipient_id, m.created_at, \
                              c.id AS content_id, c.body \
                              FROM messages m JOIN contents c ON c.id = m.content_id";

fn message_from_row(row: &SqliteRow) -> Result<Message> {
    let blob = |column: &str| -> Result<Uuid> {
        blob_to_uuid(row.try_get::<Vec<u8>, _>(column).map_err(db_err)?.as_slice())
    };
    Ok(Message {
        id: blob("id")?,
        sender_id: blob("sender_id")?,
        recipient_id: blob("recipient_id")?,
        content: Content {
            id: blob("content_id")?,
            body: row.try_get("body").map_err(db_err)?,
        },
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

#[async_trait]
impl MessageRepo for SqliteStore {
    /// Atomic send: content, message, rating and rank commit together.
    ///
    /// # Developer Note
    /// The rating is incremented in SQL (`rating_tenths + ?`), never
    /// read-modify-written in Rust. The transaction takes the write lock up
    /// front, so concurrent senders queue on `busy_timeout`; one that still
    /// times out surfaces as `Concurrency`.
    async fn record_message(&self, draft: MessageDraft, ranks: &RankTable) -> Result<SendReceipt> {
        let mut tx = self.begin_write().await?;

        let recipient: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = ?")
            .bind(uuid_to_blob(draft.recipient_id))
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?;
        if recipient.is_none() {
            return Err(AppError::RecipientNotFound(draft.recipient_id));
        }

        let sender: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = ?")
            .bind(uuid_to_blob(draft.sender_id))
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?;
        if sender.is_none() {
            return Err(AppError::not_found("User", draft.sender_id));
        }

        // 1. Content before the message that references it
        let content = insert_content(&mut *tx, &draft.body).await?;

        // 2. Append the message
        let message = Message {
            id: Uuid::now_v7(),
            sender_id: draft.sender_id,
            recipient_id: draft.recipient_id,
            content,
            created_at: Utc::now(),
        };
        sqlx::query(
            "INSERT INTO messages (id, sender_id, recipient_id, content_id, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(message.id))
        .bind(uuid_to_blob(message.sender_id))
        .bind(uuid_to_blob(message.recipient_id))
        .bind(uuid_to_blob(message.content.id))
        .bind(message.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        // 3. Credit the sender
        let tenths: i64 = sqlx::query_scalar(
            "UPDATE users SET rating_tenths = rating_tenths + ? WHERE id = ? RETURNING rating_tenths",
        )
        .bind(rating_to_i64(draft.delta)?)
        .bind(uuid_to_blob(draft.sender_id))
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;
        let rating = i64_to_rating(tenths);

        // 4. Full reassignment, not a promotion step
        let rank = ranks.classify(rating).clone();
        sqlx::query("UPDATE users SET rank_id = ? WHERE id = ?")
            .bind(rank.id.0)
            .bind(uuid_to_blob(draft.sender_id))
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(SendReceipt {
            message,
            rating,
            rank,
        })
    }

    async fn conversation(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>> {
        let rows = sqlx::query(&format!(
            "{MESSAGE_SELECT} \
             WHERE (m.sender_id = ? AND m.recipient_id = ?) \
                OR (m.sender_id = ? AND m.recipient_id = ?) \
             ORDER BY m.created_at ASC, m.id ASC"
        ))
        .bind(uuid_to_blob(a))
        .bind(uuid_to_blob(b))
        .bind(uuid_to_blob(b))
        .bind(uuid_to_blob(a))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(message_from_row).collect()
    }

    async fn messages_involving(&self, user: Uuid) -> Result<Vec<Message>> {
        let rows = sqlx::query(&format!(
            "{MESSAGE_SELECT} \
             WHERE m.sender_id = ? OR m.recipient_id = ? \
             ORDER BY m.created_at ASC, m.id ASC"
        ))
        .bind(uuid_to_blob(user))
        .bind(uuid_to_blob(user))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(message_from_row).collect()
    }
}

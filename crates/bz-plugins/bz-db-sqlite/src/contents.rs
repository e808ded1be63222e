use async_trait::async_trait;
use bz_core::error::{AppError, Result};
use bz_core::models::Content;
use bz_core::traits::ContentRepo;
use sqlx::{Executor, Row, Sqlite};
use uuid::Uuid;

use crate::{db_err, uuid_to_blob, SqliteStore};

/// Inserts a content row on any executor, so messages and ads can create
/// their content inside their own transaction.
pub(crate) async fn insert_content<'e, E>(executor: E, body: &str) -> Result<Content>
where
    E: Executor<'e, Database = Sqlite>,
{
    let content = Content {
        id: Uuid::now_v7(),
        body: body.to_string(),
    };
    sqlx::query("INSERT INTO contents (id, body) VALUES (?, ?)")
        .bind(uuid_to_blob(content.id))
        .bind(&content.body)
        .execute(executor)
        .await
        .map_err(db_err)?;
    Ok(content)
}

#[async_trait]
impl ContentRepo for SqliteStore {
    async fn create_content(&self, body: String) -> Result<Content> {
        insert_content(&self.pool, &body).await
    }

    async fn get_content(&self, id: Uuid) -> Result<Option<Content>> {
        let row = sqlx::query("SELECT body FROM contents WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => Ok(Some(Content {
                id,
                body: row.try_get("body").map_err(db_err)?,
            })),
            None => Ok(None),
        }
    }

    async fn replace_content(&self, id: Uuid, body: String) -> Result<Content> {
        let result = sqlx::query("UPDATE contents SET body = ? WHERE id = ?")
            .bind(&body)
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Content", id));
        }
        Ok(Content { id, body })
    }
}

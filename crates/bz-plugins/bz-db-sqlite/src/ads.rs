use async_trait::async_trait;
use bz_core::error::{AppError, Result};
use bz_core::models::{Advertisement, AdvertisementUpdate, Content, NewAdvertisement};
use bz_core::traits::AdRepo;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::contents::insert_content;
use crate::{blob_to_uuid, db_err, uuid_to_blob, SqliteStore};

const AD_SELECT: &str = "SELECT a.id, a.author_id, a.title, a.price, a.created_at, \
                         c.id AS content_id, c.body \
                         FROM advertisements a JOIN contents c ON c.id = a.content_id";

fn ad_from_row(row: &SqliteRow) -> Result<Advertisement> {
    let blob = |column: &str| -> Result<Uuid> {
        blob_to_uuid(row.try_get::<Vec<u8>, _>(column).map_err(db_err)?.as_slice())
    };
    Ok(Advertisement {
        id: blob("id")?,
        author_id: blob("author_id")?,
        title: row.try_get("title").map_err(db_err)?,
        price: row.try_get("price").map_err(db_err)?,
        content: Content {
            id: blob("content_id")?,
            body: row.try_get("body").map_err(db_err)?,
        },
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

#[async_trait]
impl AdRepo for SqliteStore {
    async fn create_ad(&self, author_id: Uuid, ad: NewAdvertisement) -> Result<Advertisement> {
        let mut tx = self.begin_write().await?;

        let content = insert_content(&mut *tx, &ad.content).await?;
        let created = Advertisement {
            id: Uuid::now_v7(),
            author_id,
            title: ad.title,
            price: ad.price,
            content,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO advertisements (id, author_id, title, price, content_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(created.id))
        .bind(uuid_to_blob(author_id))
        .bind(&created.title)
        .bind(created.price)
        .bind(uuid_to_blob(created.content.id))
        .bind(created.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(created)
    }

    async fn get_ad(&self, id: Uuid) -> Result<Option<Advertisement>> {
        let row = sqlx::query(&format!("{AD_SELECT} WHERE a.id = ?"))
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.as_ref().map(ad_from_row).transpose()
    }

    async fn update_ad(&self, id: Uuid, update: AdvertisementUpdate) -> Result<Advertisement> {
        let mut tx = self.begin_write().await?;

        let content_id: Option<Vec<u8>> =
            sqlx::query_scalar("SELECT content_id FROM advertisements WHERE id = ?")
                .bind(uuid_to_blob(id))
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err)?;
        let Some(content_id) = content_id else {
            return Err(AppError::not_found("Advertisement", id));
        };

        if let Some(body) = &update.content {
            sqlx::query("UPDATE contents SET body = ? WHERE id = ?")
                .bind(body)
                .bind(content_id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }
        sqlx::query(
            "UPDATE advertisements SET title = COALESCE(?, title), price = COALESCE(?, price) \
             WHERE id = ?",
        )
        .bind(update.title)
        .bind(update.price)
        .bind(uuid_to_blob(id))
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        let row = sqlx::query(&format!("{AD_SELECT} WHERE a.id = ?"))
            .bind(uuid_to_blob(id))
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err)?;
        let updated = ad_from_row(&row)?;

        tx.commit().await.map_err(db_err)?;
        Ok(updated)
    }

    async fn delete_ad(&self, id: Uuid) -> Result<()> {
        let mut tx = self.begin_write().await?;

        let content_id: Option<Vec<u8>> =
            sqlx::query_scalar("SELECT content_id FROM advertisements WHERE id = ?")
                .bind(uuid_to_blob(id))
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err)?;
        let Some(content_id) = content_id else {
            return Err(AppError::not_found("Advertisement", id));
        };

        sqlx::query("DELETE FROM advertisements WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        sqlx::query("DELETE FROM contents WHERE id = ?")
            .bind(content_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn list_recent_ads(
        &self,
        author_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<Advertisement>> {
        let author = author_id.map(uuid_to_blob);
        let rows = sqlx::query(&format!(
            "{AD_SELECT} WHERE (? IS NULL OR a.author_id = ?) \
             ORDER BY a.created_at DESC, a.id DESC LIMIT ?"
        ))
        .bind(author.clone())
        .bind(author)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(ad_from_row).collect()
    }
}

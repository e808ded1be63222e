use async_trait::async_trait;
use bz_core::error::Result;
use bz_core::models::{Rank, RankId, RankSeed};
use bz_core::traits::RankRepo;
use sqlx::Row;

use crate::{db_err, i64_to_rating, rating_to_i64, SqliteStore};

#[async_trait]
impl RankRepo for SqliteStore {
    /// Seeds only an empty table; an already seeded store keeps its ranks.
    async fn seed_ranks(&self, mut seeds: Vec<RankSeed>) -> Result<Vec<Rank>> {
        let mut tx = self.begin_write().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ranks")
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err)?;

        if existing == 0 {
            seeds.sort_by_key(|seed| seed.threshold);
            for seed in &seeds {
                sqlx::query("INSERT INTO ranks (title, threshold_tenths) VALUES (?, ?)")
                    .bind(&seed.title)
                    .bind(rating_to_i64(seed.threshold)?)
                    .execute(&mut *tx)
                    .await
                    .map_err(db_err)?;
            }
            log::info!("seeded {} ranks", seeds.len());
        }

        let rows = sqlx::query("SELECT id, title, threshold_tenths FROM ranks ORDER BY threshold_tenths ASC")
            .fetch_all(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;

        rows.iter()
            .map(|row| {
                Ok(Rank {
                    id: RankId(row.try_get("id").map_err(db_err)?),
                    title: row.try_get("title").map_err(db_err)?,
                    threshold: i64_to_rating(row.try_get("threshold_tenths").map_err(db_err)?),
                })
            })
            .collect()
    }
}

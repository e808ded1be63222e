use async_trait::async_trait;
use bz_core::error::{AppError, Result};
use bz_core::models::{NewUser, ProfileUpdate, RankId, Rating, RatingEntry, User};
use bz_core::traits::UserRepo;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::{blob_to_uuid, db_err, i64_to_rating, uuid_to_blob, SqliteStore};

const USER_COLUMNS: &str = "id, name, surname, email, phone_number, birthday, password_hash, \
                            registered_at, rating_tenths, rank_id";

fn user_from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: blob_to_uuid(row.try_get::<Vec<u8>, _>("id").map_err(db_err)?.as_slice())?,
        name: row.try_get("name").map_err(db_err)?,
        surname: row.try_get("surname").map_err(db_err)?,
        email: row.try_get("email").map_err(db_err)?,
        phone_number: row.try_get("phone_number").map_err(db_err)?,
        birthday: row.try_get("birthday").map_err(db_err)?,
        password_hash: row.try_get("password_hash").map_err(db_err)?,
        registered_at: row.try_get("registered_at").map_err(db_err)?,
        rating: i64_to_rating(row.try_get("rating_tenths").map_err(db_err)?),
        rank_id: RankId(row.try_get("rank_id").map_err(db_err)?),
    })
}

#[async_trait]
impl UserRepo for SqliteStore {
    async fn create_user(&self, user: NewUser, rank_id: RankId) -> Result<User> {
        let created = User {
            id: Uuid::now_v7(),
            name: user.name,
            surname: user.surname,
            email: user.email,
            phone_number: user.phone_number,
            birthday: user.birthday,
            password_hash: user.password_hash,
            registered_at: Utc::now(),
            rating: Rating::ZERO,
            rank_id,
        };

        sqlx::query(
            "INSERT INTO users (id, name, surname, email, phone_number, birthday, password_hash, \
             registered_at, rating_tenths, rank_id) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?)",
        )
        .bind(uuid_to_blob(created.id))
        .bind(&created.name)
        .bind(&created.surname)
        .bind(&created.email)
        .bind(&created.phone_number)
        .bind(created.birthday)
        .bind(&created.password_hash)
        .bind(created.registered_at)
        .bind(rank_id.0)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(created)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User> {
        let result = sqlx::query(
            "UPDATE users SET name = COALESCE(?, name), surname = COALESCE(?, surname), \
             birthday = COALESCE(?, birthday), phone_number = COALESCE(?, phone_number) \
             WHERE id = ?",
        )
        .bind(update.name)
        .bind(update.surname)
        .bind(update.birthday)
        .bind(update.phone_number)
        .bind(uuid_to_blob(id))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User", id));
        }
        self.get_user(id)
            .await?
            .ok_or_else(|| AppError::not_found("User", id))
    }

    async fn list_ratings(&self) -> Result<Vec<RatingEntry>> {
        let rows = sqlx::query("SELECT id, name, surname, rating_tenths, rank_id FROM users")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter()
            .map(|row| {
                Ok(RatingEntry {
                    user_id: blob_to_uuid(
                        row.try_get::<Vec<u8>, _>("id").map_err(db_err)?.as_slice(),
                    )?,
                    name: row.try_get("name").map_err(db_err)?,
                    surname: row.try_get("surname").map_err(db_err)?,
                    rating: i64_to_rating(row.try_get("rating_tenths").map_err(db_err)?),
                    rank_id: RankId(row.try_get("rank_id").map_err(db_err)?),
                })
            })
            .collect()
    }
}

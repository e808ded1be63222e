//! # Accounts
//!
//! Registration, login and profile edits. New users always start at rating 0
//! holding the floor rank.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{NewUser, ProfileUpdate, User};
use crate::rank::RankTable;
use crate::traits::{IdentityProvider, UserRepo};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Registration payload as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone_number: String,
    pub birthday: Option<NaiveDate>,
    pub password: String,
}

pub struct Accounts {
    users: Arc<dyn UserRepo>,
    identity: Arc<dyn IdentityProvider>,
    ranks: Arc<RankTable>,
}

impl Accounts {
    pub fn new(
        users: Arc<dyn UserRepo>,
        identity: Arc<dyn IdentityProvider>,
        ranks: Arc<RankTable>,
    ) -> Self {
        Self {
            users,
            identity,
            ranks,
        }
    }

    pub async fn register(&self, account: NewAccount) -> Result<User> {
        let name = required("name", &account.name)?;
        let surname = required("surname", &account.surname)?;
        let email = required("email", &account.email)?.to_lowercase();
        let phone_number = required("phone_number", &account.phone_number)?;

        if !email.contains('@') {
            return Err(AppError::ValidationError("email is malformed".into()));
        }
        if account.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::ValidationError(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.users.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(format!("email {email} is already registered")));
        }

        let password_hash = self.identity.hash_password(&account.password)?;
        let user = self
            .users
            .create_user(
                NewUser {
                    name,
                    surname,
                    email,
                    phone_number,
                    birthday: account.birthday,
                    password_hash,
                },
                self.ranks.floor().id,
            )
            .await?;

        log::info!("registered user {}", user.id);
        Ok(user)
    }

    /// Exchanges credentials for a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let email = email.trim().to_lowercase();
        let user = self
            .users
            .get_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found("User", &email))?;

        if !self.identity.verify_password(password, &user.password_hash) {
            return Err(AppError::Unauthorized("incorrect password".into()));
        }
        self.identity.issue_token(user.id)
    }

    /// Resolves a bearer token to a user that still exists.
    pub async fn authenticate(&self, token: &str) -> Result<Uuid> {
        let user_id = self.identity.verify_token(token)?;
        match self.users.get_user(user_id).await? {
            Some(user) => Ok(user.id),
            None => Err(AppError::Unauthorized("token owner no longer exists".into())),
        }
    }

    pub async fn get(&self, user_id: Uuid) -> Result<User> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User", user_id))
    }

    /// Blank strings count as "not provided".
    pub async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> Result<User> {
        let update = ProfileUpdate {
            name: non_blank(update.name),
            surname: non_blank(update.surname),
            birthday: update.birthday,
            phone_number: non_blank(update.phone_number),
        };
        if update == ProfileUpdate::default() {
            return Err(AppError::ValidationError("nothing to update".into()));
        }
        self.users.update_profile(user_id, update).await
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

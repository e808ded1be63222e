//! # Leaderboard
//!
//! Positions are derived on every read from the users' current ratings and are
//! never persisted. Order is rating descending; equal ratings fall back to user
//! id ascending, which for v7 ids means earlier registration wins.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Rating, RatingEntry};
use crate::traits::UserRepo;

/// Public listings never return more than this many rows.
pub const MAX_PAGE_SIZE: usize = 100;

/// A user's place in the derived order. `position` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub position: usize,
    pub entry: RatingEntry,
}

/// Sorts entries into leaderboard order and numbers them from 1.
pub fn rank_order(mut entries: Vec<RatingEntry>) -> Vec<Standing> {
    entries.sort_by(|a, b| {
        b.rating
            .cmp(&a.rating)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| Standing {
            position: index + 1,
            entry,
        })
        .collect()
}

/// Scans the ordered board from the top until `user_id` is found.
pub fn position_of(order: &[Standing], user_id: Uuid) -> Option<usize> {
    order
        .iter()
        .find(|standing| standing.entry.user_id == user_id)
        .map(|standing| standing.position)
}

pub struct Leaderboard {
    users: Arc<dyn UserRepo>,
    page_size: usize,
}

impl Leaderboard {
    pub fn new(users: Arc<dyn UserRepo>, page_size: usize) -> Self {
        Self {
            users,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Users with a positive rating, best first, at most one page.
    pub async fn top(&self) -> Result<Vec<Standing>> {
        let order = rank_order(self.users.list_ratings().await?);
        Ok(order
            .into_iter()
            .filter(|standing| standing.entry.rating > Rating::ZERO)
            .take(self.page_size)
            .collect())
    }

    /// 1-based position of `user_id` among all users.
    pub async fn position(&self, user_id: Uuid) -> Result<usize> {
        let order = rank_order(self.users.list_ratings().await?);
        position_of(&order, user_id).ok_or_else(|| AppError::not_found("User", user_id))
    }
}

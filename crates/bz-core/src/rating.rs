//! # Rating Accumulator
//!
//! Converts message length into a rating delta. Tiers are applied greedily from
//! the largest chunk size down; whatever length is left after the smallest tier
//! is credited as `(remaining % 10) / 10`.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Rating;

/// One step of the reward table: every `chunk` characters earn `reward`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub chunk: u64,
    pub reward: Rating,
}

impl Tier {
    pub const fn new(chunk: u64, reward: Rating) -> Self {
        Self { chunk, reward }
    }
}

/// Validated tiers, kept in descending chunk order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl TierTable {
    /// Chunk size 1 is discarded (single characters are covered by the residual).
    /// Zero-sized and duplicate chunks are configuration errors.
    pub fn new(tiers: impl IntoIterator<Item = Tier>) -> Result<Self> {
        let mut tiers: Vec<Tier> = tiers.into_iter().filter(|t| t.chunk != 1).collect();

        if tiers.iter().any(|t| t.chunk == 0) {
            return Err(AppError::Configuration(
                "rating tier with chunk size 0".into(),
            ));
        }

        tiers.sort_by(|a, b| b.chunk.cmp(&a.chunk));
        if let Some(pair) = tiers.windows(2).find(|w| w[0].chunk == w[1].chunk) {
            return Err(AppError::Configuration(format!(
                "duplicate rating tier for chunk size {}",
                pair[0].chunk
            )));
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Rating earned by a text of `length` characters.
    pub fn accumulate(&self, length: u64) -> Rating {
        let mut remaining = length;
        let mut total = Rating::ZERO;

        for tier in &self.tiers {
            let repetitions = remaining / tier.chunk;
            remaining -= repetitions * tier.chunk;
            total = total + tier.reward.saturating_mul(repetitions);
        }

        total + Rating::from_tenths(remaining % 10)
    }

    /// Length is measured in characters, not bytes.
    pub fn accumulate_text(&self, body: &str) -> Rating {
        self.accumulate(body.chars().count() as u64)
    }
}

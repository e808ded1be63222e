//! # Rank Classifier
//!
//! Maps a cumulative rating to the highest rank whose threshold does not
//! exceed it. The table is validated once, so classification cannot fail.

use std::collections::BTreeSet;

use crate::error::{AppError, Result};
use crate::models::{Rank, RankId, Rating};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankTable {
    /// Ascending by threshold; `ranks[0].threshold == Rating::ZERO`.
    ranks: Vec<Rank>,
}

impl RankTable {
    /// Fails with `Configuration` when the table is empty, has duplicate
    /// thresholds, or lacks a floor entry at 0.
    pub fn new(ranks: impl IntoIterator<Item = Rank>) -> Result<Self> {
        let mut ranks: Vec<Rank> = ranks.into_iter().collect();
        ranks.sort_by_key(|r| r.threshold);

        let mut seen = BTreeSet::new();
        for rank in &ranks {
            if !seen.insert(rank.threshold) {
                return Err(AppError::Configuration(format!(
                    "duplicate rank threshold {}",
                    rank.threshold
                )));
            }
        }

        match ranks.first() {
            None => Err(AppError::Configuration("rank table is empty".into())),
            Some(floor) if floor.threshold != Rating::ZERO => Err(AppError::Configuration(
                format!(
                    "rank table has no floor entry: lowest threshold is {} ({})",
                    floor.threshold, floor.title
                ),
            )),
            Some(_) => Ok(Self { ranks }),
        }
    }

    /// The rank every new account starts with.
    pub fn floor(&self) -> &Rank {
        &self.ranks[0]
    }

    pub fn classify(&self, rating: Rating) -> &Rank {
        self.ranks
            .iter()
            .rev()
            .find(|rank| rank.threshold <= rating)
            .unwrap_or_else(|| self.floor())
    }

    pub fn get(&self, id: RankId) -> Option<&Rank> {
        self.ranks.iter().find(|rank| rank.id == id)
    }

    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(id: i64, threshold: u64, title: &str) -> Rank {
        Rank {
            id: RankId(id),
            title: title.into(),
            threshold: Rating::from_points(threshold),
        }
    }

    fn table() -> RankTable {
        RankTable::new(vec![
            rank(3, 50, "Regular"),
            rank(1, 0, "Novice"),
            rank(2, 10, "Apprentice"),
            rank(4, 150, "Veteran"),
        ])
        .unwrap()
    }

    #[test]
    fn picks_highest_threshold_not_above_rating() {
        let table = table();
        assert_eq!(table.classify(Rating::ZERO).title, "Novice");
        assert_eq!(table.classify(Rating::from_tenths(99)).title, "Novice");
        assert_eq!(table.classify(Rating::from_points(10)).title, "Apprentice");
        assert_eq!(table.classify(Rating::from_tenths(499)).title, "Apprentice");
        assert_eq!(table.classify(Rating::from_points(50)).title, "Regular");
        assert_eq!(table.classify(Rating::from_points(10_000)).title, "Veteran");
    }

    #[test]
    fn classification_is_monotonic() {
        let table = table();
        let mut previous = Rating::ZERO;
        for tenths in 0..=2_000 {
            let current = table.classify(Rating::from_tenths(tenths)).threshold;
            assert!(previous <= current, "demoted at {tenths}");
            previous = current;
        }
    }

    #[test]
    fn reclassification_can_demote() {
        let table = table();
        let high = table.classify(Rating::from_points(60)).id;
        let low = table.classify(Rating::from_points(12)).id;
        assert_ne!(high, low);
        assert_eq!(table.get(low).map(|r| r.title.as_str()), Some("Apprentice"));
    }

    #[test]
    fn floor_is_lowest_rank() {
        assert_eq!(table().floor().id, RankId(1));
    }

    #[test]
    fn rejects_table_without_floor() {
        let err = RankTable::new(vec![rank(1, 5, "Member")]).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn rejects_empty_and_duplicate_tables() {
        assert!(RankTable::new(Vec::new()).is_err());
        assert!(RankTable::new(vec![rank(1, 0, "A"), rank(2, 0, "B")]).is_err());
    }
}

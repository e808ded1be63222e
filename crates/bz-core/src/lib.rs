//! rusty-bazaar/crates/bz-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Rusty-Bazaar:
//! the reputation engine (rating tiers, ranks, leaderboard), the messaging
//! ledger that drives it, and the account and classified-ad services.

pub mod accounts;
pub mod ads;
pub mod error;
pub mod leaderboard;
pub mod messaging;
pub mod models;
pub mod rank;
pub mod rating;
pub mod traits;

// Re-exporting for easier access in other crates
pub use accounts::{Accounts, NewAccount};
pub use ads::AdBoard;
pub use error::*;
pub use leaderboard::{Leaderboard, Standing};
pub use messaging::MessagingLedger;
pub use models::*;
pub use rank::RankTable;
pub use rating::{Tier, TierTable};
pub use traits::*;

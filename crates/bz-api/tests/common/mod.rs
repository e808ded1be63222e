use std::sync::Arc;

use actix_web::web;
use bz_api::AppState;
use bz_auth_simple::SimpleIdentityProvider;
use bz_core::accounts::{Accounts, NewAccount};
use bz_core::ads::AdBoard;
use bz_core::leaderboard::Leaderboard;
use bz_core::messaging::MessagingLedger;
use bz_core::models::{RankSeed, Rating};
use bz_core::rank::RankTable;
use bz_core::rating::{Tier, TierTable};
use bz_core::traits::RankRepo;
use bz_db_sqlite::SqliteStore;
use uuid::Uuid;

pub async fn state() -> web::Data<AppState> {
    let store = Arc::new(SqliteStore::new("sqlite::memory:").await.unwrap());
    let seeds = [(0, "Novice"), (5, "Apprentice"), (50, "Regular")]
        .into_iter()
        .map(|(points, title)| RankSeed {
            threshold: Rating::from_points(points),
            title: title.to_string(),
        })
        .collect();
    let ranks = Arc::new(RankTable::new(store.seed_ranks(seeds).await.unwrap()).unwrap());
    let tiers = TierTable::new([
        Tier::new(500, Rating::from_points(10)),
        Tier::new(250, Rating::from_points(5)),
        Tier::new(100, Rating::from_points(3)),
        Tier::new(50, Rating::from_points(2)),
        Tier::new(10, Rating::from_points(1)),
    ])
    .unwrap();
    let identity = Arc::new(SimpleIdentityProvider::new(
        "integration-test-secret",
        chrono::Duration::minutes(10),
    ));

    web::Data::new(AppState {
        accounts: Accounts::new(store.clone(), identity, ranks.clone()),
        ledger: MessagingLedger::new(store.clone(), tiers, ranks.clone()),
        leaderboard: Leaderboard::new(store.clone(), 100),
        ads: AdBoard::new(store.clone(), store),
        ranks,
    })
}

pub fn account(name: &str) -> NewAccount {
    NewAccount {
        name: name.to_string(),
        surname: "Tester".into(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone_number: "+1 555 0100".into(),
        birthday: None,
        password: "correct horse battery".into(),
    }
}

/// Registers through the service layer and returns `(id, bearer header value)`.
pub async fn user(state: &web::Data<AppState>, name: &str) -> (Uuid, String) {
    let account = account(name);
    let email = account.email.clone();
    let password = account.password.clone();
    let user = state.accounts.register(account).await.unwrap();
    let token = state.accounts.login(&email, &password).await.unwrap();
    (user.id, format!("Bearer {token}"))
}

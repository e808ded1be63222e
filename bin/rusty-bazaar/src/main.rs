//! # Rusty-Bazaar Binary
//!
//! The entry point that assembles the application based on compile-time features.

mod settings;

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use bz_api::middleware::{cors_policy, standard_middleware};
use bz_api::{configure_routes, AppState};
use bz_core::accounts::Accounts;
use bz_core::ads::AdBoard;
use bz_core::leaderboard::Leaderboard;
use bz_core::messaging::MessagingLedger;
use bz_core::rank::RankTable;
use bz_core::traits::RankRepo;
use secrecy::ExposeSecret;

use crate::settings::Settings;

#[cfg(feature = "db-sqlite")]
use bz_db_sqlite::SqliteStore;

#[cfg(feature = "auth-simple")]
use bz_auth_simple::SimpleIdentityProvider;

#[cfg(not(all(feature = "db-sqlite", feature = "auth-simple")))]
compile_error!("rusty-bazaar needs a store plugin (db-sqlite) and an identity plugin (auth-simple)");

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::load()?;

    // 1. Open the store and make sure the rank table exists
    let store = Arc::new(
        SqliteStore::new(&settings.database.url)
            .await
            .with_context(|| format!("failed to open database {}", settings.database.url))?,
    );
    let ranks = store
        .seed_ranks(settings.ranks.clone())
        .await
        .context("failed to seed ranks")?;
    let ranks = Arc::new(RankTable::new(ranks).context("invalid rank table")?);
    let tiers = settings.tier_table()?;

    // 2. Identity
    let identity = Arc::new(SimpleIdentityProvider::new(
        settings.auth.token_secret.expose_secret(),
        settings.token_ttl(),
    ));

    // 3. Services, each holding its own handle to the store
    let state = web::Data::new(AppState {
        accounts: Accounts::new(store.clone(), identity, ranks.clone()),
        ledger: MessagingLedger::new(store.clone(), tiers, ranks.clone())
            .with_max_attempts(settings.messaging.max_send_attempts),
        leaderboard: Leaderboard::new(store.clone(), settings.leaderboard.page_size),
        ads: AdBoard::new(store.clone(), store.clone()),
        ranks,
    });

    let (host, port) = settings.bind_address();
    log::info!("Rusty-Bazaar starting on http://{}:{}", host, port);

    let served = HttpServer::new(move || {
        App::new()
            .wrap(standard_middleware())
            .wrap(cors_policy())
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))
    .with_context(|| format!("failed to bind {host}:{port}"))?
    .run()
    .await;

    store.close().await;
    log::info!("Rusty-Bazaar stopped");
    served.context("server error")
}

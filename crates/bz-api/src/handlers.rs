//! # bz-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the core services.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use bz_core::accounts::{Accounts, NewAccount};
use bz_core::ads::AdBoard;
use bz_core::error::AppError;
use bz_core::leaderboard::Leaderboard;
use bz_core::messaging::MessagingLedger;
use bz_core::models::{AdvertisementUpdate, NewAdvertisement, ProfileUpdate, RankId, Rating};
use bz_core::rank::RankTable;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::views::{AdView, LeaderboardRow, MessageView, ProfileView, SendView, TokenResponse};

type Reply = Result<HttpResponse, ApiError>;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub accounts: Accounts,
    pub ledger: MessagingLedger,
    pub leaderboard: Leaderboard,
    pub ads: AdBoard,
    pub ranks: Arc<RankTable>,
}

impl AppState {
    /// Title for a stored rank id, falling back to classifying the rating.
    fn rank_title(&self, rank_id: RankId, rating: Rating) -> String {
        self.ranks
            .get(rank_id)
            .unwrap_or_else(|| self.ranks.classify(rating))
            .title
            .clone()
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub content: String,
}

pub async fn register(data: web::Data<AppState>, body: web::Json<NewAccount>) -> Reply {
    let user = data.accounts.register(body.into_inner()).await?;
    let rank = data.rank_title(user.rank_id, user.rating);
    let position = data.leaderboard.position(user.id).await?;
    Ok(HttpResponse::Created().json(ProfileView::new(user, rank, position, true)))
}

pub async fn login(data: web::Data<AppState>, body: web::Json<LoginRequest>) -> Reply {
    let token = data.accounts.login(&body.email, &body.password).await?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

pub async fn get_profile(
    data: web::Data<AppState>,
    viewer: CurrentUser,
    path: web::Path<Uuid>,
) -> Reply {
    let user_id = path.into_inner();
    let user = data.accounts.get(user_id).await?;
    let rank = data.rank_title(user.rank_id, user.rating);
    let position = data.leaderboard.position(user_id).await?;
    let is_self = viewer.0 == user_id;
    Ok(HttpResponse::Ok().json(ProfileView::new(user, rank, position, is_self)))
}

pub async fn update_profile(
    data: web::Data<AppState>,
    viewer: CurrentUser,
    body: web::Json<ProfileUpdate>,
) -> Reply {
    let user = data.accounts.update_profile(viewer.0, body.into_inner()).await?;
    let rank = data.rank_title(user.rank_id, user.rating);
    let position = data.leaderboard.position(user.id).await?;
    Ok(HttpResponse::Ok().json(ProfileView::new(user, rank, position, true)))
}

pub async fn send_message(
    data: web::Data<AppState>,
    sender: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<SendMessageRequest>,
) -> Reply {
    let receipt = data
        .ledger
        .send(sender.0, path.into_inner(), &body.content)
        .await?;
    Ok(HttpResponse::Created().json(SendView::from(receipt)))
}

/// Conversation with one partner. An empty conversation is a 404.
pub async fn history(
    data: web::Data<AppState>,
    viewer: CurrentUser,
    path: web::Path<Uuid>,
) -> Reply {
    let partner = path.into_inner();
    let messages = data.ledger.history(viewer.0, partner).await?;
    if messages.is_empty() {
        return Err(AppError::not_found("Conversation", partner).into());
    }
    let messages: Vec<MessageView> = messages.into_iter().map(MessageView::from).collect();
    Ok(HttpResponse::Ok().json(messages))
}

pub async fn inbox(data: web::Data<AppState>, viewer: CurrentUser) -> Reply {
    let latest = data.ledger.inbox_summary(viewer.0).await?;
    let latest: Vec<MessageView> = latest.into_iter().map(MessageView::from).collect();
    Ok(HttpResponse::Ok().json(latest))
}

pub async fn leaderboard(data: web::Data<AppState>) -> Reply {
    let rows: Vec<LeaderboardRow> = data
        .leaderboard
        .top()
        .await?
        .into_iter()
        .map(|standing| {
            let rank = data.rank_title(standing.entry.rank_id, standing.entry.rating);
            LeaderboardRow::new(standing, rank)
        })
        .collect();
    Ok(HttpResponse::Ok().json(rows))
}

pub async fn recent_ads(data: web::Data<AppState>, _viewer: CurrentUser) -> Reply {
    let ads: Vec<AdView> = data.ads.recent().await?.into_iter().map(AdView::from).collect();
    Ok(HttpResponse::Ok().json(ads))
}

pub async fn user_ads(
    data: web::Data<AppState>,
    _viewer: CurrentUser,
    path: web::Path<Uuid>,
) -> Reply {
    let ads: Vec<AdView> = data
        .ads
        .by_author(path.into_inner())
        .await?
        .into_iter()
        .map(AdView::from)
        .collect();
    Ok(HttpResponse::Ok().json(ads))
}

pub async fn create_ad(
    data: web::Data<AppState>,
    author: CurrentUser,
    body: web::Json<NewAdvertisement>,
) -> Reply {
    let ad = data.ads.create(author.0, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(AdView::from(ad)))
}

pub async fn edit_ad(
    data: web::Data<AppState>,
    actor: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<AdvertisementUpdate>,
) -> Reply {
    let ad = data
        .ads
        .edit(actor.0, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(AdView::from(ad)))
}

pub async fn delete_ad(
    data: web::Data<AppState>,
    actor: CurrentUser,
    path: web::Path<Uuid>,
) -> Reply {
    data.ads.delete(actor.0, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

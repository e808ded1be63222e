//! Request authentication.
//!
//! A token is accepted from `Authorization: Bearer <token>` or from the
//! `x-access-token` query parameter.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use bz_core::error::AppError;
use futures_util::future::LocalBoxFuture;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::AppState;

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

#[derive(Deserialize)]
struct TokenQuery {
    #[serde(rename = "x-access-token")]
    token: Option<String>,
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn query_token(req: &HttpRequest) -> Option<String> {
    web::Query::<TokenQuery>::from_query(req.query_string())
        .ok()?
        .into_inner()
        .token
        .filter(|token| !token.is_empty())
}

impl FromRequest for CurrentUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = bearer_token(req).or_else(|| query_token(req));
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let state = state
                .ok_or_else(|| AppError::Internal("application state is not registered".into()))?;
            let token =
                token.ok_or_else(|| AppError::Unauthorized("a valid token is missing".into()))?;
            let user_id = state.accounts.authenticate(&token).await?;
            Ok(CurrentUser(user_id))
        })
    }
}

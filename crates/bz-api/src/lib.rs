//! # bz-api
//!
//! The JSON routing layer for Rusty-Bazaar.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod views;

use actix_web::{error::JsonPayloadError, error::PathError, web, HttpRequest};
use bz_core::error::AppError;

pub use auth::CurrentUser;
pub use error::ApiError;
pub use handlers::AppState;

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError(AppError::ValidationError(format!("malformed request body: {err}"))).into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError(AppError::ValidationError(format!("malformed path: {err}"))).into()
}

/// Mounts every endpoint under `/api`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .app_data(web::PathConfig::default().error_handler(path_error))
            .route("/register", web::post().to(handlers::register))
            .route("/login", web::post().to(handlers::login))
            .route("/users", web::put().to(handlers::update_profile))
            .route("/users/{id}", web::get().to(handlers::get_profile))
            .route("/users/{id}/ads", web::get().to(handlers::user_ads))
            .route("/messages", web::get().to(handlers::inbox))
            .service(
                web::resource("/messages/{user_id}")
                    .route(web::get().to(handlers::history))
                    .route(web::post().to(handlers::send_message)),
            )
            .route("/leaderboard", web::get().to(handlers::leaderboard))
            .service(
                web::resource("/ads")
                    .route(web::get().to(handlers::recent_ads))
                    .route(web::post().to(handlers::create_ad)),
            )
            .service(
                web::resource("/ads/{id}")
                    .route(web::put().to(handlers::edit_ad))
                    .route(web::delete().to(handlers::delete_ad)),
            ),
    );
}

//! REST API routes.

pub mod accounts;
pub mod health;
pub mod loans;
pub mod payouts;
pub mod postings;
pub mod tills;

use axum::Router;

use crate::AppState;

/// Assembles all resource routers.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(postings::routes())
        .merge(tills::routes())
        .merge(loans::routes())
        .merge(payouts::routes())
}

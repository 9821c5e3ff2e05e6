//! # Routes
//!
//! Axum router configuration for the checkout views and JSON API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Views:
///   - GET  / - Redirect to the card view
///   - GET  /card, POST /card - Card entry
///   - GET  /wallet, POST /wallet - Wallet entry (context in query string)
///   - GET  /result - Approved / Declined
///
/// - API v1:
///   - POST /api/v1/card - Submit card form
///   - POST /api/v1/wallet - Submit wallet form
///   - GET  /api/v1/result - Outcome for a `success` flag
///   - POST /api/v1/normalize - Normalize a single field value
pub fn create_router(state: AppState) -> Router {
    // Mock gateway: any integrating origin may call the API
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let view_routes = Router::new()
        .route("/", get(handlers::index))
        .route("/card", get(handlers::card_page).post(handlers::card_submit))
        .route("/wallet", get(handlers::wallet_page).post(handlers::wallet_submit))
        .route("/result", get(handlers::result_page));

    let api_routes = Router::new()
        .route("/card", post(handlers::submit_card))
        .route("/wallet", post(handlers::submit_wallet))
        .route("/result", get(handlers::get_result))
        .route("/normalize", post(handlers::normalize));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(view_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

//! # gateway-api
//!
//! HTTP layer for mock-gateway-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - HTML views for the card, wallet and result steps
//! - JSON endpoints driving the same controllers
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/` | Redirect to `/card` |
//! | GET/POST | `/card` | Card entry view |
//! | GET/POST | `/wallet` | Wallet entry view |
//! | GET | `/result` | Result view |
//! | POST | `/api/v1/card` | Submit card form |
//! | POST | `/api/v1/wallet` | Submit wallet form |
//! | GET | `/api/v1/result` | Result outcome |
//! | POST | `/api/v1/normalize` | Normalize a field value |

pub mod handlers;
pub mod pages;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};

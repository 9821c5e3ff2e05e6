//! # Mock Gateway
//!
//! Checkout simulator with card and mobile-wallet flows.
//!
//! ## Usage
//!
//! ```bash
//! # Optional overrides
//! export HOST=0.0.0.0
//! export PORT=8080
//!
//! # Run the server
//! mock-gateway
//! ```

use gateway_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!(
        "Demo order: {} ({} cents)",
        state.gateway.demo_order, state.gateway.demo_amount_cents
    );

    let app = routes::create_router(state);

    info!("Mock gateway starting on http://{}", addr);

    if !is_prod {
        info!("Card checkout: http://{}/card", addr);
        info!(
            "Wallet checkout: http://{}/wallet?wallet_number=01010101010&amount=1",
            addr
        );
        info!("Declined result: http://{}/result?success=false", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Mock Gateway
  ━━━━━━━━━━━━━━━━━━━━━━━
  Checkout simulator
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}

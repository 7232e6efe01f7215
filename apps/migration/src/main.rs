//! Migration CLI tool.
//!
//! Reads `DATABASE_URL` (and `.env`), then runs the sea-orm-migration CLI:
//! `migration up`, `migration down`, `migration status`, `migration fresh`.

use sea_orm_migration::prelude::*;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    init_tracing();

    cli::run_cli(migration::Migrator).await;
}

/// `LOG_FORMAT=json` switches to JSON lines; `RUST_LOG` overrides the filter.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,migration=debug,sea_orm_migration=info"));

    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    tracing::debug!(json_logs, "Tracing initialized");
}

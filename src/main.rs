use chirpy::{config::Config, create_router, db, db::SqliteStore, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chirpy=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Invalid configuration");
    tracing::debug!(?config, "Loaded configuration");

    // Initialize database
    let pool = db::create_db_pool(&config.database_url)
        .await
        .expect("Failed to open database");

    let addr = config.bind_addr.clone();
    let app = create_router(AppState::new(SqliteStore::new(pool), config));

    // run it with hyper
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

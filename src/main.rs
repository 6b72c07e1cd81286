// Yatube server

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use yatube::{app_state::AppState, config::Config, web::create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yatube=info,tower_http=info".into()),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize application state
    let app_state = AppState::new(config.clone()).await?;
    let app = create_router(app_state);

    // Start server
    let addr = config.server_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Yatube listening on http://{}", addr);
    if config.site.debug {
        info!("Debug mode: serving static and media files");
    }

    axum::serve(listener, app).await?;
    Ok(())
}

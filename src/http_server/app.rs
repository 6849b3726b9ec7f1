use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{
    database::Database,
    http_server::{
        error::panic_response,
        http_routes::{artists, home, shows, venues},
        state::AppState,
    },
};

pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    pub database: Database,
}

pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/venues", get(venues::list))
        .route("/venues/search", post(venues::search))
        .route(
            "/venues/create",
            get(venues::create_form).post(venues::create),
        )
        .route("/venues/{id}", get(venues::detail).delete(venues::delete))
        .route(
            "/venues/{id}/edit",
            get(venues::edit_form).post(venues::edit),
        )
        .route("/artists", get(artists::list))
        .route("/artists/search", post(artists::search))
        .route(
            "/artists/create",
            get(artists::create_form).post(artists::create),
        )
        .route("/artists/{id}", get(artists::detail))
        .route(
            "/artists/{id}/edit",
            get(artists::edit_form).post(artists::edit),
        )
        .route("/shows", get(shows::list))
        .route("/shows/create", get(shows::create_form).post(shows::create))
        .fallback(home::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response)),
        )
        .with_state(app_state)
}

pub async fn start(config: HttpServerConfig) -> color_eyre::Result<()> {
    let app_state = Arc::new(AppState {
        db: Arc::new(config.database),
    });

    let app = router(app_state);

    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .wrap_err_with(|| eyre!("Failed to bind to {}", address))?;
    log::info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}

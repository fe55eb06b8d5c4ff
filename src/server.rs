use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::get,
    Router,
};
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers::{classes, root, transactions};
use crate::state::AppState;

/// Full router with middleware, bound to `state`
pub fn app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        // Public
        .route("/", get(root::root).fallback(root::method_not_allowed))
        .route("/health", get(root::health).fallback(root::method_not_allowed))
        .merge(class_routes())
        .merge(transaction_routes())
        .fallback(root::not_found)
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.security)),
        )
        .with_state(state)
}

fn class_routes() -> Router<AppState> {
    use axum::routing::put;

    Router::new()
        .route(
            "/api/classes",
            get(classes::class_list)
                .post(classes::class_create)
                .fallback(root::method_not_allowed),
        )
        .route(
            "/api/classes/:id",
            put(classes::class_update)
                .delete(classes::class_delete)
                .fallback(root::method_not_allowed),
        )
}

fn transaction_routes() -> Router<AppState> {
    Router::new().route(
        "/api/transactions",
        get(transactions::transaction_list).fallback(root::method_not_allowed),
    )
}

/// Any origin unless origins are configured
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Serve until Ctrl+C or SIGTERM, then close the store
pub async fn serve(listener: TcpListener, state: AppState, config: &AppConfig) -> std::io::Result<()> {
    let store = state.store.clone();

    axum::serve(listener, app(state, config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, closing {} store", store.name());
    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

use crate::{
    axum_http::{default_routers, routers},
    config::config_model::DotEnvyConfig,
};
use anyhow::Result;
use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use crates::infra::db::postgres::postgres_connection::PgPoolSquad;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

pub fn app(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<Router> {
    let qr_policy = config.qr_policy;

    let api = Router::new()
        .nest("/prices", routers::prices::routes(Arc::clone(&db_pool)))
        .nest("/customers", routers::customers::routes(Arc::clone(&db_pool)))
        .nest(
            "/qr-codes",
            routers::qr_codes::routes(Arc::clone(&db_pool), qr_policy),
        )
        .nest("/campaigns", routers::campaigns::routes(Arc::clone(&db_pool)))
        .nest("/articles", routers::articles::routes(Arc::clone(&db_pool)))
        .nest("/categories", routers::categories::routes(Arc::clone(&db_pool)))
        .nest("/alerts", routers::alerts::routes(Arc::clone(&db_pool)))
        .nest("/settings", routers::settings::routes(Arc::clone(&db_pool)))
        .route("/health-check", get(default_routers::health_check));

    let admin = Router::new()
        .nest("/auth", routers::admin_auth::routes(Arc::clone(&config)))
        .nest("/prices", routers::prices::admin_routes(Arc::clone(&db_pool)))
        .nest(
            "/custom-prices",
            routers::custom_prices::routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/customers",
            routers::customers::admin_routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/qr-codes",
            routers::qr_codes::admin_routes(Arc::clone(&db_pool), qr_policy),
        )
        .nest(
            "/campaigns",
            routers::campaigns::admin_routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/articles",
            routers::articles::admin_routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/categories",
            routers::categories::admin_routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/settings",
            routers::settings::admin_routes(Arc::clone(&db_pool)),
        );

    let app = Router::new()
        .nest("/api/v1/admin", admin)
        .nest("/api/v1", api)
        .fallback(default_routers::not_found)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.backend_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(cors_layer(&config.backend_server.cors_allowed_origins)?)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let app = app(Arc::clone(&config), db_pool)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "http: backend listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = ?err, "http: failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = ?err, "http: failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("http: received ctrl+c, shutting down"),
        _ = terminate => info!("http: received SIGTERM, shutting down"),
    }
}

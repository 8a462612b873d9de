use axum::{middleware, routing::get, Router};
use domain::services::{NoopNotifier, Notifier};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{emojis, health, messages, praises, sprints, templates, users};
use crate::services::{DiscordNotifier, GiphyClient, MessageComposer, NotificationDispatcher};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub composer: MessageComposer,
    pub dispatcher: NotificationDispatcher,
}

/// Build the router with the chat integrations described by `config`.
pub fn create_app(config: Config, pool: SqlitePool) -> Router {
    let notifier = build_notifier(&config);
    create_app_with_notifier(config, pool, notifier)
}

/// Build the router around an explicit notifier.
pub fn create_app_with_notifier(
    config: Config,
    pool: SqlitePool,
    notifier: Arc<dyn Notifier>,
) -> Router {
    let config = Arc::new(config);

    let composer = MessageComposer::new(pool.clone(), notifier.clone())
        .with_duplicate_suppression(config.composition.suppress_duplicates)
        .with_mentions(
            config.discord.enabled && config.discord.resolve_mentions,
            Duration::from_millis(config.composition.mention_lookup_timeout_ms),
        );
    let dispatcher = NotificationDispatcher::new(notifier, build_gif_client(&config));

    let state = AppState {
        pool,
        config: config.clone(),
        composer,
        dispatcher,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api_routes = Router::new()
        .route("/api/v1/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/v1/users/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/v1/sprints",
            get(sprints::list_sprints).post(sprints::create_sprint),
        )
        .route(
            "/api/v1/sprints/:id",
            get(sprints::get_sprint)
                .patch(sprints::update_sprint)
                .delete(sprints::delete_sprint),
        )
        .route(
            "/api/v1/praises",
            get(praises::list_praises).post(praises::create_praise),
        )
        .route(
            "/api/v1/praises/:id",
            get(praises::get_praise)
                .patch(praises::update_praise)
                .delete(praises::delete_praise),
        )
        .route(
            "/api/v1/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/api/v1/templates/:id",
            get(templates::get_template)
                .patch(templates::update_template)
                .delete(templates::delete_template),
        )
        .route(
            "/api/v1/emojis",
            get(emojis::list_emojis).post(emojis::create_emoji),
        )
        .route(
            "/api/v1/emojis/:id",
            get(emojis::get_emoji)
                .patch(emojis::update_emoji)
                .delete(emojis::delete_emoji),
        )
        .route(
            "/api/v1/messages",
            get(messages::list_messages).post(messages::create_message),
        )
        .route(
            "/api/v1/messages/:id",
            get(messages::get_message)
                .patch(messages::update_message)
                .delete(messages::delete_message),
        );

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}

fn build_notifier(config: &Config) -> Arc<dyn Notifier> {
    if !config.discord.enabled {
        info!("Discord integration disabled");
        return Arc::new(NoopNotifier);
    }

    match DiscordNotifier::new(config.discord.clone()) {
        Ok(notifier) => {
            info!(channel_id = %config.discord.channel_id, "Discord integration enabled");
            Arc::new(notifier)
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize Discord integration");
            Arc::new(NoopNotifier)
        }
    }
}

fn build_gif_client(config: &Config) -> Option<Arc<GiphyClient>> {
    if !config.giphy.enabled {
        return None;
    }

    match GiphyClient::new(config.giphy.clone()) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            error!(error = %e, "Failed to initialize Giphy client");
            None
        }
    }
}

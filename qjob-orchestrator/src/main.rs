use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod resource;
pub mod service;
pub mod store;
pub mod transpile;

use api::AppState;
use config::Config;
use resource::KubeJobClient;
use store::RedisStore;
use transpile::PassthroughTranspiler;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qjob_orchestrator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting QJob Orchestrator...");

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        panic!("Invalid configuration: {e}");
    }

    tracing::info!(
        "Configuration loaded: namespace={}, image={}, payload_ttl={:?}",
        config.namespace,
        config.simulator_image,
        config.payload_ttl
    );

    // Both clients are constructed up front: an unreachable store or cluster
    // API is a startup failure
    let store = RedisStore::connect(&config.redis_url)
        .await
        .expect("Failed to connect to payload store");

    let resources = KubeJobClient::new(&config.namespace)
        .await
        .expect("Failed to initialize cluster API client");

    tracing::info!("Payload store and cluster API clients initialized");

    let bind_addr = config.bind_addr.clone();

    let state = AppState {
        store: Arc::new(store),
        resources: Arc::new(resources),
        transpiler: Arc::new(PassthroughTranspiler),
        config: Arc::new(config),
    };

    let app = api::create_router(state);

    tracing::info!("Listening on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

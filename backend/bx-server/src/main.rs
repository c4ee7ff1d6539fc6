use bx_config::{Config, RateLimitBackend};
use bx_core::{Channel, LiveState, LiveStateWriters};
use bx_ratelimit::{
    FixedWindowLimiter, MemoryRateLimitStore, RateLimitStore, RedisRateLimitStore,
};
use bx_server::{ApiRateLimit, ServerErrorResult, build_router, logger};
use bx_stream::{
    AppState, BridgeRelay, BusSubscriber, HeightFollower, HtmlTxRenderer, HttpPriceSource,
    MempoolCounter, PriceRefresher, RedisBus, RedisStore, RetryConfig, ShutdownCoordinator,
    StreamGroups, StreamSettings,
};

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load and validate configuration
    let config = Config::load()?;
    config.validate()?;

    // Resolve the log file under the config directory
    let log_file_path = match config.log_file_path() {
        Some(relative) => {
            let path = Config::config_dir()?.join(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            Some(path)
        }
        None => None,
    };

    // Initialize logger (before any other logging)
    logger::initialize(
        config.logging.level,
        config.logging.connections,
        log_file_path,
        config.logging.colored,
    )?;

    info!("Starting bx-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let shutdown = ShutdownCoordinator::new();
    let groups = StreamGroups::new(&config.streams);
    let (writers, live) = LiveState::new(0, 0.0);

    spawn_relays(&config, &groups, &shutdown)?;
    spawn_pollers(&config, &groups, writers, &shutdown)?;
    let rate_limit = build_rate_limit(&config)?;

    // Build application state
    let app_state = AppState {
        groups: groups.clone(),
        live,
        shutdown: shutdown.clone(),
        settings: StreamSettings::from(&config.streams),
        renderer: Arc::new(HtmlTxRenderer),
    };

    let app = build_router(app_state, rate_limit);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    let groups_for_signal = groups.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
                groups_for_signal.close_all();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    // Start server with graceful shutdown
    info!("Server ready to accept connections");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown.subscribe_guard().wait().await;
        info!("Graceful shutdown complete");
    })
    .await?;

    Ok(())
}

/// One relay per bus channel, each feeding its group until shutdown.
fn spawn_relays(
    config: &Config,
    groups: &StreamGroups,
    shutdown: &ShutdownCoordinator,
) -> ServerErrorResult<()> {
    let bus: Arc<dyn BusSubscriber> = Arc::new(RedisBus::new(&config.redis.url)?);
    let retry = RetryConfig::from(&config.relay);

    for channel in Channel::BUS_CHANNELS {
        if let Some(relay) = BridgeRelay::for_channel(
            Arc::clone(&bus),
            channel,
            groups.for_channel(channel).clone(),
            retry.clone(),
        ) {
            tokio::spawn(relay.run(shutdown.subscribe_guard()));
        }
    }

    info!("Bridge relays started");
    Ok(())
}

/// Mempool counter, height follower and price refresher, each owning the
/// writer of its live-state cell. Stores connect on first poll.
fn spawn_pollers(
    config: &Config,
    groups: &StreamGroups,
    writers: LiveStateWriters,
    shutdown: &ShutdownCoordinator,
) -> ServerErrorResult<()> {
    let mempool_store = Arc::new(RedisStore::new(&config.redis.url)?);
    let index_store = Arc::new(RedisStore::new(&config.redis.store_url)?);

    let mempool = MempoolCounter::new(
        mempool_store,
        writers.mempool_count,
        Duration::from_millis(config.pollers.mempool_interval_ms),
    );
    tokio::spawn(mempool.run(shutdown.subscribe_guard()));

    let height = HeightFollower::new(
        index_store,
        writers.height,
        RetryConfig::from(&config.relay),
    );
    tokio::spawn(height.run(groups.height.clone(), shutdown.subscribe_guard()));

    let price = PriceRefresher::new(
        Arc::new(HttpPriceSource::new(
            &config.pollers.price_url,
            &config.pollers.price_field,
        )),
        writers.price,
        groups.price.clone(),
        Duration::from_secs(config.pollers.price_interval_secs),
    );
    tokio::spawn(price.run(shutdown.subscribe_guard()));

    info!("Pollers started");
    Ok(())
}

fn build_rate_limit(config: &Config) -> ServerErrorResult<Option<ApiRateLimit>> {
    if !config.rate_limit.enabled {
        warn!("API rate limiting DISABLED");
        return Ok(None);
    }

    let store: Arc<dyn RateLimitStore> = match config.rate_limit.backend {
        RateLimitBackend::Redis => Arc::new(RedisRateLimitStore::new(&config.redis.url)?),
        RateLimitBackend::Memory => {
            warn!("In-memory rate limit counters are per process");
            Arc::new(MemoryRateLimitStore::new())
        }
    };

    let limiter = FixedWindowLimiter::new(
        store,
        bx_ratelimit::RateLimitConfig {
            max_requests: config.rate_limit.max_requests,
            window_secs: config.rate_limit.window_secs,
        },
    )?;

    Ok(Some(ApiRateLimit::new(limiter, config.rate_limit.enforce)))
}

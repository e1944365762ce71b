use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use stockpulse_core::baskets::{BasketService, BasketServiceTrait};
use stockpulse_core::performance::{PerformanceService, PerformanceServiceTrait};
use stockpulse_core::signals::{SignalFeedClient, SignalService, SignalServiceTrait};
use stockpulse_core::stocks::{StockListService, StockListServiceTrait};
use stockpulse_market_data::{MarketDataProvider, YahooProvider};
use stockpulse_storage_sqlite::baskets::BasketRepository;
use stockpulse_storage_sqlite::db;

pub struct AppState {
    pub basket_service: Arc<dyn BasketServiceTrait>,
    pub signal_service: Arc<dyn SignalServiceTrait>,
    pub stock_service: Arc<dyn StockListServiceTrait>,
    pub performance_service: Arc<dyn PerformanceServiceTrait>,
    pub market_data: Arc<dyn MarketDataProvider>,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("SP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer(pool.clone());

    let market_data: Arc<dyn MarketDataProvider> =
        Arc::new(YahooProvider::new().map_err(|e| anyhow::anyhow!(e.to_string()))?);

    let basket_repository = Arc::new(BasketRepository::new(pool.clone(), writer.clone()));
    let basket_service = Arc::new(BasketService::new(basket_repository.clone()));

    let signal_feed = Arc::new(SignalFeedClient::new(&config.signals_api_url));
    let signal_service = Arc::new(SignalService::new(signal_feed, market_data.clone()));

    let stock_service = Arc::new(StockListService::new(
        &config.stock_list_path,
        market_data.clone(),
    ));

    let performance_service = Arc::new(PerformanceService::new(
        basket_repository,
        market_data.clone(),
    ));

    Ok(Arc::new(AppState {
        basket_service,
        signal_service,
        stock_service,
        performance_service,
        market_data,
        db_path,
    }))
}

#[cfg(feature = "mimalloc")]
use mimalloc::MiMalloc;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use actix_web::web::Data;
use actix_web::{App, HttpServer};
use api2_mock::config::Config;
use api2_mock::handler::{cors_headers, routes};
use api2_mock::repository::request_log::RequestLog;
use api2_mock::service::push::PushService;
use helper::init::{get_subscriber, init_subscriber};
use std::sync::Arc;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (subscriber, _guard) = get_subscriber("api2_mock", "info");
    init_subscriber(subscriber)?;

    debug!("Tracing initialized.");

    let config = Config::from_env()?;
    debug!("Loaded {:?}", config);

    let request_log = Arc::new(RequestLog::new(config.log_file.clone()));
    let push = Data::new(PushService::new(request_log, config.variant));

    info!(
        "API2 mock server (variant {}) listening on http://{}:{}",
        config.variant, config.host, config.port
    );
    info!("Push endpoint: POST http://localhost:{}", config.port);
    info!("Expected payload: {}", config.variant.expected_payload());
    info!("Requests are appended to {:?}", config.log_file);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_headers())
            .app_data(Data::clone(&push))
            .configure(routes)
    })
    .bind((config.host, config.port))?
    .run()
    .await?;

    Ok(())
}

use anyhow::Context;
use api2_mock::client::Api2Client;
use api2_mock::model::Variant;
use helper::env_var;
use helper::init::{get_subscriber, init_subscriber};
use std::env::var;
use tracing::{debug, info};

env_var!(API2_URL);
env_var!(ORDER_NUMBER);
env_var!(FILE_URL);
env_var!(API2_VARIANT);

/// Push one order number and file URL to API2, the way the order-fulfilment
/// tool does, and print the raw reply.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (subscriber, _guard) = get_subscriber("api2_push", "info");
    init_subscriber(subscriber)?;

    debug!("Tracing initialized.");

    let url =
        var(API2_URL).with_context(|| format!("Missing {} env var", API2_URL))?;
    let order_number = var(ORDER_NUMBER)
        .with_context(|| format!("Missing {} env var", ORDER_NUMBER))?;
    let file_url =
        var(FILE_URL).with_context(|| format!("Missing {} env var", FILE_URL))?;
    let variant = match var(API2_VARIANT) {
        Ok(raw) => raw.parse::<Variant>().with_context(|| {
            format!("{} was not formatted right", API2_VARIANT)
        })?,
        Err(_) => Variant::default(),
    };

    info!("Pushing order {} to {}", order_number, url);
    let reply = Api2Client::new(url, variant)?
        .push(&order_number, &file_url)
        .await?;
    info!("API2 accepted the push: {}", reply.message);
    println!("{}", reply.body);

    Ok(())
}

use anyhow::Result;
use clap::Parser;
use tracing::info;

use blueprint_prospector::{
    app,
    util::{config::Config, logging, version::version_label},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    logging::init();

    let config = Config::parse().validate()?;
    info!(
        version = %version_label(),
        stations = config.station_ids.len(),
        "starting prospect run"
    );

    let prospects = app::run(&config).await?;
    info!(count = prospects.len(), "prospect run complete");
    Ok(())
}

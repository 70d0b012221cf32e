use log::info;

use crate::app::Gateway;
use crate::config::Config;
use crate::error::Result;

/// Entry point used by `main` to bind the gateway and serve until shutdown.
pub async fn run() -> Result<()> {
    let config = Config::builtin();
    let gateway = Gateway::bind(&config).await?;

    info!(
        "Starting market gateway on {} (static root {})",
        gateway.local_addr()?,
        config.server.static_root.display()
    );
    info!("Proxying market data from {}", config.upstream.base_url);

    gateway.run().await
}

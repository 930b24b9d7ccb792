//! # WPAD Proxy
//!
//! Main entry point: a forward proxy on one loopback port, a management
//! surface on another.

mod bootstrap;
mod di;
mod server;

use clap::Parser;
use std::sync::Arc;
use tracing::info;
use wpadproxy_domain::CliOverrides;

#[derive(Parser)]
#[command(name = "wpadproxy")]
#[command(version)]
#[command(about = "WPAD-aware HTTP/HTTPS forward proxy")]
struct Cli {
    /// Forward-proxy port (default 8080)
    #[arg(long = "proxy")]
    proxy: Option<u16>,

    /// Management port (default 9001)
    #[arg(long = "mgmt")]
    mgmt: Option<u16>,

    /// Optional TOML config file
    #[arg(long = "config")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(
        cli.config.as_deref(),
        CliOverrides {
            proxy_port: cli.proxy,
            mgmt_port: cli.mgmt,
        },
    )?;
    bootstrap::init_logging(&config);

    info!(
        proxy_addr = %config.proxy_addr(),
        mgmt_addr = %config.mgmt_addr(),
        "WPAD proxy starting"
    );

    let context = di::AppContext::build()?;

    info!("Performing initial WPAD discovery");
    context.refresh.execute().await;

    let proxy = server::start_proxy_server(config.proxy_addr(), Arc::clone(&context.proxy_handler));
    let mgmt = server::start_management_server(config.mgmt_addr(), context.api_state());

    tokio::try_join!(proxy, mgmt)?;
    Ok(())
}

//! WTV CLI - Command line explorer for station wind gust time series.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "wtv-cli",
    version,
    about = "Wind gust threshold-crossing map and time series explorer"
)]
struct Cli {
    #[command(subcommand)]
    command: wtv_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("[WTV] cli: {:?}", cli.command);
    wtv_cmd::run(cli.command).await
}

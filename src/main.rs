use clap::Parser;

use chronod::cli::Cli;
use chronod::logger::init_logger;
use chronod::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.into_settings()?;

    init_logger(&settings.logger)?;

    Server::new(settings).run().await
}

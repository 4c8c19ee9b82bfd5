mod cli;
mod pipeline;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};
use pipeline::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ytdlp_gen=info,ytdlp_wrap=info".into())
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from(cli.global);

    tracing::debug!(bin_dir = %config.bin_dir.display(), release_url = %config.release_url, "configuration");

    match cli.command {
        Command::Download(args) => pipeline::download(&config, args).await,
        Command::Parse(args) => pipeline::parse(&config, args).await,
        Command::Generate(args) => pipeline::generate(&config, args).await
    }
}

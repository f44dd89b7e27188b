use clap::Parser;
use parts_forecast::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Train(args) => cli::train::run(args).await,
        Command::Serve(args) => cli::serve::run(args).await,
        Command::Predict(args) => cli::predict::run(args).await,
        Command::Inspect(args) => cli::inspect::run(args).await,
    }
}

use anyhow::Context;
use clap::{Parser, Subcommand};
use prayer_times_bot::packaging::{DeclaredImage, ImageContract};
use prayer_times_bot::utils::logger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dockerfile")]
#[command(about = "Render or verify the bot's container image definition")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the Dockerfile for the image contract (default)
    Render,
    /// Check a Dockerfile against the image contract
    Check {
        #[arg(default_value = "Dockerfile")]
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let contract = ImageContract::default();

    match args.command.unwrap_or(Command::Render) {
        Command::Render => {
            print!("{}", contract.render());
        }
        Command::Check { path } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let image = DeclaredImage::parse(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            tracing::debug!("Declared image: {:?}", image);

            contract.check(&image)?;
            if text != contract.render() {
                tracing::warn!(
                    "⚠️  {} satisfies the contract but differs from the rendered Dockerfile",
                    path.display()
                );
            }
            println!("✅ {} satisfies the image contract", path.display());
        }
    }

    Ok(())
}

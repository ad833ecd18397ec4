//! Bard Console - interactive front end for the playback sequencer

use bard_console::{BotConfig, Console, ConsoleNotifier};
use bard_core::TrackResolver;
use bard_media::{TrackLengths, YtDlpResolver};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bard-console")]
#[command(about = "Bard music queue console", long_about = None)]
struct Cli {
    /// Configuration file path (default: bard.toml if present)
    #[arg(short, long, global = true, env = "BARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read commands from stdin (default)
    Run,
    /// Resolve a query once and print the track as JSON
    Resolve {
        /// URL or search terms
        query: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr, so it never mixes with console replies)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bard_console=info,bard_playback=info,bard_media=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = BotConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(config).await?,
        Commands::Resolve { query } => resolve(config, &query).await?,
    }

    Ok(())
}

async fn run(config: BotConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Bard console");
    tracing::info!("Resolver: {}", config.resolver.program);
    tracing::info!("Guild: {}", config.console.guild_id);

    let lengths = Arc::new(TrackLengths::new());
    let resolver = YtDlpResolver::new(config.resolver.clone()).with_lengths(Arc::clone(&lengths));
    let (notifier, events) = ConsoleNotifier::channel();

    let console = Console::new(&config, Arc::new(resolver), Arc::new(notifier), lengths);

    println!("🎶 Bard is ready. Type `help` for commands.");
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    console.run(stdin, &mut stdout, events).await?;

    Ok(())
}

async fn resolve(config: BotConfig, query: &str) -> anyhow::Result<()> {
    let resolver = YtDlpResolver::new(config.resolver);
    let track = resolver.resolve(query).await?;
    println!("{}", serde_json::to_string_pretty(&track)?);
    Ok(())
}

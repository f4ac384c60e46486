//! Learnloom - study artifacts generated from your own material
//!
//! Command-line front end: run the generation service, ingest content, and
//! build artifacts from it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use learnloom::{
    artifacts::{build_mind_map, FlashDeck, MemoryGame, QuizSession},
    config::LearnConfig,
    content::{extract_text, ContentStore},
    generation::{ArtifactKind, GenerationClient},
    service::ServerBuilder,
    Error,
};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "learnloom")]
#[command(version)]
#[command(about = "Generate quizzes, flash cards, memory games and mind maps from study material")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "LEARNLOOM_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the generation service
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },

    /// Store study content for later generation
    Ingest {
        /// Content text
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,

        /// Read content from a .txt, .md or .docx file
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Generate an artifact from the stored content
    Generate {
        /// Artifact to build
        #[arg(value_enum)]
        mode: Mode,

        /// Number of quiz questions to request
        #[arg(long)]
        count: Option<u32>,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Quiz,
    Memory,
    Mindmap,
    Flashcards,
    All,
}

impl Mode {
    fn kind(self) -> ArtifactKind {
        match self {
            Mode::Quiz | Mode::Flashcards => ArtifactKind::Quiz,
            Mode::Memory => ArtifactKind::Memory,
            Mode::Mindmap | Mode::All => ArtifactKind::All,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("learnloom={},tower_http=debug", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match &cli.config {
        Some(path) => LearnConfig::from_file(path)?,
        None => LearnConfig::default(),
    };

    match cli.command {
        Commands::Serve { host, port } => {
            run_service(config, host, port).await?;
        }
        Commands::Ingest { text, file } => {
            ingest(&config, text, file).await?;
        }
        Commands::Generate { mode, count } => {
            generate(&config, mode, count).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

async fn run_service(config: LearnConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    tracing::info!("Starting Learnloom generation service");

    let mut builder = ServerBuilder::new().config(config);
    if let Some(host) = host {
        builder = builder.host(host);
    }
    if let Some(port) = port {
        builder = builder.port(port);
    }
    let server = builder.build()?;

    let addr = server.start().await?;
    tracing::info!(%addr, "Learnloom service is running. Press Ctrl+C to stop.");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down...");
    server.stop().await?;

    Ok(())
}

async fn ingest(config: &LearnConfig, text: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let content = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => extract_text(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => return Err(Error::ContentMissing.into()),
    };

    let store = ContentStore::open(&config.storage.base_dir).await?;
    store.submit(&content).await?;

    println!(
        "Stored {} characters in {}",
        content.trim().chars().count(),
        store.path().display()
    );
    Ok(())
}

async fn generate(config: &LearnConfig, mode: Mode, count: Option<u32>) -> Result<()> {
    let store = ContentStore::open(&config.storage.base_dir).await?;
    let content = store.get().await.ok_or(Error::ContentMissing)?;

    let client = GenerationClient::new(&config.client)?;
    let count = count.unwrap_or(config.client.default_count);

    // Ctrl+C abandons the request instead of applying a late result
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let result = match client
        .generate_cancellable(&content, mode.kind(), count, &cancel)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
    };

    let output = match mode {
        Mode::Quiz => {
            let session = QuizSession::new(result.questions().to_vec())?;
            serde_json::json!({
                "total": session.total(),
                "phase": session.phase(),
                "questions": result.questions(),
            })
        }
        Mode::Flashcards => serde_json::to_value(FlashDeck::new(result.questions())?)?,
        Mode::Memory => {
            let game = MemoryGame::new(result.concepts(), config.memory_game.mismatch_delay());
            serde_json::to_value(game.view())?
        }
        Mode::Mindmap => serde_json::to_value(build_mind_map(result.concepts())?)?,
        Mode::All => serde_json::to_value(&result)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn show_config(config: Option<&LearnConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    println!("{}", config.to_toml()?);
    Ok(())
}

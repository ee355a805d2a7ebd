//! Riddle Server - serves clue selection for the riddle game

use clap::Parser;
use riddle::{MatchPolicy, MemoryStore, PromptStore, SelectorConfig};
use riddle_server::{build_router, cors_layer, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Riddle Server - HTTP API for the riddle game
#[derive(Parser, Debug)]
#[command(name = "riddle-server")]
#[command(about = "Run the riddle game API server")]
struct Args {
    /// Port to listen on (falls back to PORT env var, then 8080)
    #[arg(short, long)]
    port: Option<u16>,

    /// JSON file with long and short prompts to preload
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// Match letters case-sensitively
    #[arg(long)]
    case_sensitive: bool,

    /// Longest letter sequence accepted by /spL
    #[arg(long, default_value = "64")]
    max_letters: usize,

    /// Abort a selection run after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Allowed CORS origin (repeatable; any origin if omitted)
    #[arg(long = "allow-origin")]
    allow_origins: Vec<String>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize tracing
    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Resolve port from args or environment
    let port = match args.port {
        Some(port) => port,
        None => match std::env::var("PORT") {
            Ok(raw) => raw.parse()?,
            Err(_) => 8080,
        },
    };

    let store = match &args.seed {
        Some(path) => {
            let store = MemoryStore::load(path).await?;
            tracing::info!(
                "Loaded {} long / {} short prompts from {:?}",
                store.long_prompt_count()?,
                store.short_prompt_count()?,
                path
            );
            store
        }
        None => MemoryStore::new(),
    };
    let store: Arc<dyn PromptStore> = Arc::new(store);

    let policy = if args.case_sensitive {
        MatchPolicy::CaseSensitive
    } else {
        MatchPolicy::CaseInsensitive
    };
    let config = SelectorConfig::new()
        .with_match_policy(policy)
        .with_max_letters(args.max_letters);

    let mut state = AppState::new(store, config);
    if let Some(ms) = args.timeout_ms {
        state = state.with_run_timeout(Duration::from_millis(ms));
    }

    let app = build_router(Arc::new(state), cors_layer(&args.allow_origins)?);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Riddle Server starting on {}", addr);
    tracing::info!("Match policy: {:?}", policy);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

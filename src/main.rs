use axum::Router;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

use fts_query::api;
use fts_query::config::Config;
use fts_query::models::{ExplainReport, SearchOutcome, Translation};
use fts_query::services::SearchService;
use fts_query::storage::SqliteStore;

/// Natural-language search over SQLite full-text mirror tables
#[derive(Parser, Debug)]
#[command(name = "fts-query")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a free-text request and run it against the store
    Search {
        /// Path to the SQLite database
        store: String,
        /// Free-text request, e.g. "latest 5 orders containing lamp"
        query: String,
        /// Print the generated SQL without executing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the inferred catalog of mirrored tables
    Catalog {
        /// Path to the SQLite database
        store: String,
    },
    /// Serve the search API over HTTP
    Serve {
        /// Path to the SQLite database (defaults to DATABASE_URL)
        #[arg(long)]
        store: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::from(1);
        }
        Err(e) => {
            // --help and --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::from(1);
        }
    };

    // Initialize logging; stdout is reserved for JSON output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Search {
            store,
            query,
            dry_run,
        } => run_search(config.with_store_path(store), &query, dry_run),
        Commands::Catalog { store } => run_catalog(config.with_store_path(store)),
        Commands::Serve { store } => {
            let config = match store {
                Some(store) => config.with_store_path(store),
                None => config,
            };
            run_server(config)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            println!("{}", serde_json::json!({ "error": e.to_string() }));
            ExitCode::from(2)
        }
    }
}

fn run_search(config: Config, query: &str, dry_run: bool) -> anyhow::Result<()> {
    let store = SqliteStore::open(&config.store.path)?;
    let service = SearchService::new(&config.store);

    let output = if dry_run {
        match service.explain(&store, query)? {
            Translation::Sql(sql) => serde_json::to_string_pretty(&ExplainReport {
                query: query.to_string(),
                sql,
            })?,
            Translation::NotUnderstood => {
                serde_json::to_string_pretty(&SearchOutcome::not_understood(query))?
            }
        }
    } else {
        serde_json::to_string_pretty(&service.search(&store, query)?)?
    };

    println!("{}", output);
    Ok(())
}

fn run_catalog(config: Config) -> anyhow::Result<()> {
    let store = SqliteStore::open(&config.store.path)?;
    let catalog = SearchService::new(&config.store).catalog(&store)?;
    println!("{}", serde_json::to_string_pretty(&catalog)?);
    Ok(())
}

#[tokio::main]
async fn run_server(config: Config) -> anyhow::Result<()> {
    info!("Starting server on {}", config.server_address());

    let store = Arc::new(tokio::sync::Mutex::new(SqliteStore::open(&config.store.path)?));

    // Create router with state
    let app: Router = api::routes::create_router_with_state(store, config.clone());

    // Start server
    let addr: SocketAddr = config.server_address().parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

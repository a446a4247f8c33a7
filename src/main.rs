//! Shelf-Scraper main entry point
//!
//! This is the command-line interface for the Shelf-Scraper book catalog
//! scraper and its HTTP API.

use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_scraper::api::{build_app, AppState};
use shelf_scraper::catalog::{CrawlStop, ScrapeLimits, Scraper};
use shelf_scraper::config::{load_or_default, Config};
use shelf_scraper::output::{print_statistics, ObserverSet, ScrapeStats, TracingObserver};
use shelf_scraper::storage::{open_store, BookFilter};
use shelf_scraper::{Book, BookStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Shelf-Scraper: a book catalog scraper
///
/// Shelf-Scraper walks the categories of a book catalog, keeps the books
/// under a price ceiling, stores them in a key-value store and serves them
/// over HTTP.
#[derive(Parser, Debug)]
#[command(name = "shelf-scraper")]
#[command(version)]
#[command(about = "A book catalog scraper with a key-value backed API", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one full scrape and print statistics
    Scrape,

    /// Serve the HTTP API
    Serve,

    /// Search stored books
    Search {
        /// Case-insensitive title substring
        #[arg(long)]
        title: Option<String>,

        /// Case-insensitive category name
        #[arg(long)]
        category: Option<String>,

        /// Inclusive lower price bound
        #[arg(long)]
        min_price: Option<f64>,

        /// Inclusive upper price bound
        #[arg(long)]
        max_price: Option<f64>,
    },

    /// Print one stored book as JSON
    Get {
        /// Book id
        id: String,
    },

    /// Delete one stored book
    Delete {
        /// Book id
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is not an error
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("No configuration file given, using defaults"),
    }
    let config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let store = Arc::new(open_store(&config.store).context("failed to open the book store")?);

    match cli.command {
        Command::Scrape => handle_scrape(&config, store).await,
        Command::Serve => handle_serve(&config, store).await,
        Command::Search {
            title,
            category,
            min_price,
            max_price,
        } => handle_search(
            &store,
            BookFilter {
                title,
                category,
                min_price,
                max_price,
            },
        ),
        Command::Get { id } => handle_get(&store, &id),
        Command::Delete { id } => handle_delete(&store, &id),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelf_scraper=info,warn"),
            1 => EnvFilter::new("shelf_scraper=debug,tower_http=debug,info"),
            2 => EnvFilter::new("shelf_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the scrape command: one full run, then statistics
async fn handle_scrape(config: &Config, store: Arc<BookStore>) -> anyhow::Result<()> {
    let stats = Arc::new(ScrapeStats::new());
    let observer = ObserverSet::new()
        .with(Arc::new(TracingObserver))
        .with(stats.clone());

    let scraper = Scraper::from_config(config, store, Arc::new(observer))?;
    let limits = ScrapeLimits::from_config(&config.scrape);

    tracing::info!(
        "Scraping {} (max {} books per category, price ceiling £{:.2})",
        scraper.base_url(),
        limits.max_books_per_category,
        limits.max_price
    );

    let report = scraper.run(&limits).await;
    print_statistics(&stats.snapshot());

    println!();
    for category in &report.categories {
        let marker = match category.stop {
            CrawlStop::CapReached | CrawlStop::LastPage => "✓",
            _ => "✗",
        };
        println!(
            "{} {}: {} books ({})",
            marker,
            category.category.name,
            category.books.len(),
            category.stop
        );
    }

    if !report.listing.is_found() {
        anyhow::bail!("nothing was scraped: {}", report.listing);
    }

    println!("\n✓ {} books scraped and stored", report.stored_books());
    if report.store_failures() > 0 {
        println!("✗ {} books could not be stored", report.store_failures());
    }
    Ok(())
}

/// Handles the serve command: runs the HTTP API until Ctrl-C
async fn handle_serve(config: &Config, store: Arc<BookStore>) -> anyhow::Result<()> {
    let scraper = Scraper::from_config(config, Arc::clone(&store), Arc::new(TracingObserver))?;
    let state = AppState::new(
        store,
        Arc::new(scraper),
        ScrapeLimits::from_config(&config.scrape),
    );

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
    }
}

fn handle_search(store: &BookStore, filter: BookFilter) -> anyhow::Result<()> {
    filter.validate()?;

    let books = store.search(&filter);
    for book in &books {
        print_book_line(book);
    }
    println!("\n{} books", books.len());
    Ok(())
}

fn handle_get(store: &BookStore, id: &str) -> anyhow::Result<()> {
    let book = store
        .get_book(id)
        .with_context(|| format!("book {} not found", id))?;
    println!("{}", serde_json::to_string_pretty(&book)?);
    Ok(())
}

fn handle_delete(store: &BookStore, id: &str) -> anyhow::Result<()> {
    if !store.delete_book(id) {
        anyhow::bail!("book {} not found", id);
    }
    println!("✓ Deleted {}", store.key_for(id));
    Ok(())
}

fn print_book_line(book: &Book) {
    let short_id: String = book.id.chars().take(12).collect();
    println!(
        "{}  £{:>6.2}  {:<20}  {}",
        short_id,
        book.price,
        book.category,
        book.title
    );
}

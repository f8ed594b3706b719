//! Bookshelf CLI - Serve the book catalogue API
//!
//! # Main Command
//!
//! ```bash
//! bookshelf serve                    # Start HTTP server (port 3000)
//! ```
//!
//! # Debug Commands (offline, no server)
//!
//! ```bash
//! bookshelf parse books.csv          # Print parsed CSV rows as JSON
//! bookshelf validate books.json      # Validate a JSON array of books
//! bookshelf import books.csv         # Run a full import into an empty store
//! ```

use clap::{Parser, Subcommand};
use bookshelf::{
    current_year, import_csv_file, parse_csv_file, validate_file, BookStore, ImportResponse,
    LogBroadcaster, ServerConfig,
};
use serde_json::json;
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "bookshelf=info,tower_http=info";

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(about = "In-memory book catalogue with CSV bulk import", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Address to bind (default: BOOKSHELF_HOST or 0.0.0.0)
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port to listen on (default: BOOKSHELF_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Maximum CSV upload size in bytes
        #[arg(long)]
        max_upload_bytes: Option<usize>,

        /// Start with an empty store instead of the sample books
        #[arg(long)]
        no_seed: bool,
    },

    /// Parse a CSV file and output candidate books as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a JSON array of books
    Validate {
        /// Input JSON file
        input: PathBuf,
    },

    /// Import a CSV file into an empty store and print the result
    Import {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            host,
            port,
            max_upload_bytes,
            no_seed,
        } => cmd_serve(host, port, max_upload_bytes, no_seed).await,

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Import { input, output } => cmd_import(&input, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn cmd_serve(
    host: Option<IpAddr>,
    port: Option<u16>,
    max_upload_bytes: Option<usize>,
    no_seed: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ServerConfig::from_env()?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(limit) = max_upload_bytes {
        config.max_upload_bytes = limit;
    }
    if no_seed {
        config.seed_sample_data = false;
    }

    bookshelf::server::start_server(config).await?;
    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let result = parse_csv_file(input)?;
    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Header: {}", if result.has_header { "yes" } else { "no" });
    eprintln!("✅ Parsed {} rows", result.candidates.len());

    let json = serde_json::to_string_pretty(&result.candidates)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let report = validate_file(input, current_year())?;

    for failure in &report.failures {
        eprintln!("\n❌ Record {} invalid:", failure.record);
        for err in &failure.errors {
            eprintln!("   - {}", err);
        }
    }

    eprintln!("\n📊 Results: {} valid, {} invalid", report.valid, report.invalid());

    if !report.is_ok() {
        return Err(format!("{} invalid records", report.invalid()).into());
    }

    Ok(())
}

fn cmd_import(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📥 Importing: {}", input.display());

    let store = BookStore::new();
    let summary = import_csv_file(&store, input, current_year(), &LogBroadcaster::new())?;

    let response = ImportResponse::from(summary);
    eprintln!("   {}", response.message);
    for message in &response.error_messages {
        eprintln!("   - {}", message);
    }

    let json = serde_json::to_string_pretty(&json!({
        "summary": response,
        "books": store.list(),
    }))?;
    write_output(&json, output)?;

    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

//! DocPage CLI
//!
//! Command-line tools for inspecting cursors and pipelines.
//!
//! # Commands
//!
//! - `encode-cursor` - Encode a JSON object into a cursor token
//! - `decode-cursor` - Print the JSON body of a cursor token
//! - `cursor-pipeline` - Print the cursor-mode pipeline for a request
//! - `page-pipeline` - Print the page-mode pipeline for a request

mod commands;

use clap::{Parser, Subcommand};
use docpage_core::{PaginationConfig, MAX_PAGE_SIZE};
use tracing_subscriber::EnvFilter;

use crate::commands::Output;

/// DocPage command-line pagination tools.
#[derive(Parser)]
#[command(name = "docpage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Print JSON on a single line
    #[arg(global = true, short, long)]
    compact: bool,

    /// Largest page a request may ask for
    #[arg(global = true, long, env = "DOCPAGE_MAX_PAGE_SIZE", default_value_t = MAX_PAGE_SIZE)]
    max_page_size: i64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON object into a cursor token
    EncodeCursor {
        /// Cursor body, e.g. '{"createdAt":"2024-01-01T00:00:00Z"}'
        json: String,
    },

    /// Print the JSON body of a cursor token
    DecodeCursor {
        /// Cursor token
        token: String,
    },

    /// Print the cursor-mode pipeline for a request
    CursorPipeline {
        /// Sortable field, in priority order (repeatable)
        #[arg(short, long = "field", required = true)]
        fields: Vec<String>,

        /// Restrict sorting to this field
        #[arg(short, long, default_value = "")]
        order_by: String,

        /// Sort direction (asc, desc)
        #[arg(short, long, default_value = "")]
        direction: String,

        /// Page size
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        limit: i64,

        /// Cursor of the previous page (repeatable)
        #[arg(long = "cursor")]
        cursors: Vec<String>,
    },

    /// Print the page-mode pipeline for a request
    PagePipeline {
        /// Sort field
        #[arg(short, long, default_value = "")]
        order_by: String,

        /// Sort direction (asc, desc)
        #[arg(short, long, default_value = "")]
        direction: String,

        /// Page size
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        limit: i64,

        /// Page number, starting at 1
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        page: i64,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = PaginationConfig::new().max_page_size(cli.max_page_size);
    let output = if cli.compact {
        Output::Compact
    } else {
        Output::Pretty
    };

    match cli.command {
        Commands::EncodeCursor { json } => {
            println!("{}", commands::cursor::encode(&json)?);
        }
        Commands::DecodeCursor { token } => {
            println!("{}", commands::cursor::decode(&token, output)?);
        }
        Commands::CursorPipeline {
            fields,
            order_by,
            direction,
            limit,
            cursors,
        } => {
            let request = commands::pipeline::request(order_by, direction, limit, 0, cursors);
            println!(
                "{}",
                commands::pipeline::cursor(&fields, &request, &config, output)?
            );
        }
        Commands::PagePipeline {
            order_by,
            direction,
            limit,
            page,
        } => {
            let request = commands::pipeline::request(order_by, direction, limit, page, Vec::new());
            println!("{}", commands::pipeline::page(&request, &config, output)?);
        }
        Commands::Version => {
            println!("DocPage CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("DocPage Core v{}", docpage_core::VERSION);
        }
    }

    Ok(())
}

//! Bookshelf CLI - Command-line interface for the personal book tracker

mod commands;

use anyhow::{bail, Result};
use bookshelf_core::store::SortOrder;
use bookshelf_core::types::validate_price;
use bookshelf_core::{Config, Format, Rating, StartReading, Status};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse a calendar date (midnight UTC) or a full RFC 3339 timestamp
fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(s) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| format!("'{}' is not a date (expected YYYY-MM-DD)", s))
}

/// Parse and validate a star rating (0-5)
fn parse_rating(s: &str) -> Result<Rating, String> {
    let stars: i64 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    Rating::new(stars).map_err(|e| e.to_string())
}

/// Parse and validate a price (must not be negative)
fn parse_price(s: &str) -> Result<f64, String> {
    let price: f64 = s.parse().map_err(|_| format!("'{}' is not a valid price", s))?;
    validate_price(price).map_err(|e| e.to_string())
}

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Library data directory (overrides BOOKSHELF_DATA_PATH)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Reading details captured when a book is started
#[derive(Args, Debug, Clone)]
struct StartArgs {
    /// Start date (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_date)]
    start_date: Option<DateTime<Utc>>,

    /// Format of the copy (physical, digital, audio), defaults to physical
    #[arg(long)]
    format: Option<Format>,

    /// Price paid, defaults to 0
    #[arg(long, value_parser = parse_price)]
    price: Option<f64>,
}

impl StartArgs {
    fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.format.is_none() && self.price.is_none()
    }
}

impl From<StartArgs> for StartReading {
    fn from(args: StartArgs) -> Self {
        Self {
            date: args.start_date,
            format: args.format.unwrap_or_default(),
            price: args.price.unwrap_or(0.0),
        }
    }
}

/// Reading details for `add`/`search`, which only apply with `--start`
fn start_options(start: bool, args: StartArgs) -> Result<Option<StartReading>> {
    if start {
        Ok(Some(args.into()))
    } else if args.is_empty() {
        Ok(None)
    } else {
        bail!("--start-date, --format and --price only apply together with --start")
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
    Newest,
    Oldest,
    Title,
}

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Newest => SortOrder::NewestFirst,
            SortArg::Oldest => SortOrder::OldestFirst,
            SortArg::Title => SortOrder::Title,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search the book catalog
    Search {
        /// Title or author to look for
        query: String,

        /// Add the Nth result (1-based) to the library
        #[arg(long, value_name = "N")]
        add: Option<usize>,

        /// Start reading the added book right away
        #[arg(long, requires = "add")]
        start: bool,

        #[command(flatten)]
        start_args: StartArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a book by hand
    Add {
        /// Book title
        #[arg(long)]
        title: String,

        /// Book author
        #[arg(long)]
        author: String,

        /// Cover image URL
        #[arg(long)]
        cover_url: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Start reading right away
        #[arg(long)]
        start: bool,

        #[command(flatten)]
        start_args: StartArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List books in the library
    List {
        /// Only books with this status (upcoming, reading, finished)
        #[arg(short, long)]
        status: Option<Status>,

        /// Only books whose title or author contains this text
        #[arg(long)]
        search: Option<String>,

        /// Ordering
        #[arg(long, value_enum, default_value = "newest")]
        sort: SortArg,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display a single book
    Show {
        /// Book id or unique id prefix
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start reading an upcoming book
    Start {
        /// Book id or unique id prefix
        id: String,

        #[command(flatten)]
        start_args: StartArgs,
    },

    /// Mark a book as finished
    Finish {
        /// Book id or unique id prefix
        id: String,

        /// Finish date (YYYY-MM-DD), defaults to now
        #[arg(long, value_parser = parse_date)]
        date: Option<DateTime<Utc>>,

        /// Rating from 0 to 5
        #[arg(long, value_parser = parse_rating)]
        rating: Option<Rating>,
    },

    /// Rate a book from 0 to 5 stars
    Rate {
        /// Book id or unique id prefix
        id: String,

        /// Stars (0-5, 0 clears the rating)
        #[arg(value_parser = parse_rating)]
        stars: Rating,
    },

    /// Edit book details without changing its status
    Edit {
        /// Book id or unique id prefix
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        format: Option<Format>,

        #[arg(long, value_parser = parse_price)]
        price: Option<f64>,

        /// Notes (empty string clears them)
        #[arg(long)]
        notes: Option<String>,

        #[arg(long, value_parser = parse_date)]
        start_date: Option<DateTime<Utc>>,

        /// Only valid for finished books
        #[arg(long, value_parser = parse_date)]
        finished_date: Option<DateTime<Utc>>,
    },

    /// Remove a book from the library permanently
    Delete {
        /// Book id or unique id prefix
        id: String,
    },

    /// Show reading statistics
    Stats {
        /// Year to summarize, defaults to the current year
        #[arg(long)]
        year: Option<i32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "bookshelf_cli=debug,bookshelf_core=debug"
    } else {
        "bookshelf_cli=info,bookshelf_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(data_dir) = cli.data_dir {
        config = config.with_data_dir(data_dir);
    }

    let store = commands::open_store(&config).await?;

    match cli.command {
        Commands::Search {
            query,
            add,
            start,
            start_args,
            json,
        } => {
            let start = start_options(start, start_args)?;
            commands::search(&store, &config, &query, add, start, json).await
        }

        Commands::Add {
            title,
            author,
            cover_url,
            notes,
            start,
            start_args,
            json,
        } => {
            let start = start_options(start, start_args)?;
            commands::add(&store, title, author, cover_url, notes, start, json).await
        }

        Commands::List {
            status,
            search,
            sort,
            json,
        } => commands::list(&store, status, search, sort.into(), json).await,

        Commands::Show { id, json } => commands::show(&store, &id, json).await,

        Commands::Start { id, start_args } => {
            commands::start(&store, &id, start_args.into()).await
        }

        Commands::Finish { id, date, rating } => {
            commands::finish(&store, &id, date, rating).await
        }

        Commands::Rate { id, stars } => commands::rate(&store, &id, stars).await,

        Commands::Edit {
            id,
            title,
            author,
            format,
            price,
            notes,
            start_date,
            finished_date,
        } => {
            let edits = commands::Edits {
                title,
                author,
                format,
                price,
                notes,
                start_date,
                finished_date,
            };
            commands::edit(&store, &id, edits).await
        }

        Commands::Delete { id } => commands::delete(&store, &id).await,

        Commands::Stats { year, json } => commands::stats(&store, year, json).await,
    }
}

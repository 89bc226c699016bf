//! `lendsqr cache` command - Inspect and annotate the record cache
//!
//! The cache is a local SQLite database holding every user opened with
//! `lendsqr users show`, plus per-user view metadata:
//! - view count and last-viewed time
//! - free-text notes and tags
//! - a favorite flag
//!
//! Status changes made with `lendsqr users status` persist here only.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::users::{print_users, DEFAULT_COLUMNS};
use crate::cli::helpers::{load_config, open_cache, parse_tags};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{KeyValueStore, RecordCache, SqliteStore};
use crate::entities::ViewMetadata;

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Recently viewed users, newest first
    Recent {
        /// Maximum number of entries
        #[arg(long, short = 'n', default_value_t = 10)]
        limit: usize,
    },

    /// Favorite users
    Favorites,

    /// Search cached users only
    Search {
        /// Text to look for in name, email, username, organization or phone
        query: String,

        /// Maximum number of results
        #[arg(long, short = 'n', default_value_t = 10)]
        limit: usize,
    },

    /// Replace a cached user's notes
    Notes {
        /// User ID
        id: String,

        /// New notes (empty to clear)
        text: String,
    },

    /// Replace a cached user's tags
    Tags {
        /// User ID
        id: String,

        /// Comma-separated tags (empty to clear)
        tags: String,
    },

    /// Toggle a cached user's favorite flag
    Favorite {
        /// User ID
        id: String,
    },

    /// Show cache statistics
    Stats,

    /// Remove every cached user and all view metadata
    Clear,
}

const METADATA_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 10),
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("status", "STATUS", 12),
    ColumnDef::new("views", "VIEWS", 6),
    ColumnDef::new("viewed", "LAST VIEWED", 17),
    ColumnDef::new("favorite", "FAV", 4),
    ColumnDef::new("tags", "TAGS", 24),
];

pub fn run(cmd: CacheCommands, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let mut cache = open_cache(&config)?;

    match cmd {
        CacheCommands::Recent { limit } => {
            print_metadata(&cache.recently_viewed(limit), global, "recently viewed user")
        }
        CacheCommands::Favorites => print_metadata(&cache.favorites(), global, "favorite"),
        CacheCommands::Search { query, limit } => run_search(&cache, &query, limit, global),
        CacheCommands::Notes { id, text } => run_notes(&mut cache, &id, &text, global),
        CacheCommands::Tags { id, tags } => run_tags(&mut cache, &id, &tags, global),
        CacheCommands::Favorite { id } => run_favorite(&mut cache, &id, global),
        CacheCommands::Stats => run_stats(&cache, global),
        CacheCommands::Clear => run_clear(&mut cache, global),
    }
}

fn print_metadata(entries: &[ViewMetadata], global: &GlobalOpts, item_name: &'static str) -> Result<()> {
    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(entries).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(entries).into_diagnostic()?);
        }
        format => {
            let rows = entries.iter().map(metadata_row);
            let formatter = TableFormatter::new(METADATA_COLUMNS, item_name);
            if global.quiet {
                formatter.without_summary().output(rows, format);
            } else {
                formatter.output(rows, format);
            }
        }
    }
    Ok(())
}

fn metadata_row(entry: &ViewMetadata) -> TableRow {
    TableRow::new(&entry.user_id)
        .cell("id", CellValue::Text(entry.user_id.clone()))
        .cell("name", CellValue::Text(entry.user.full_name().to_string()))
        .cell("status", CellValue::Status(entry.user.status))
        .cell("views", CellValue::Number(i64::from(entry.view_count)))
        .cell("viewed", CellValue::DateTime(entry.last_viewed))
        .cell("favorite", CellValue::Flag(entry.is_favorite))
        .cell("tags", CellValue::Tags(entry.tags.clone()))
}

fn run_search(
    cache: &RecordCache<SqliteStore>,
    query: &str,
    limit: usize,
    global: &GlobalOpts,
) -> Result<()> {
    let users = cache.search_records(query, limit);

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&users).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&users).into_diagnostic()?);
        }
        format => {
            print_users(&users, DEFAULT_COLUMNS, format);
            if !global.quiet && matches!(format, OutputFormat::Auto | OutputFormat::Tsv) {
                println!();
                println!("{} cached user(s) found.", style(users.len()).cyan());
            }
        }
    }
    Ok(())
}

fn not_cached(id: &str) -> miette::Report {
    miette::miette!(
        "User '{}' is not cached. Open it first with `lendsqr users show {}`",
        id,
        id
    )
}

fn run_notes(
    cache: &mut RecordCache<SqliteStore>,
    id: &str,
    text: &str,
    global: &GlobalOpts,
) -> Result<()> {
    if !cache.update_notes(id, text).into_diagnostic()? {
        return Err(not_cached(id));
    }
    if !global.quiet {
        println!("{} Notes updated for {}", style("✓").green(), style(id).cyan());
    }
    Ok(())
}

fn run_tags(
    cache: &mut RecordCache<SqliteStore>,
    id: &str,
    raw: &str,
    global: &GlobalOpts,
) -> Result<()> {
    let tags = parse_tags(raw);
    if !cache.update_tags(id, &tags).into_diagnostic()? {
        return Err(not_cached(id));
    }
    if !global.quiet {
        if tags.is_empty() {
            println!("{} Tags cleared for {}", style("✓").green(), style(id).cyan());
        } else {
            println!(
                "{} Tags for {}: {}",
                style("✓").green(),
                style(id).cyan(),
                tags.join(", ")
            );
        }
    }
    Ok(())
}

fn run_favorite(cache: &mut RecordCache<SqliteStore>, id: &str, global: &GlobalOpts) -> Result<()> {
    if cache.get_view_metadata(id).is_none() {
        return Err(not_cached(id));
    }
    let favorite = cache.toggle_favorite(id).into_diagnostic()?;

    if !global.quiet {
        if favorite {
            println!("{} {} added to favorites", style("★").yellow(), style(id).cyan());
        } else {
            println!("{} {} removed from favorites", style("✓").green(), style(id).cyan());
        }
    }
    Ok(())
}

fn run_stats(cache: &RecordCache<SqliteStore>, global: &GlobalOpts) -> Result<()> {
    let stats = cache.stats();
    let slots = cache.store().keys().into_diagnostic()?;

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&stats).into_diagnostic()?);
        }
        _ => {
            println!("{}", style("Cache Status").bold());
            println!("{}", style("─".repeat(40)).dim());
            if let Some(path) = cache.store().path() {
                println!("  Location:        {}", path.display());
            }
            println!("  Cached users:    {}", style(stats.total_users).cyan());
            println!("  Detail entries:  {}", style(stats.total_user_details).cyan());
            println!("  Favorites:       {}", style(stats.favorite_users).cyan());
            println!("  Recently viewed: {}", style(stats.recently_viewed).cyan());
            if slots.is_empty() {
                println!("  Stored slots:    {}", style("none").dim());
            } else {
                println!("  Stored slots:    {}", slots.join(", "));
            }
        }
    }
    Ok(())
}

fn run_clear(cache: &mut RecordCache<SqliteStore>, global: &GlobalOpts) -> Result<()> {
    cache.purge_all().into_diagnostic()?;
    if !global.quiet {
        println!("{} Cache cleared", style("✓").green());
    }
    Ok(())
}

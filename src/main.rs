use std::io::{self, Write};

use anyhow::{Context, Result};
use log::{debug, info};

use appdb::{config::AppConfig, indexer, AppDb, DesktopIconLoader, ResultItem};

/// One line of REPL input. Commands start with `:` so any plain text,
/// `q` or `help` included, stays searchable.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Help,
    Reindex,
    Unknown(&'a str),
    Query(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let Some(name) = trimmed.strip_prefix(':') else {
            return Some(Self::Query(trimmed));
        };
        Some(match name.trim().to_lowercase().as_str() {
            "quit" | "exit" | "q" => Self::Quit,
            "help" | "h" => Self::Help,
            "reindex" | "r" => Self::Reindex,
            _ => Self::Unknown(name),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    println!("appdb v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load();
    debug!("Loaded configuration");

    // Open the index
    let location = config.db_location();
    let mut db = AppDb::open(location.clone())
        .with_context(|| format!("failed to open application index at {location:?}"))?
        .with_icon_loader(DesktopIconLoader)
        .with_ranking(config.result_limit(), config.min_score);

    // Sync with installed applications
    println!("Building application index...");
    let summary = indexer::reindex(&mut db, config.application_dirs.clone()).await?;
    info!(
        "Indexed {} applications ({} removed)",
        summary.added_or_updated, summary.removed
    );

    println!("\nReady! Indexed {} apps.", db.len()?);
    println!("Type a query to search, or ':help' for commands.\n");

    // REPL loop
    run_repl(&mut db, &config).await?;

    db.close()?;
    Ok(())
}

async fn run_repl(db: &mut AppDb, config: &AppConfig) -> Result<()> {
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        let Some(command) = Command::parse(&input) else {
            continue;
        };
        match command {
            Command::Quit => {
                println!("Goodbye!");
                break;
            }
            Command::Help => print_help(),
            Command::Reindex => {
                indexer::reindex(db, config.application_dirs.clone()).await?;
                println!("Reindex complete!");
            }
            Command::Unknown(name) => {
                println!("Unknown command ':{name}', try ':help'");
            }
            Command::Query(query) => {
                let results = db.find(query)?;
                display_results(&results);
            }
        }
    }

    Ok(())
}

fn display_results(results: &[ResultItem]) {
    if results.is_empty() {
        println!("No results found.");
        return;
    }

    println!();
    for (index, result) in results.iter().enumerate() {
        if result.description.is_empty() {
            println!("[{}] {}", index + 1, result.name);
        } else {
            println!("[{}] {} - {}", index + 1, result.name, result.description);
        }
    }
    println!();
}

fn print_help() {
    println!();
    println!("appdb Commands:");
    println!("  <query>       - Search installed applications");
    println!("  :reindex, :r  - Rescan application directories");
    println!("  :help, :h     - Show this help message");
    println!("  :quit, :q     - Exit appdb");
    println!();
}

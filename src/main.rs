//! Precis CLI - extractive webpage summarisation
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use dialoguer::Input;
use precis::db::{StoreReport, StoredSummary};
use precis::{server, Config, PageSummary, Persistence, Pipeline};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "precis")]
#[command(author, version, about = "Extractive webpage summarisation", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a webpage by URL
    Summarise {
        /// URL to summarise
        url: String,
        /// Show raw extracted text instead of summary
        #[arg(long)]
        raw: bool,
        /// Do not write the result to the stores
        #[arg(long)]
        no_save: bool,
    },
    /// Summarise a local HTML file
    Extract {
        /// Path to the HTML file
        file: PathBuf,
        /// Show raw extracted text instead of summary
        #[arg(long)]
        raw: bool,
    },
    /// Search stored pages
    Search {
        /// Search query
        query: String,
        /// Maximum number of results
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// List all stored summaries
    List,
    /// Remove a stored page
    Delete {
        /// URL of the page to remove
        url: String,
    },
    /// Check that both stores are reachable
    Check,
    /// Serve the JSON API
    Serve {
        /// Address to bind, overriding the configuration
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Filter used when `RUST_LOG` is unset
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "info,precis=debug"
    } else {
        "info,precis=info"
    }
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Summarise { url, raw, no_save }) => {
            summarise(&url, raw, no_save).await?;
        }
        Some(Commands::Extract { file, raw }) => {
            let config = Config::load()?;
            let pipeline = Pipeline::from_config(&config)?;
            let html = std::fs::read_to_string(&file)?;
            let page = pipeline.process_html(&file.display().to_string(), &html);

            if raw {
                print_raw(&page);
            } else {
                print_page(&page, pipeline.translator().target());
            }
        }
        Some(Commands::Search { query, limit }) => {
            let config = Config::load()?;
            let persistence = Persistence::open(&config.storage);
            search(&persistence, &query, limit)?;
        }
        Some(Commands::List) => {
            let config = Config::load()?;
            let persistence = Persistence::open(&config.storage);
            let summaries = persistence
                .summaries()
                .map_err(anyhow::Error::msg)?
                .list_all()?;

            if summaries.is_empty() {
                println!("No stored summaries found.");
            } else {
                println!("Stored summaries ({}):\n", summaries.len());
                for stored in &summaries {
                    print_stored(stored);
                }
            }
        }
        Some(Commands::Delete { url }) => {
            let config = Config::load()?;
            let persistence = Persistence::open(&config.storage);
            let report = persistence.delete(&url);
            print_report("Deleted", &report);
        }
        Some(Commands::Check) => {
            let config = Config::load()?;
            let persistence = Persistence::open(&config.storage);
            let health = persistence.check();

            println!("Summary store: {}", status_label(health.summary_store));
            println!("Content index: {}", status_label(health.content_store));
            for error in &health.errors {
                println!("  {}", error.yellow());
            }
        }
        Some(Commands::Serve { bind }) => {
            let mut config = Config::load()?;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            let persistence = Persistence::open(&config.storage);
            server::serve(&config, persistence).await?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "precis", &mut std::io::stdout());
        }
        None => {
            if atty::is(atty::Stream::Stdin) {
                let url = Input::<String>::new()
                    .with_prompt("URL to summarise")
                    .interact_text()?;
                summarise(&url, false, false).await?;
            } else {
                Cli::command().print_help()?;
            }
        }
    }

    Ok(())
}

async fn summarise(url: &str, raw: bool, no_save: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let pipeline = Pipeline::from_config(&config)?;

    println!("Fetching: {}", url);
    let page = pipeline.run(url).await?;

    if raw {
        print_raw(&page);
        return Ok(());
    }

    print_page(&page, pipeline.translator().target());

    if !no_save {
        let persistence = Persistence::open(&config.storage);
        let report = persistence.save(&page.to_record());
        println!();
        print_report("Saved", &report);
    }

    Ok(())
}

/// Full-text search, falling back to a substring scan of stored summaries
fn search(persistence: &Persistence, query: &str, limit: usize) -> anyhow::Result<()> {
    let hits = match persistence.content() {
        Ok(index) => index.search(query, limit).unwrap_or_else(|e| {
            tracing::warn!("full-text search failed, falling back: {}", e);
            Vec::new()
        }),
        Err(_) => Vec::new(),
    };

    let storage = persistence.summaries().map_err(anyhow::Error::msg);

    if hits.is_empty() {
        let mut found = storage?.find(query)?;
        found.truncate(limit);
        if found.is_empty() {
            println!("No results found for: {}", query);
        } else {
            println!("Search results for '{}':\n", query);
            for stored in &found {
                print_stored(stored);
            }
        }
        return Ok(());
    }

    println!("Search results for '{}':\n", query);
    for hit in &hits {
        match storage.as_ref().ok().and_then(|s| s.get(&hit.url).ok().flatten()) {
            Some(stored) => print_stored(&stored),
            None => println!("📄 {}\n   {}\n", hit.title.bold(), hit.url),
        }
    }
    Ok(())
}

fn print_raw(page: &PageSummary) {
    println!("\n=== {} ===\n", page.title);
    println!("{}", page.full_text);
    println!("\n--- Extracted {} characters ---", page.full_text.chars().count());
}

fn print_page(page: &PageSummary, language: &str) {
    println!("\n=== {} ===\n", page.title.bold());

    println!("💡 Summary:");
    println!("  {}\n", page.summary);

    println!("🌐 {}:", language);
    println!("  {}", page.translated_summary);
}

fn print_stored(stored: &StoredSummary) {
    println!(
        "📄 {} ({})",
        stored.title.bold(),
        stored.created_at.format("%Y-%m-%d %H:%M")
    );
    println!("   {}", stored.url);
    println!("   {}\n", stored.summary);
}

fn print_report(action: &str, report: &StoreReport) {
    println!(
        "{}: summary store {}, content index {}",
        action,
        status_label(report.summary_store.ok),
        status_label(report.content_store.ok)
    );
    for error in report.errors() {
        println!("  {}", error.yellow());
    }
}

fn status_label(ok: bool) -> colored::ColoredString {
    if ok {
        "ok".green()
    } else {
        "failed".red()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_filter_is_info() {
        assert_eq!(default_filter(false), "info,precis=info");
        assert_eq!(default_filter(true), "info,precis=debug");
        assert!(EnvFilter::try_new(default_filter(false)).is_ok());
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}

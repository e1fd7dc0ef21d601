use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use curator::config::{Config, KNOWN_KEYS, Overrides, Settings};
use curator::consts::{DEFAULT_LIMIT, default_db_path};
use curator::display::{render_artwork, render_results};
use curator::engine::{Aggregator, MuseumScope, SearchOptions, SortBy};
use curator::exhibition::Exhibition;
use curator::exhibition::sqlite::SqliteExhibition;
use curator::museum::standard_registry;

#[derive(Parser)]
#[command(
    name = "curator",
    version,
    about = "Search and curate artworks across museum open-data APIs."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// SQLite database for settings and the exhibition [default: ~/.curator/curator.db]
    #[arg(short, long, global = true)]
    db: Option<PathBuf>,

    /// Harvard Art Museums API key; without one, Harvard is left out of `--museum all`
    #[arg(long, env = "HARVARD_API_KEY", hide_env_values = true, global = true)]
    harvard_api_key: Option<String>,

    /// Seconds to wait for each museum before giving up on it
    #[arg(short, long, global = true)]
    timeout: Option<u64>,

    /// Log debug output to stderr
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Search one museum or all of them
    Search {
        /// Free-text query; leave empty to browse
        query: Vec<String>,

        /// all, chicago, cleveland or harvard
        #[arg(short, long, default_value = "all")]
        museum: MuseumScope,

        /// relevance, date_asc, date_desc or title
        #[arg(short, long, default_value = "relevance")]
        sort: SortBy,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Number of results to ask for
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,

        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show one artwork, e.g. `curator show chicago-27992`
    Show {
        id: String,

        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Manage the curated exhibition
    Exhibition {
        #[command(subcommand)]
        action: ExhibitionAction,
    },
    /// Read or change stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ExhibitionAction {
    /// List artworks in the order they were added
    List {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Look an artwork up and add it
    Add { id: String },
    /// Remove an artwork by id
    Remove { id: String },
    /// Remove everything
    Clear,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print one setting, or all stored settings
    Get { key: Option<String> },
    /// Store a setting
    Set { key: String, value: String },
    /// Forget a stored setting
    Unset { key: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let db_path = cli.db.clone().unwrap_or_else(default_db_path);
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let db = db_path
        .to_str()
        .context("database path is not valid UTF-8")?
        .to_string();

    let store = Config::open(&db)?;
    let overrides = Overrides {
        harvard_api_key: cli.harvard_api_key,
        timeout_secs: cli.timeout,
    };

    match cli.command {
        Command::Search {
            query,
            museum,
            sort,
            page,
            limit,
            json,
        } => {
            let aggregator = build_aggregator(&store, overrides)?;
            let result = aggregator
                .search_artworks(SearchOptions {
                    query: Some(query.join(" ")),
                    museum: Some(museum),
                    page: Some(page),
                    limit: Some(limit),
                    sort_by: Some(sort),
                })
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render_results(&result));
            }
        }
        Command::Show { id, json } => {
            let aggregator = build_aggregator(&store, overrides)?;
            let artwork = aggregator
                .lookup(&id)
                .await
                .with_context(|| format!("could not load {id}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&artwork)?);
            } else {
                print!("{}", render_artwork(&artwork));
            }
        }
        Command::Exhibition { action } => {
            let exhibition = SqliteExhibition::open(&db)?;
            handle_exhibition(&exhibition, action, &store, overrides).await?;
        }
        Command::Config { action } => handle_config(&store, action)?,
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,curator=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn build_aggregator(store: &Config, overrides: Overrides) -> Result<Aggregator> {
    let settings = Settings::resolve(store, overrides)?;
    let client = reqwest::Client::builder()
        .user_agent(concat!("curator/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;
    let registry = standard_registry(
        &client,
        settings.chicago.clone(),
        settings.cleveland.clone(),
        settings.harvard.clone(),
    );
    Ok(Aggregator::new(registry, settings.engine()))
}

async fn handle_exhibition(
    exhibition: &dyn Exhibition,
    action: ExhibitionAction,
    store: &Config,
    overrides: Overrides,
) -> Result<()> {
    match action {
        ExhibitionAction::List { json } => {
            let artworks = exhibition.artworks().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&artworks)?);
            } else if artworks.is_empty() {
                println!("the exhibition is empty");
            } else {
                for (i, artwork) in artworks.iter().enumerate() {
                    println!("{:>3}. {}  {} ({})", i + 1, artwork.id, artwork.title, artwork.date);
                }
            }
        }
        ExhibitionAction::Add { id } => {
            if exhibition.contains(&id).await? {
                println!("{id} is already in the exhibition");
                return Ok(());
            }
            let aggregator = build_aggregator(store, overrides)?;
            let artwork = aggregator
                .lookup(&id)
                .await
                .with_context(|| format!("could not load {id}"))?;
            let title = artwork.title.clone();
            if exhibition.add(artwork).await? {
                let size = exhibition.size().await?;
                println!("added {id} ({title}), {size} in exhibition");
            } else {
                println!("{id} is already in the exhibition");
            }
        }
        ExhibitionAction::Remove { id } => {
            if exhibition.remove(&id).await? {
                println!("removed {id}");
            } else {
                println!("{id} is not in the exhibition");
            }
        }
        ExhibitionAction::Clear => {
            exhibition.clear().await?;
            println!("exhibition cleared");
        }
    }
    Ok(())
}

fn handle_config(store: &Config, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Get { key: Some(key) } => match store.get(&key)? {
            Some(value) => println!("{value}"),
            None => println!("{key} is not set"),
        },
        ConfigAction::Get { key: None } => {
            let entries = store.entries()?;
            if entries.is_empty() {
                println!("no stored settings (known: {})", KNOWN_KEYS.join(", "));
            }
            for (key, value) in entries {
                println!("{key} = {value}");
            }
        }
        ConfigAction::Set { key, value } => {
            store.set(&key, &value)?;
            println!("{key} saved");
        }
        ConfigAction::Unset { key } => {
            store.remove(&key)?;
            println!("{key} removed");
        }
    }
    Ok(())
}

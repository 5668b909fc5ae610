//! Mukki - headless management for the nine-tile music launcher
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use mukki_catalog::{ArtworkCache, CatalogClient};
use mukki_cli::{
    output::{item_line, tile_line, TileSummary},
    CliError, HeadlessEngine, LauncherConfig,
};
use mukki_core::{
    types::{MediaId, MediaKind, MediaRef, TilePosition},
    CatalogGateway, PlayerEngine, TileStore,
};
use mukki_playback::LauncherContext;
use mukki_storage::{LocalTileStore, StorageError};
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mukki")]
#[command(about = "Manage Mukki Player tiles from the command line", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./mukki.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and the nine tile slots
    Init,
    /// List all tiles
    Tiles {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Search the catalog
    Search {
        /// Search term
        query: String,
        /// What to search for
        #[arg(short, long, value_enum, default_value_t = SearchKind::All)]
        kind: SearchKind,
    },
    /// Bind a tile to an album or playlist
    Bind {
        /// Tile position (0-8)
        position: u8,
        /// Media kind
        #[arg(value_enum)]
        kind: KindArg,
        /// Catalog id
        id: String,
    },
    /// Clear a tile's binding
    Clear {
        /// Tile position (0-8)
        position: u8,
    },
    /// Resolve a tile's queue and show the track it resumes from
    Resume {
        /// Tile position (0-8)
        position: u8,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchKind {
    Album,
    Playlist,
    All,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Album,
    Playlist,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Album => MediaKind::Album,
            KindArg::Playlist => MediaKind::Playlist,
        }
    }
}

impl Commands {
    fn needs_catalog(&self) -> bool {
        matches!(
            self,
            Commands::Search { .. } | Commands::Bind { .. } | Commands::Resume { .. }
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mukki=info,mukki_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = LauncherConfig::load(cli.config.as_deref())?;
    config.validate(cli.command.needs_catalog())?;

    match cli.command {
        Commands::Init => init(&config).await?,
        Commands::Tiles { json } => list_tiles(&config, json).await?,
        Commands::Search { query, kind } => search(&config, &query, kind).await?,
        Commands::Bind { position, kind, id } => {
            bind(&config, position, kind.into(), id).await?;
        }
        Commands::Clear { position } => clear(&config, position).await?,
        Commands::Resume { position } => resume(&config, position).await?,
    }

    Ok(())
}

async fn open_store(config: &LauncherConfig) -> anyhow::Result<Arc<LocalTileStore>> {
    let pool = mukki_storage::create_pool(&config.storage.database_url)
        .await
        .map_err(StorageError::from)
        .with_context(|| format!("opening {}", config.storage.database_url))?;
    mukki_storage::run_migrations(&pool)
        .await
        .map_err(StorageError::from)?;
    Ok(Arc::new(LocalTileStore::new(pool)))
}

fn open_catalog(config: &LauncherConfig) -> anyhow::Result<Arc<CatalogClient>> {
    Ok(Arc::new(CatalogClient::new(config.catalog_config())?))
}

/// Full launcher context over the configured store and catalog
async fn open_launcher(
    config: &LauncherConfig,
) -> anyhow::Result<(LauncherContext, Arc<HeadlessEngine>)> {
    let store = open_store(config).await?;
    let catalog = open_catalog(config)?;
    let artwork = Arc::new(ArtworkCache::http(config.catalog_timeout())?);
    let (engine, engine_events) = HeadlessEngine::new();
    let engine = Arc::new(engine);

    let (launcher, _events) = LauncherContext::start(
        store,
        catalog,
        engine.clone(),
        artwork,
        engine_events,
        config.playback_config(),
    )
    .await;
    Ok((launcher, engine))
}

fn position(raw: u8) -> anyhow::Result<TilePosition> {
    Ok(TilePosition::new(raw)?)
}

async fn init(config: &LauncherConfig) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let tiles = store.create_if_absent().await?;
    tracing::info!(database = %config.storage.database_url, "Tiles initialised");
    println!("{} tiles ready", tiles.len());
    Ok(())
}

async fn list_tiles(config: &LauncherConfig, json: bool) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let tiles = store.create_if_absent().await?;

    if json {
        let summaries: Vec<TileSummary> = tiles.iter().map(TileSummary::from).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for tile in &tiles {
            println!("{}", tile_line(tile));
        }
    }
    Ok(())
}

async fn search(config: &LauncherConfig, query: &str, kind: SearchKind) -> anyhow::Result<()> {
    let catalog = open_catalog(config)?;

    let (albums, playlists) = match kind {
        SearchKind::Album => (catalog.search_albums(query).await?, Vec::new()),
        SearchKind::Playlist => (Vec::new(), catalog.search_playlists(query).await?),
        SearchKind::All => {
            let results = catalog.search_all(query).await?;
            (results.albums, results.playlists)
        }
    };

    if albums.is_empty() && playlists.is_empty() {
        println!("No results for \"{}\"", query);
        return Ok(());
    }
    for item in albums.iter().chain(&playlists) {
        println!("{}", item_line(item));
    }
    Ok(())
}

async fn bind(
    config: &LauncherConfig,
    raw_position: u8,
    kind: MediaKind,
    id: String,
) -> anyhow::Result<()> {
    let position = position(raw_position)?;
    let (launcher, _engine) = open_launcher(config).await?;
    let media = MediaRef::new(kind, MediaId::new(id));

    let item = launcher
        .catalog()
        .fetch_by_id(&media)
        .await?
        .ok_or_else(|| CliError::NotFound(media.to_string()))?;

    let tile = launcher.tile(position);
    tile.bind_item(&item).await;

    match tile.record() {
        Some(record) => println!("{}", tile_line(&record)),
        None => anyhow::bail!("tile {} has no stored record", position),
    }
    Ok(())
}

async fn clear(config: &LauncherConfig, raw_position: u8) -> anyhow::Result<()> {
    let position = position(raw_position)?;
    let (launcher, _engine) = open_launcher(config).await?;

    let tile = launcher.tile(position);
    tile.clear().await;

    match tile.record() {
        Some(record) => println!("{}", tile_line(&record)),
        None => anyhow::bail!("tile {} has no stored record", position),
    }
    Ok(())
}

async fn resume(config: &LauncherConfig, raw_position: u8) -> anyhow::Result<()> {
    let position = position(raw_position)?;
    let (launcher, engine) = open_launcher(config).await?;
    let tile = launcher.tile(position);

    if !tile.is_configured() {
        println!("Tile {} is empty", position);
        return Ok(());
    }

    tile.request_play().await;

    let coordinator = launcher.coordinator();
    let index = coordinator.current_track_index();
    let entry = engine.current_entry();

    // Deactivate before exiting so queued position events are not
    // written back half-processed
    coordinator.stop().await;

    let Some(entry) = entry else {
        anyhow::bail!("tile {} could not be loaded", position);
    };
    println!(
        "Tile {} resumes at track {} of {}: {} - {}",
        position,
        index + 1,
        engine.entries().len(),
        entry.track.title,
        entry.track.artist
    );
    Ok(())
}

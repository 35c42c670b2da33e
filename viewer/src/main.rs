//! Outbreak Atlas
//!
//! Per-country case severity on a world map.
//!
//! Usage:
//!   outbreak-atlas run                      # interactive console session
//!   outbreak-atlas export --out atlas-out   # one load, write GeoJSON + style
//!
//! Global options: --config <file.json> --endpoint <url> --timeout-sec <n> --verbose

mod console;

use anyhow::{Context, Result};
use atlas_app::{App, AtlasConfig, Notice, Notifier, Session, SessionHandle, UiEvent};
use atlas_core::ActiveFilterSet;
use atlas_feed::{CountrySource, DiseaseShClient};
use atlas_render::{LayerStack, MapRenderer, ViewportConfig};
use clap::{Parser, Subcommand};
use console::{Command, ConsoleMap, ConsoleNotifier};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "outbreak-atlas",
    about = "Interactive world map of per-country outbreak severity"
)]
struct Args {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the feed endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Override the feed request timeout in seconds
    #[arg(long)]
    timeout_sec: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Interactive session on stdin
    Run,
    /// Load once and write countries.geojson and style.json
    Export {
        #[arg(short, long, default_value = "atlas-export")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "outbreak_atlas=debug,atlas_app=debug,atlas_feed=debug,atlas_render=debug,atlas_core=debug"
    } else {
        "outbreak_atlas=info,atlas_app=info,atlas_feed=info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = build_config(&args)?;
    info!("Feed endpoint: {}", config.feed.endpoint);
    if config.viewport.access_token.is_none() {
        warn!("No map access token configured, style will omit it");
    }

    match args.command.unwrap_or(Mode::Run) {
        Mode::Run => run(config).await,
        Mode::Export { out } => export(config, &out).await,
    }
}

fn build_config(args: &Args) -> Result<AtlasConfig> {
    let mut config = AtlasConfig::load_or_default(args.config.as_deref())
        .context("failed to load config")?
        .with_env_token();
    if let Some(endpoint) = &args.endpoint {
        config.feed.endpoint = endpoint.clone();
    }
    if let Some(timeout) = args.timeout_sec {
        config.feed.timeout_sec = timeout;
    }
    Ok(config)
}

async fn run(config: AtlasConfig) -> Result<()> {
    let client = DiseaseShClient::new(config.feed.clone())?;
    let search_zoom = config.viewport.search_zoom;
    let map = ConsoleMap::new(LayerStack::new(config.viewport));
    let app = App::new(map, ConsoleNotifier, search_zoom);

    let session = Session::new(app, client);
    let handle = session.handle();
    let console = tokio::spawn(read_console(handle));

    let app = session.run().await;
    console.abort();

    let camera = app.renderer().stack().camera();
    info!(
        "Final view {:.2}, {:.2} at zoom {:.1}",
        camera.center().lat,
        camera.center().lon,
        camera.zoom()
    );
    Ok(())
}

async fn read_console(handle: SessionHandle) {
    println!("{}", console::HELP);
    let mut notifier = ConsoleNotifier;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("stdin read failed: {}", e);
                break;
            }
        };

        let command = match console::parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                notifier.notify(Notice::unknown_command(e.to_string()));
                continue;
            }
        };

        if !dispatch(&handle, command, &mut notifier).await {
            break;
        }
    }

    handle.shutdown();
}

/// Returns false when the console should stop
async fn dispatch(
    handle: &SessionHandle,
    command: Command,
    notifier: &mut impl Notifier,
) -> bool {
    let event = match command {
        Command::Click(target) => {
            let Some(markers) = handle.markers().await else {
                return false;
            };
            match console::resolve_marker(&markers, &target) {
                Some(marker) => UiEvent::MarkerClick {
                    id: marker.id.clone(),
                },
                None => {
                    let message = format!("No visible marker {target:?}");
                    notifier.notify(Notice::unknown_command(message));
                    return true;
                }
            }
        }
        Command::Hover(id) => UiEvent::MarkerHover { id },
        Command::Filter { bucket, checked } => UiEvent::FilterChange { bucket, checked },
        Command::Search(query) => UiEvent::SearchSubmit { query },
        Command::Refresh => UiEvent::RefreshClick,
        Command::Markers => {
            let Some(markers) = handle.markers().await else {
                return false;
            };
            for marker in &markers {
                println!(
                    "{:>8}  {:<9}  {}",
                    marker.id,
                    marker.severity.as_str(),
                    marker.name
                );
            }
            println!("{} visible", markers.len());
            return true;
        }
        Command::Status => {
            return match handle.status().await {
                Some(status) => {
                    println!("{}", console::render_status(&status));
                    true
                }
                None => false,
            };
        }
        Command::Help => {
            println!("{}", console::HELP);
            return true;
        }
        Command::Quit => return false,
    };
    handle.send(event)
}

async fn export(config: AtlasConfig, out: &Path) -> Result<()> {
    let client = DiseaseShClient::new(config.feed.clone())?;
    export_from(&client, config.viewport, out).await
}

/// One load from `source`, written as `countries.geojson` and `style.json`
async fn export_from<S: CountrySource>(
    source: &S,
    viewport: ViewportConfig,
    out: &Path,
) -> Result<()> {
    let snapshot = atlas_feed::load(source)
        .await
        .context("Failed to load COVID data.")?;

    let mut stack = LayerStack::new(viewport);
    stack.set_data(&snapshot.collection);
    stack.apply_filter(&ActiveFilterSet::all());

    fs::create_dir_all(out).with_context(|| format!("failed to create {:?}", out))?;

    let geojson_path = out.join("countries.geojson");
    let mut writer = BufWriter::new(File::create(&geojson_path)?);
    serde_json::to_writer_pretty(&mut writer, &snapshot.collection.to_geojson())?;
    writer.flush()?;
    info!(
        "Wrote {} features to {:?}",
        snapshot.collection.len(),
        geojson_path
    );

    let style_path = out.join("style.json");
    let mut writer = BufWriter::new(File::create(&style_path)?);
    serde_json::to_writer_pretty(&mut writer, &stack.style_document())?;
    writer.flush()?;
    info!("Wrote style to {:?}", style_path);

    if let Some(label) = snapshot.last_updated_label() {
        info!("{}", label);
    }
    Ok(())
}

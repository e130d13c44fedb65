use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ocrfind::index::ingest::{Detection, content_hash, tokens_from_detections};
use ocrfind::index::{CorpusIndex, ImageId, ImageRecord, JsonDirStore};
use ocrfind::utils::progress;
use ocrfind::utils::{AppConfig, get_store_dir};
use ocrfind::{output, search_with};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ocrfind")]
#[command(about = "Boolean, substring and typo-tolerant search over OCR word boxes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Record store directory (defaults to the app data directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Index one image from a JSON list of OCR detections
    Add {
        /// Detections file
        detections: PathBuf,

        /// Image id (defaults to the next free id)
        #[arg(long)]
        id: Option<ImageId>,

        /// Source image, used for the content hash
        #[arg(long)]
        image: Option<PathBuf>,

        /// Display name (defaults to the image file name)
        #[arg(long)]
        name: Option<String>,

        /// Index even if identical image content is already present
        #[arg(long)]
        allow_duplicate: bool,
    },
    /// Index many images from a JSON manifest
    Import {
        /// Manifest file: a list of {id?, name?, image?, detections}
        manifest: PathBuf,

        /// Index entries even if identical image content is already present
        #[arg(long)]
        allow_duplicate: bool,
    },
    /// Remove an image from the index
    Remove {
        id: ImageId,
    },
    /// List indexed images
    List,
    /// Show corpus statistics
    Stats,
    /// Search the corpus
    Search {
        /// Query, e.g. `budget AND 2025` or `meeting task`
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Maximum number of images to show (0 = unlimited)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Emit JSON instead of coloured text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Deserialize)]
struct ManifestEntry {
    id: Option<ImageId>,
    name: Option<String>,
    image: Option<PathBuf>,
    detections: Vec<Detection>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::load()?;
    let store_dir = match cli.store {
        Some(dir) => dir,
        None => get_store_dir()?,
    };
    let index = CorpusIndex::open(Box::new(JsonDirStore::new(&store_dir)))
        .with_context(|| format!("Failed to open store at {}", store_dir.display()))?;

    match cli.command {
        Commands::Add {
            detections,
            id,
            image,
            name,
            allow_duplicate,
        } => {
            let detections: Vec<Detection> = read_json(&detections)?;
            let id = id.unwrap_or_else(|| index.next_id());
            let name = name
                .or_else(|| image.as_deref().and_then(file_name))
                .unwrap_or_default();
            let hash = match &image {
                Some(path) => content_hash(
                    &fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?,
                ),
                None => String::new(),
            };

            check_duplicate(&index, id, &hash, allow_duplicate)?;
            let record = ImageRecord::new(id, tokens_from_detections(detections)?)
                .with_display_name(name)
                .with_content_hash(hash);
            let tokens = record.tokens.len();
            index.add_record(record)?;
            println!("Indexed image {} ({} tokens)", id, tokens);
        }
        Commands::Import {
            manifest,
            allow_duplicate,
        } => {
            let entries: Vec<ManifestEntry> = read_json(&manifest)?;
            let imported = import_entries(&index, entries, allow_duplicate)?;
            println!("Imported {} images", imported);
        }
        Commands::Remove { id } => {
            if index.remove_image(id)? {
                println!("Removed image {}", id);
            } else {
                println!("Image {} was not indexed", id);
            }
        }
        Commands::List => {
            output::print_image_list(&index.snapshot())?;
        }
        Commands::Stats => {
            ocrfind::index::stats::show_stats(&index.snapshot());
        }
        Commands::Search { query, limit, json } => {
            let mut options = config.search_options();
            if let Some(limit) = limit {
                options.limit = limit;
            }

            let snapshot = index.snapshot();
            let results = search_with(&query.join(" "), &snapshot, &options);
            if json {
                output::print_json(&results)?;
            } else if results.is_empty() {
                println!("No matches.");
            } else {
                output::print_matches(&results, &snapshot, true)?;
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "ocrfind=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Refuse content already indexed under a different id
fn check_duplicate(index: &CorpusIndex, id: ImageId, hash: &str, allow_duplicate: bool) -> Result<()> {
    if let Some(existing) = index.find_by_hash(hash) {
        if !allow_duplicate && existing != id {
            bail!(
                "identical image already indexed as {} (pass --allow-duplicate to add a copy)",
                existing
            );
        }
    }
    if index.get(id).is_some() {
        tracing::warn!(id, "replacing already indexed image");
    }
    Ok(())
}

/// Index manifest entries in order, stopping at the first rejected one
fn import_entries(index: &CorpusIndex, entries: Vec<ManifestEntry>, allow_duplicate: bool) -> Result<usize> {
    let pb = progress::import_bar(entries.len() as u64);

    let mut imported = 0usize;
    for entry in entries {
        let id = entry.id.unwrap_or_else(|| index.next_id());
        let hash = match &entry.image {
            Some(path) => content_hash(&fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?),
            None => String::new(),
        };
        let name = entry
            .name
            .or_else(|| entry.image.as_deref().and_then(file_name))
            .unwrap_or_default();
        pb.set_message(name.clone());

        check_duplicate(index, id, &hash, allow_duplicate)
            .with_context(|| format!("Rejected manifest entry for image {}", id))?;
        let tokens = tokens_from_detections(entry.detections)
            .with_context(|| format!("Invalid detections for image {}", id))?;
        index.add_record(
            ImageRecord::new(id, tokens)
                .with_display_name(name)
                .with_content_hash(hash),
        )?;
        imported += 1;
        pb.inc(1);
    }

    pb.finish_with_message(format!("{} images imported", imported));
    Ok(imported)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use wardrobe_api::RestApi;
use wardrobe_core::{CatalogConfig, CatalogService, ImageLocator, SmallCatalogPolicy};
use wardrobe_ingest::CatalogReader;

/// Fashion catalog search and similar-item recommendations
#[derive(Parser, Debug)]
#[command(name = "wardrobe")]
#[command(about = "Catalog search and similar-item recommendations", long_about = None)]
struct Args {
    /// Path to the styles CSV snapshot
    #[arg(short, long, default_value = "data/styles.csv")]
    data: PathBuf,

    /// Directory holding `{id}.jpg` product images
    #[arg(long, default_value = "images")]
    images_dir: PathBuf,

    /// HTTP bind address
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// HTTP API port
    #[arg(long, default_value_t = 5000)]
    http_port: u16,

    /// Number of similarity groups
    #[arg(long, default_value_t = 12)]
    groups: usize,

    /// Seed for k-means initialization
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Reduce the group count instead of failing when the catalog is smaller
    #[arg(long)]
    clamp_groups: bool,

    /// Base URL for image references [default: http://{host}:{http_port}/image]
    #[arg(long)]
    image_base_url: Option<String>,

    /// Pin the recommendation sampler to a seed
    #[arg(long)]
    sampling_seed: Option<u64>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Wardrobe v{}", env!("CARGO_PKG_VERSION"));
    info!("Catalog: {:?}", args.data);
    info!("Images directory: {:?}", args.images_dir);

    let report = CatalogReader::from_path(&args.data)?.read()?;

    let config = CatalogConfig {
        n_groups: args.groups,
        seed: args.seed,
        small_catalog: if args.clamp_groups {
            SmallCatalogPolicy::Clamp
        } else {
            SmallCatalogPolicy::Fail
        },
        sampling_seed: args.sampling_seed,
        ..CatalogConfig::default()
    };
    let base_url = args
        .image_base_url
        .clone()
        .unwrap_or_else(|| format!("http://{}:{}/image", args.host, args.http_port));

    // Build fails fast; nothing is served from an ungrouped catalog
    let service = Arc::new(CatalogService::build(
        report.items,
        &config,
        ImageLocator::new(base_url),
    )?);
    let summary = service.summary();
    info!(
        "Catalog ready: {} items, {} groups, {} dimensions",
        summary.items, summary.groups, summary.dimensions
    );
    info!("Group sizes: {:?}", service.group_sizes());

    let http_handle = RestApi::spawn(
        service,
        args.images_dir.clone(),
        args.host.clone(),
        args.http_port,
    );

    info!("HTTP API: http://{}:{}/", args.host, args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        joined = tokio::task::spawn_blocking(move || http_handle.join()) => {
            match joined? {
                Ok(Ok(())) => info!("HTTP server stopped"),
                Ok(Err(e)) => return Err(anyhow::Error::new(e).context("HTTP server failed")),
                Err(_) => anyhow::bail!("HTTP server thread panicked"),
            }
        }
    }

    info!("Shutting down...");
    Ok(())
}

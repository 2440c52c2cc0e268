use anyhow::{bail, Context};
use clap::Parser;
use product_site::adapters::SqliteStore;
use product_site::config::toml_config::StorageBackend;
use product_site::utils::{logger, validation::Validate};
use product_site::CliConfig;

#[derive(Parser)]
#[command(name = "seed-site")]
#[command(about = "Populate the libSQL database with the default catalog")]
struct Args {
    #[command(flatten)]
    site: CliConfig,

    /// Also insert the demo reviews
    #[arg(long)]
    sample_reviews: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = args
        .site
        .load()
        .with_context(|| format!("Failed to load config file '{}'", args.site.config))?;
    logger::init_logger(config.logging.verbose, config.logging.format);

    config.validate().context("Configuration validation failed")?;

    if config.storage.backend != StorageBackend::Sqlite {
        bail!("Seeding needs storage.backend = \"sqlite\"; the in-memory store is not persistent");
    }
    let path = config
        .storage
        .path
        .as_deref()
        .context("storage.path is required for the sqlite backend")?;

    tracing::info!("🌱 Seeding {}", path);
    let store = SqliteStore::open(path)
        .await
        .with_context(|| format!("Failed to open database at {path}"))?;

    let plans = config.catalog.plans_or_default();
    let inserted = store.seed_plans(&plans).await?;
    println!("✅ Inserted {} plans", inserted);

    if args.sample_reviews {
        let count = store.insert_sample_reviews().await?;
        println!("✅ Inserted {} sample reviews", count);
    }

    Ok(())
}

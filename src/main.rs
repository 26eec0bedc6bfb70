use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use recipeshelf::application::{LoadRecipesUseCase, RecipeListState, cuisines, filter_by_cuisine};
use recipeshelf::domain::ImageSource;
use recipeshelf::infrastructure::{
    AppConfig, CacheService, CliArgs, ConfigStore, HttpRecipeClient, ImageLoadedEvent,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let mut config = match ConfigStore::locate(args.config.as_deref()) {
        Ok(store) => store.load()?,
        Err(_) => AppConfig::default(),
    };
    config.merge_args(args);
    Ok(config)
}

fn print_recipes(state: &RecipeListState, cuisine: Option<&str>) {
    if let Some(message) = state.message() {
        println!("{message}");
        return;
    }

    let recipes = filter_by_cuisine(state.recipes(), cuisine);
    if recipes.is_empty() {
        println!("No recipes available.");
        return;
    }

    for recipe in recipes {
        println!("{:<40} {}", recipe.name, recipe.cuisine);
    }
}

async fn prefetch_thumbnails(cache: &CacheService, urls: Vec<String>) {
    let total = urls.len();
    let (tx, mut rx) = mpsc::unbounded_channel::<ImageLoadedEvent>();
    cache.prefetch(urls, &tx);
    drop(tx);

    let (mut network, mut cached, mut failed) = (0usize, 0usize, 0usize);
    while let Some(event) = rx.recv().await {
        match event.result {
            Ok(image) if image.source == ImageSource::Network => network += 1,
            Ok(_) => cached += 1,
            Err(e) => {
                warn!(url = %event.url, error = %e, "Thumbnail unavailable");
                failed += 1;
            }
        }
    }

    println!(
        "Thumbnails: {total} requested, {network} downloaded, {cached} cached, {failed} unavailable"
    );
    println!("{}", cache.memory_stats().await);
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = dotenvy::dotenv();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    init_logging(&config)?;

    info!(version = recipeshelf::VERSION, "Starting recipeshelf");

    let catalog = Arc::new(HttpRecipeClient::new(
        config.recipes.endpoint.clone(),
        config.cache.fetch_timeout(),
    )?);
    let state = LoadRecipesUseCase::new(catalog).execute().await;

    if args.list_cuisines {
        for cuisine in cuisines(state.recipes()) {
            println!("{cuisine}");
        }
        return Ok(());
    }

    print_recipes(&state, args.cuisine.as_deref());

    if args.prefetch {
        let cache = CacheService::from_config(&config.cache.to_service_config()).await?;
        let urls = filter_by_cuisine(state.recipes(), args.cuisine.as_deref())
            .into_iter()
            .filter_map(|r| r.photo_url_small.clone())
            .collect();
        prefetch_thumbnails(&cache, urls).await;
    }

    Ok(())
}

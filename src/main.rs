use courtauction_scraper::api::CourtAuctionClient;
use courtauction_scraper::config::Config;
use courtauction_scraper::db::{init_db, Database, SqliteAuctionStore};
use courtauction_scraper::geo::Geocoder;
use courtauction_scraper::jobs::{fetch_list, update_expired};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    dotenvy::dotenv().ok();

    let batch_size = batch_size_from_args();
    let config = Config::from_env();

    let db = Database::new(config.db_path.clone());
    if let Err(e) = init_db(&db) {
        eprintln!("database initialization failed: {e}");
        std::process::exit(1);
    }
    let store = SqliteAuctionStore::new(db);

    let client = match CourtAuctionClient::new() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("HTTP client initialization failed: {e}");
            std::process::exit(1);
        }
    };

    let geocoder = match config.kakao_api_key {
        Some(key) => match Geocoder::new(key) {
            Ok(geocoder) => Some(geocoder),
            Err(e) => {
                warn!("geocoder initialization failed, geocoding disabled: {e}");
                None
            }
        },
        None => {
            warn!("KAKAO_REST_API_KEY not set, geocoding disabled");
            None
        }
    };

    // New and upcoming listings first, then the stale-record sweep.
    for window in &fetch_list::DEFAULT_WINDOWS {
        fetch_list::run(&client, &store, geocoder.as_ref(), window);
    }

    match update_expired::run(&store, &client, batch_size) {
        Ok(stats) => info!(
            "run complete: {} expired candidates, {} updated, {} cancelled",
            stats.total, stats.updated, stats.cancelled
        ),
        Err(e) => {
            eprintln!("expired auction update failed: {e}");
            std::process::exit(1);
        }
    }
}

/// The only CLI flag: `--batch-size N` for the reconciliation driver.
fn batch_size_from_args() -> usize {
    let args: Vec<String> = env::args().collect();
    for (i, arg) in args.iter().enumerate() {
        if arg == "--batch-size" {
            match args.get(i + 1).and_then(|v| v.parse::<usize>().ok()) {
                Some(n) if n > 0 => return n,
                _ => {
                    eprintln!("Usage: {} [--batch-size N]", args[0]);
                    std::process::exit(1);
                }
            }
        }
    }
    update_expired::DEFAULT_BATCH_SIZE
}

use std::env;

/// Environment-supplied settings. Call `dotenvy::dotenv().ok()` before
/// reading so a local `.env` file is picked up.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    /// Kakao REST API key for address geocoding. Geocoding is skipped
    /// when the key is not provided.
    pub kakao_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("DB_PATH").unwrap_or_else(|_| "auctions.sqlite3".to_string()),
            kakao_api_key: env::var("KAKAO_REST_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
        }
    }
}

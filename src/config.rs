use serde::Deserialize;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://glucotrack.db";
pub const DEFAULT_FDC_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

#[derive(Debug, Clone, Deserialize)]
pub struct FoodDataConfig {
    pub api_key: String,
    pub base_url: String,
    pub page_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub food_data: FoodDataConfig,
}

impl AppConfig {
    /// Reads `.env` (if present) and then the process environment.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into());
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(5);
        let food_data = FoodDataConfig {
            api_key: std::env::var("FDC_API_KEY")?,
            base_url: std::env::var("FDC_BASE_URL").unwrap_or_else(|_| DEFAULT_FDC_BASE_URL.into()),
            page_size: std::env::var("FDC_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(20),
        };
        Ok(Self {
            database_url,
            max_connections,
            food_data,
        })
    }
}

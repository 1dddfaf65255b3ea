use std::sync::Arc;

use crate::config::AppConfig;
use crate::foods::{FoodDataClient, FoodLookup};
use crate::storage::{KeyValueStore, SqliteKv};
use crate::store::EntryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: EntryStore,
    pub foods: Arc<dyn FoodLookup>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// SQLite-backed store plus the live FoodData Central client.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let pool = crate::db::connect(&config).await?;
        let kv = Arc::new(SqliteKv::new(pool)) as Arc<dyn KeyValueStore>;
        let foods = Arc::new(FoodDataClient::new(&config.food_data)) as Arc<dyn FoodLookup>;
        tracing::info!(database_url = %config.database_url, "glucotrack state initialised");
        Ok(Self::from_parts(kv, foods, Arc::new(config)))
    }

    pub fn from_parts(
        kv: Arc<dyn KeyValueStore>,
        foods: Arc<dyn FoodLookup>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            store: EntryStore::new(kv),
            foods,
            config,
        }
    }

    /// In-memory store and a canned two-food catalog.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::FoodDataConfig;
        use crate::error::RequestError;
        use crate::foods::{Food, SearchResult};
        use crate::meals::nutrients::nutrient_tests::food_with;
        use crate::storage::MemoryKv;
        use async_trait::async_trait;

        struct FakeFoods {
            catalog: Vec<Food>,
        }

        #[async_trait]
        impl FoodLookup for FakeFoods {
            async fn search(
                &self,
                query: &str,
                page: u32,
                page_size: u32,
            ) -> Result<SearchResult, RequestError> {
                let needle = query.to_lowercase();
                let foods: Vec<Food> = self
                    .catalog
                    .iter()
                    .filter(|f| f.description.to_lowercase().contains(&needle))
                    .take(page_size as usize)
                    .cloned()
                    .collect();
                Ok(SearchResult {
                    total_hits: foods.len() as u64,
                    foods,
                    current_page: page,
                    total_pages: 1,
                })
            }
            async fn get_food(&self, fdc_id: u64) -> Result<Food, RequestError> {
                self.catalog
                    .iter()
                    .find(|f| f.fdc_id == fdc_id)
                    .cloned()
                    .ok_or_else(|| RequestError::Api {
                        status: 404,
                        body: format!("food {} not found", fdc_id),
                    })
            }
            async fn get_foods(&self, fdc_ids: &[u64]) -> Result<Vec<Food>, RequestError> {
                Ok(self
                    .catalog
                    .iter()
                    .filter(|f| fdc_ids.contains(&f.fdc_id))
                    .cloned()
                    .collect())
            }
        }

        let mut apple = food_with(&[(1008, 52.0), (1005, 13.8), (1003, 0.3), (2000, 10.4)]);
        apple.fdc_id = 171688;
        apple.description = "Apples, raw, with skin".into();
        let mut rice = food_with(&[(1008, 130.0), (1005, 28.0), (1003, 2.7), (1004, 0.3)]);
        rice.fdc_id = 169756;
        rice.description = "Rice, white, cooked".into();

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            max_connections: 1,
            food_data: FoodDataConfig {
                api_key: "test".into(),
                base_url: "http://fake.local".into(),
                page_size: 20,
            },
        });

        Self::from_parts(
            Arc::new(MemoryKv::new()),
            Arc::new(FakeFoods {
                catalog: vec![apple, rice],
            }),
            config,
        )
    }
}

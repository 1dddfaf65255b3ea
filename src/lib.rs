//! Meal and blood-sugar logging: an entry store over a local key-value
//! backend, nutrient totals, weekly insights and a FoodData Central client.

pub mod config;
pub mod days;
pub mod db;
pub mod error;
pub mod foods;
pub mod glucose;
pub mod insights;
pub mod meals;
pub mod state;
pub mod storage;
pub mod store;
pub mod telemetry;

pub use config::AppConfig;
pub use error::{AppError, RequestError, StoreError, ValidationError};
pub use state::AppState;
pub use store::EntryStore;

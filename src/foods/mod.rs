pub mod client;
pub mod dto;

pub use client::{FoodDataClient, FoodLookup};
pub use dto::{Food, FoodNutrient, SearchResult};

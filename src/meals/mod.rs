pub mod nutrients;
pub mod repo_types;
pub mod services;

pub use nutrients::{summarize, NutrientKind, NutrientSummary};
pub use repo_types::{MealEntry, MealType};

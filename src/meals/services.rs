use serde::Serialize;
use time::{Date, OffsetDateTime, UtcOffset};
use tracing::{info, instrument};
use uuid::Uuid;

use super::nutrients::{summarize, NutrientSummary};
use super::repo_types::{MealEntry, MealType};
use crate::days::on_local_day;
use crate::error::{parse_positive, AppError, RequestError, StoreError};
use crate::foods::{Food, SearchResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MealGroup {
    pub meal_type: MealType,
    pub entries: Vec<MealEntry>,
}

/// One day of the food log.
#[derive(Debug, Serialize)]
pub struct MealDay {
    pub date: Date,
    pub groups: Vec<MealGroup>,
    pub summary: NutrientSummary,
}

impl MealDay {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// First page of results for `query`. A blank query makes no request.
#[instrument(skip(st))]
pub async fn search_foods(st: &AppState, query: &str) -> Result<SearchResult, RequestError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchResult::empty());
    }
    st.foods
        .search(query, 1, st.config.food_data.page_size)
        .await
}

#[instrument(skip(st, food), fields(fdc_id = food.fdc_id))]
pub async fn log_meal(
    st: &AppState,
    food: Food,
    serving_size: &str,
    meal_type: MealType,
    now: OffsetDateTime,
) -> Result<MealEntry, AppError> {
    let serving_size = parse_positive("serving size", serving_size)?;
    let entry = MealEntry::new(food, serving_size, meal_type, now);
    st.store.save_meal(entry.clone()).await?;
    info!(id = %entry.id, meal_type = entry.meal_type.as_str(), serving_size, "meal logged");
    Ok(entry)
}

/// Validates the serving size, then fetches the food's details and logs it.
#[instrument(skip(st))]
pub async fn log_meal_by_id(
    st: &AppState,
    fdc_id: u64,
    serving_size: &str,
    meal_type: MealType,
    now: OffsetDateTime,
) -> Result<MealEntry, AppError> {
    parse_positive("serving size", serving_size)?;
    let food = st.foods.get_food(fdc_id).await?;
    log_meal(st, food, serving_size, meal_type, now).await
}

/// Entries logged on `date` (at `offset`), newest first, grouped by meal.
pub async fn meal_day(st: &AppState, date: Date, offset: UtcOffset) -> Result<MealDay, StoreError> {
    let mut entries: Vec<MealEntry> = st
        .store
        .list_meals()
        .await?
        .into_iter()
        .filter(|e| on_local_day(e.timestamp, date, offset))
        .collect();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let summary = summarize(&entries);
    let groups = MealType::ALL
        .into_iter()
        .filter_map(|meal_type| {
            let group: Vec<MealEntry> = entries
                .iter()
                .filter(|e| e.meal_type == meal_type)
                .cloned()
                .collect();
            (!group.is_empty()).then_some(MealGroup {
                meal_type,
                entries: group,
            })
        })
        .collect();

    Ok(MealDay {
        date,
        groups,
        summary,
    })
}

#[instrument(skip(st))]
pub async fn delete_meal(st: &AppState, id: Uuid) -> Result<(), StoreError> {
    st.store.delete_meal(id).await
}

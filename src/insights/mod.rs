//! Observations over the last week of readings and meals.
//!
//! Rules run in a fixed order and every rule that matches adds one insight;
//! when none match the list holds a single prompt to start tracking.

pub mod trends;

use std::fmt;

use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};
use tracing::instrument;

use crate::days::{round_to, within_last_days};
use crate::error::StoreError;
use crate::glucose::repo_types::{LOW_BELOW_MG_DL, NORMAL_MAX_MG_DL};
use crate::glucose::GlucoseReading;
use crate::meals::{summarize, MealEntry};
use crate::state::AppState;

pub use trends::{daily_trends, DailyStats};

pub const WINDOW_DAYS: i64 = 7;
const DAILY_CARBS_LIMIT_G: f64 = 200.0;
const CARB_CALORIE_SHARE_LIMIT: f64 = 0.5;
const KCAL_PER_GRAM_CARB: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    AverageGlucose { average: f64 },
    HighReadings { count: usize },
    LowReadings { count: usize },
    InRange,
    DailyIntake { calories: f64, carbs: f64 },
    ReduceCarbs,
    HighCarbRatio,
    StartTracking,
}

fn plural(count: usize) -> &'static str {
    if count > 1 {
        "s"
    } else {
        ""
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::AverageGlucose { average } => write!(
                f,
                "Your average blood sugar over the last 7 days is {:.1} mg/dL.",
                round_to(*average, 1)
            ),
            Insight::HighReadings { count } => write!(
                f,
                "You had {} high reading{} (>140 mg/dL) in the past week.",
                count,
                plural(*count)
            ),
            Insight::LowReadings { count } => write!(
                f,
                "You had {} low reading{} (<70 mg/dL) in the past week. {}",
                count,
                plural(*count),
                "Consider adjusting your diet or medication."
            ),
            Insight::InRange => {
                f.write_str("Great job! Your blood sugar levels have been in the normal range.")
            }
            Insight::DailyIntake { calories, carbs } => write!(
                f,
                "Your average daily intake is {:.0} calories and {:.0}g carbs.",
                round_to(*calories, 0),
                round_to(*carbs, 0)
            ),
            Insight::ReduceCarbs => f.write_str(
                "Consider reducing carbohydrate intake to help manage blood sugar levels.",
            ),
            Insight::HighCarbRatio => f.write_str(concat!(
                "Your diet is high in carbohydrates. ",
                "Try incorporating more protein and healthy fats."
            )),
            Insight::StartTracking => {
                f.write_str("Start tracking your food and blood sugar to see insights here!")
            }
        }
    }
}

/// Evaluates the insight rules over entries within `[now - 7 days, now]`.
pub fn generate(
    readings: &[GlucoseReading],
    meals: &[MealEntry],
    now: OffsetDateTime,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    let levels: Vec<f64> = readings
        .iter()
        .filter(|r| within_last_days(r.timestamp, now, WINDOW_DAYS))
        .map(|r| r.level)
        .collect();

    if !levels.is_empty() {
        let average = levels.iter().sum::<f64>() / levels.len() as f64;
        // strictly above the normal range; 140 itself is still normal
        let high = levels.iter().filter(|&&l| l > NORMAL_MAX_MG_DL).count();
        let low = levels.iter().filter(|&&l| l < LOW_BELOW_MG_DL).count();

        insights.push(Insight::AverageGlucose { average });
        if high > 0 {
            insights.push(Insight::HighReadings { count: high });
        }
        if low > 0 {
            insights.push(Insight::LowReadings { count: low });
        }
        if (LOW_BELOW_MG_DL..=NORMAL_MAX_MG_DL).contains(&average) && high == 0 && low == 0 {
            insights.push(Insight::InRange);
        }
    }

    let recent_meals: Vec<&MealEntry> = meals
        .iter()
        .filter(|m| within_last_days(m.timestamp, now, WINDOW_DAYS))
        .collect();

    if !recent_meals.is_empty() {
        let totals = summarize(recent_meals.iter().copied());
        // a fixed week, not the number of days that have entries
        let calories = totals.calories / WINDOW_DAYS as f64;
        let carbs = totals.carbs / WINDOW_DAYS as f64;

        insights.push(Insight::DailyIntake { calories, carbs });
        if carbs > DAILY_CARBS_LIMIT_G {
            insights.push(Insight::ReduceCarbs);
        }
        if totals.calories > 0.0
            && totals.carbs * KCAL_PER_GRAM_CARB / totals.calories > CARB_CALORIE_SHARE_LIMIT
        {
            insights.push(Insight::HighCarbRatio);
        }
    }

    if insights.is_empty() {
        insights.push(Insight::StartTracking);
    }
    insights
}

pub fn messages(insights: &[Insight]) -> Vec<String> {
    insights.iter().map(ToString::to_string).collect()
}

/// Everything the trends view shows.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub trends: Vec<DailyStats>,
    pub insights: Vec<Insight>,
}

#[instrument(skip(st))]
pub async fn dashboard(
    st: &AppState,
    now: OffsetDateTime,
    offset: UtcOffset,
) -> Result<Dashboard, StoreError> {
    let readings = st.store.list_readings().await?;
    let meals = st.store.list_meals().await?;
    Ok(Dashboard {
        trends: daily_trends(&readings, &meals, now, offset, WINDOW_DAYS as u32),
        insights: generate(&readings, &meals, now),
    })
}

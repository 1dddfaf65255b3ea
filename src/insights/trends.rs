use serde::Serialize;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

use crate::days::{local_date, on_local_day, round_to};
use crate::glucose::services::average_level;
use crate::glucose::GlucoseReading;
use crate::meals::{summarize, MealEntry};

/// Per-day totals for the trend charts. Empty measurements are `None` so a
/// chart can skip the point instead of plotting zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStats {
    pub date: Date,
    /// mg/dL, one decimal.
    pub average_glucose: Option<f64>,
    pub readings: usize,
    /// kcal, whole number.
    pub calories: Option<f64>,
    /// grams, one decimal.
    pub carbs: Option<f64>,
    pub protein: f64,
    pub fat: f64,
}

/// One entry per local calendar day, oldest first, ending with the day of `now`.
pub fn daily_trends(
    readings: &[GlucoseReading],
    meals: &[MealEntry],
    now: OffsetDateTime,
    offset: UtcOffset,
    days: u32,
) -> Vec<DailyStats> {
    let today = local_date(now, offset);
    (0..days)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back as i64);
            let day_readings: Vec<GlucoseReading> = readings
                .iter()
                .filter(|r| on_local_day(r.timestamp, date, offset))
                .cloned()
                .collect();
            let totals = summarize(
                meals
                    .iter()
                    .filter(|m| on_local_day(m.timestamp, date, offset)),
            );

            DailyStats {
                date,
                average_glucose: average_level(&day_readings).map(|avg| round_to(avg, 1)),
                readings: day_readings.len(),
                calories: (totals.calories > 0.0).then(|| round_to(totals.calories, 0)),
                carbs: (totals.carbs > 0.0).then(|| round_to(totals.carbs, 1)),
                protein: totals.protein,
                fat: totals.fat,
            }
        })
        .collect()
}

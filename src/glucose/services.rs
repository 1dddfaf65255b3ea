use serde::Serialize;
use time::{Date, OffsetDateTime, UtcOffset};
use tracing::{info, instrument};
use uuid::Uuid;

use super::repo_types::{GlucoseReading, GlucoseStatus, ReadingContext};
use crate::days::on_local_day;
use crate::error::{parse_positive, AppError, StoreError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GlucoseDay {
    pub date: Date,
    pub readings: Vec<GlucoseReading>,
    /// `None` when nothing was logged that day.
    pub average: Option<f64>,
}

impl GlucoseDay {
    pub fn count(&self) -> usize {
        self.readings.len()
    }

    pub fn average_status(&self) -> Option<GlucoseStatus> {
        self.average.map(GlucoseStatus::classify)
    }
}

pub fn average_level(readings: &[GlucoseReading]) -> Option<f64> {
    if readings.is_empty() {
        return None;
    }
    Some(readings.iter().map(|r| r.level).sum::<f64>() / readings.len() as f64)
}

/// Validates `level`, then stores a reading stamped `now`. Blank notes are
/// dropped and a missing context is recorded as `random`.
#[instrument(skip(st, notes))]
pub async fn log_reading(
    st: &AppState,
    level: &str,
    context: Option<ReadingContext>,
    notes: &str,
    now: OffsetDateTime,
) -> Result<GlucoseReading, AppError> {
    let level = parse_positive("blood sugar level", level)?;
    let context = context.unwrap_or(ReadingContext::Random);
    let notes = Some(notes.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    let reading = GlucoseReading::new(level, now, notes, Some(context));
    st.store.save_reading(reading.clone()).await?;
    info!(
        id = %reading.id,
        level,
        context = context.label(),
        status = %reading.status(),
        "glucose reading logged"
    );
    Ok(reading)
}

pub async fn glucose_day(
    st: &AppState,
    date: Date,
    offset: UtcOffset,
) -> Result<GlucoseDay, StoreError> {
    let mut readings: Vec<GlucoseReading> = st
        .store
        .list_readings()
        .await?
        .into_iter()
        .filter(|r| on_local_day(r.timestamp, date, offset))
        .collect();
    readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    let average = average_level(&readings);
    Ok(GlucoseDay {
        date,
        readings,
        average,
    })
}

#[instrument(skip(st))]
pub async fn delete_reading(st: &AppState, id: Uuid) -> Result<(), StoreError> {
    st.store.delete_reading(id).await
}

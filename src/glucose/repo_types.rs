use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Below this a reading is low.
pub const LOW_BELOW_MG_DL: f64 = 70.0;
/// Upper bound (inclusive) of the normal range.
pub const NORMAL_MAX_MG_DL: f64 = 140.0;
/// Upper bound (inclusive) of the elevated range.
pub const ELEVATED_MAX_MG_DL: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingContext {
    Fasting,
    BeforeMeal,
    AfterMeal,
    Bedtime,
    Random,
}

impl ReadingContext {
    pub fn label(self) -> &'static str {
        match self {
            ReadingContext::Fasting => "fasting",
            ReadingContext::BeforeMeal => "before meal",
            ReadingContext::AfterMeal => "after meal",
            ReadingContext::Bedtime => "bedtime",
            ReadingContext::Random => "random",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlucoseReading {
    pub id: Uuid,
    /// mg/dL.
    pub level: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ReadingContext>,
}

impl GlucoseReading {
    pub fn new(
        level: f64,
        timestamp: OffsetDateTime,
        notes: Option<String>,
        context: Option<ReadingContext>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            timestamp,
            notes,
            context,
        }
    }

    pub fn status(&self) -> GlucoseStatus {
        GlucoseStatus::classify(self.level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GlucoseStatus {
    Low,
    Normal,
    Elevated,
    High,
}

impl GlucoseStatus {
    pub fn classify(level: f64) -> Self {
        if level < LOW_BELOW_MG_DL {
            GlucoseStatus::Low
        } else if level <= NORMAL_MAX_MG_DL {
            GlucoseStatus::Normal
        } else if level <= ELEVATED_MAX_MG_DL {
            GlucoseStatus::Elevated
        } else {
            GlucoseStatus::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GlucoseStatus::Low => "Low",
            GlucoseStatus::Normal => "Normal",
            GlucoseStatus::Elevated => "Elevated",
            GlucoseStatus::High => "High",
        }
    }
}

impl fmt::Display for GlucoseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod status_tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn classification_boundaries() {
        assert_eq!(GlucoseStatus::classify(69.999), GlucoseStatus::Low);
        assert_eq!(GlucoseStatus::classify(70.0), GlucoseStatus::Normal);
        assert_eq!(GlucoseStatus::classify(140.0), GlucoseStatus::Normal);
        assert_eq!(GlucoseStatus::classify(140.0001), GlucoseStatus::Elevated);
        assert_eq!(GlucoseStatus::classify(180.0), GlucoseStatus::Elevated);
        assert_eq!(GlucoseStatus::classify(180.0001), GlucoseStatus::High);
    }

    #[test]
    fn status_text() {
        assert_eq!(GlucoseStatus::classify(55.0).to_string(), "Low");
        assert_eq!(GlucoseStatus::classify(250.0).to_string(), "High");
    }

    #[test]
    fn context_labels_read_as_words() {
        assert_eq!(ReadingContext::BeforeMeal.label(), "before meal");
        assert_eq!(ReadingContext::AfterMeal.label(), "after meal");
        assert_eq!(ReadingContext::Fasting.label(), "fasting");
    }

    #[test]
    fn reading_serializes_with_kebab_context() {
        let reading = GlucoseReading::new(
            112.5,
            datetime!(2025-03-01 07:30 +01:00),
            Some("after run".into()),
            Some(ReadingContext::BeforeMeal),
        );
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["context"], "before-meal");
        assert_eq!(json["timestamp"], "2025-03-01T07:30:00+01:00");
        assert_eq!(json["notes"], "after run");

        let back: GlucoseReading = serde_json::from_value(json).unwrap();
        assert_eq!(back, reading);
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let json = r#"{"id":"6f1c1e8e-2d4b-4c69-9a57-2f0f3c7e5a11","level":98,"timestamp":"2025-03-01T07:30:00Z"}"#;
        let reading: GlucoseReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.level, 98.0);
        assert_eq!(reading.notes, None);
        assert_eq!(reading.context, None);
        assert_eq!(reading.status(), GlucoseStatus::Normal);
    }
}

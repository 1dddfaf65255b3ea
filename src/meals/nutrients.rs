//! Nutrient totals over logged meals.
//!
//! FoodData Central reports every nutrient per 100 g, so each entry's values
//! are scaled by `serving_size / 100` before summing.

use serde::Serialize;

use super::repo_types::MealEntry;
use crate::days::round_to;

/// The tracked nutrients, keyed by FoodData Central nutrient id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NutrientKind {
    Energy,
    Protein,
    Fat,
    Carbohydrate,
    Fiber,
    Sugar,
}

impl NutrientKind {
    pub const ALL: [NutrientKind; 6] = [
        NutrientKind::Energy,
        NutrientKind::Protein,
        NutrientKind::Fat,
        NutrientKind::Carbohydrate,
        NutrientKind::Fiber,
        NutrientKind::Sugar,
    ];

    pub fn nutrient_id(self) -> u32 {
        match self {
            NutrientKind::Energy => 1008,
            NutrientKind::Protein => 1003,
            NutrientKind::Fat => 1004,
            NutrientKind::Carbohydrate => 1005,
            NutrientKind::Fiber => 1079,
            NutrientKind::Sugar => 2000,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutrientSummary {
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
}

impl NutrientSummary {
    fn add(&mut self, kind: NutrientKind, amount: f64) {
        let slot = match kind {
            NutrientKind::Energy => &mut self.calories,
            NutrientKind::Protein => &mut self.protein,
            NutrientKind::Fat => &mut self.fat,
            NutrientKind::Carbohydrate => &mut self.carbs,
            NutrientKind::Fiber => &mut self.fiber,
            NutrientKind::Sugar => &mut self.sugar,
        };
        *slot += amount;
    }
}

/// Amount of `kind` contributed by one entry; 0 when the food lacks it.
pub fn nutrient_value(entry: &MealEntry, kind: NutrientKind) -> f64 {
    match entry.food.nutrient(kind.nutrient_id()) {
        Some(n) => (n.value * entry.serving_size / 100.0).max(0.0),
        None => 0.0,
    }
}

pub fn summarize<'a, I>(entries: I) -> NutrientSummary
where
    I: IntoIterator<Item = &'a MealEntry>,
{
    let mut summary = NutrientSummary::default();
    for entry in entries {
        for kind in NutrientKind::ALL {
            summary.add(kind, nutrient_value(entry, kind));
        }
    }
    summary
}

/// Fixed decimals with halves rounded away from zero (`2.5` -> `"3"`).
pub fn format_nutrient(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, round_to(value, decimals as i32))
}

#[cfg(test)]
pub(crate) mod nutrient_tests {
    use super::*;
    use crate::foods::{Food, FoodNutrient};
    use crate::meals::MealType;
    use time::macros::datetime;

    pub(crate) fn food_with(nutrients: &[(u32, f64)]) -> Food {
        Food {
            fdc_id: 1,
            description: "test food".into(),
            data_type: None,
            brand_owner: None,
            food_nutrients: nutrients
                .iter()
                .map(|&(id, value)| FoodNutrient {
                    nutrient_id: id,
                    nutrient_name: format!("n{id}"),
                    nutrient_number: None,
                    unit_name: "G".into(),
                    value,
                })
                .collect(),
        }
    }

    fn entry(nutrients: &[(u32, f64)], serving: f64) -> MealEntry {
        MealEntry::new(
            food_with(nutrients),
            serving,
            MealType::Lunch,
            datetime!(2025-03-01 12:00 UTC),
        )
    }

    #[test]
    fn scales_by_serving_size() {
        let e = entry(&[(1008, 52.0), (1005, 13.8)], 150.0);
        assert!((nutrient_value(&e, NutrientKind::Energy) - 78.0).abs() < 1e-9);
        assert!((nutrient_value(&e, NutrientKind::Carbohydrate) - 20.7).abs() < 1e-9);
    }

    #[test]
    fn zero_serving_contributes_nothing() {
        let e = entry(&[(1008, 52.0)], 0.0);
        assert_eq!(nutrient_value(&e, NutrientKind::Energy), 0.0);
    }

    #[test]
    fn missing_nutrient_contributes_nothing() {
        let e = entry(&[(1008, 52.0)], 100.0);
        assert_eq!(nutrient_value(&e, NutrientKind::Fiber), 0.0);
    }

    #[test]
    fn empty_summary_is_zero() {
        assert_eq!(summarize(&Vec::<MealEntry>::new()), NutrientSummary::default());
    }

    #[test]
    fn sums_all_six_kinds() {
        let a = entry(
            &[
                (1008, 100.0),
                (1005, 20.0),
                (1003, 10.0),
                (1004, 5.0),
                (1079, 2.0),
                (2000, 8.0),
            ],
            200.0,
        );
        let b = entry(&[(1008, 50.0), (1005, 10.0)], 100.0);
        let s = summarize(&[a, b]);
        assert_eq!(s.calories, 250.0);
        assert_eq!(s.carbs, 50.0);
        assert_eq!(s.protein, 20.0);
        assert_eq!(s.fat, 10.0);
        assert_eq!(s.fiber, 4.0);
        assert_eq!(s.sugar, 16.0);
    }

    #[test]
    fn order_does_not_matter() {
        let a = entry(&[(1008, 52.0), (1005, 13.8)], 150.0);
        let b = entry(&[(1008, 89.0), (1003, 1.1)], 120.0);
        let c = entry(&[(1004, 17.0)], 30.0);
        let forward = summarize(&[a.clone(), b.clone(), c.clone()]);
        let backward = summarize(&[c, b, a]);
        assert!((forward.calories - backward.calories).abs() < 1e-9);
        assert!((forward.carbs - backward.carbs).abs() < 1e-9);
        assert!((forward.protein - backward.protein).abs() < 1e-9);
        assert!((forward.fat - backward.fat).abs() < 1e-9);
    }

    #[test]
    fn negative_source_values_do_not_go_below_zero() {
        let e = entry(&[(1004, -3.0)], 100.0);
        assert_eq!(summarize(&[e]).fat, 0.0);
    }

    #[test]
    fn formats_fixed_decimals() {
        assert_eq!(format_nutrient(42.857, 1), "42.9");
        assert_eq!(format_nutrient(285.71, 0), "286");
        assert_eq!(format_nutrient(2.5, 0), "3");
        assert_eq!(format_nutrient(101.25, 1), "101.3");
    }
}

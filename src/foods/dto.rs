use serde::{Deserialize, Deserializer, Serialize};

/// A FoodData Central catalog item. Meal entries embed a full copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub fdc_id: u64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_owner: Option<String>,
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrient>,
}

impl Food {
    pub fn nutrient(&self, nutrient_id: u32) -> Option<&FoodNutrient> {
        self.food_nutrients
            .iter()
            .find(|n| n.nutrient_id == nutrient_id)
    }
}

/// A nutrient measurement, per 100 g of the food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawFoodNutrient")]
pub struct FoodNutrient {
    pub nutrient_id: u32,
    pub nutrient_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrient_number: Option<String>,
    pub unit_name: String,
    pub value: f64,
}

/// Search results list nutrients flat; the single-food endpoint nests them
/// under `nutrient` with the measurement in `amount`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFoodNutrient {
    #[serde(rename_all = "camelCase")]
    Flat {
        nutrient_id: u32,
        #[serde(default)]
        nutrient_name: String,
        #[serde(default)]
        nutrient_number: Option<String>,
        #[serde(default)]
        unit_name: String,
        #[serde(default)]
        value: f64,
    },
    Nested {
        nutrient: NestedNutrient,
        #[serde(default)]
        amount: f64,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NestedNutrient {
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    number: Option<String>,
    #[serde(default)]
    unit_name: String,
}

impl From<RawFoodNutrient> for FoodNutrient {
    fn from(raw: RawFoodNutrient) -> Self {
        match raw {
            RawFoodNutrient::Flat {
                nutrient_id,
                nutrient_name,
                nutrient_number,
                unit_name,
                value,
            } => Self {
                nutrient_id,
                nutrient_name,
                nutrient_number,
                unit_name,
                value,
            },
            RawFoodNutrient::Nested { nutrient, amount } => Self {
                nutrient_id: nutrient.id,
                nutrient_name: nutrient.name,
                nutrient_number: nutrient.number,
                unit_name: nutrient.unit_name,
                value: amount,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub foods: Vec<Food>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_hits: u64,
    #[serde(default = "first_page", deserialize_with = "page_or_first")]
    pub current_page: u32,
    #[serde(default = "first_page", deserialize_with = "page_or_first")]
    pub total_pages: u32,
}

fn first_page() -> u32 {
    1
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Page numbers start at 1; `null` and `0` read as the first page.
fn page_or_first<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?
        .filter(|&p| p > 0)
        .unwrap_or_else(first_page))
}

impl SearchResult {
    pub fn empty() -> Self {
        Self {
            foods: Vec::new(),
            total_hits: 0,
            current_page: 1,
            total_pages: 1,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FoodsByIdRequest<'a> {
    pub fdc_ids: &'a [u64],
    #[serde(rename = "api_key")]
    pub api_key: &'a str,
}

#[cfg(test)]
mod dto_tests {
    use super::*;

    #[test]
    fn decodes_flat_search_nutrients() {
        let json = r#"{
            "fdcId": 171688,
            "description": "Apples, raw, with skin",
            "dataType": "SR Legacy",
            "foodNutrients": [
                {"nutrientId": 1008, "nutrientName": "Energy", "nutrientNumber": "208", "unitName": "KCAL", "value": 52.0},
                {"nutrientId": 1005, "nutrientName": "Carbohydrate, by difference", "unitName": "G", "value": 13.8}
            ]
        }"#;
        let food: Food = serde_json::from_str(json).unwrap();
        assert_eq!(food.fdc_id, 171688);
        assert_eq!(food.brand_owner, None);
        assert_eq!(food.food_nutrients.len(), 2);
        assert_eq!(food.nutrient(1008).unwrap().value, 52.0);
        assert_eq!(food.nutrient(1005).unwrap().nutrient_number, None);
        assert!(food.nutrient(1003).is_none());
    }

    #[test]
    fn decodes_nested_detail_nutrients() {
        let json = r#"{
            "fdcId": 2346393,
            "description": "Banana, raw",
            "brandOwner": "Fresh Co",
            "foodNutrients": [
                {"type": "FoodNutrient", "id": 1, "amount": 89.0,
                 "nutrient": {"id": 1008, "number": "208", "name": "Energy", "unitName": "kcal"}},
                {"type": "FoodNutrient", "id": 2,
                 "nutrient": {"id": 2000, "name": "Sugars, total", "unitName": "g"}}
            ]
        }"#;
        let food: Food = serde_json::from_str(json).unwrap();
        assert_eq!(food.brand_owner.as_deref(), Some("Fresh Co"));
        let energy = food.nutrient(1008).unwrap();
        assert_eq!(energy.value, 89.0);
        assert_eq!(energy.unit_name, "kcal");
        assert_eq!(energy.nutrient_number.as_deref(), Some("208"));
        assert_eq!(food.nutrient(2000).unwrap().value, 0.0);
    }

    #[test]
    fn serializes_nutrients_flat() {
        let nutrient = FoodNutrient {
            nutrient_id: 1003,
            nutrient_name: "Protein".into(),
            nutrient_number: None,
            unit_name: "G".into(),
            value: 3.2,
        };
        let json = serde_json::to_value(&nutrient).unwrap();
        assert_eq!(json["nutrientId"], 1003);
        assert_eq!(json["value"], 3.2);
        assert!(json.get("nutrientNumber").is_none());
        let back: FoodNutrient = serde_json::from_value(json).unwrap();
        assert_eq!(back, nutrient);
    }

    #[test]
    fn search_result_defaults_missing_paging() {
        let result: SearchResult = serde_json::from_str("{}").unwrap();
        assert_eq!(result, SearchResult::empty());
    }

    #[test]
    fn search_result_tolerates_null_and_zero_paging() {
        let json = r#"{"foods":null,"totalHits":null,"currentPage":0,"totalPages":null}"#;
        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result, SearchResult::empty());

        let json = r#"{"foods":[],"totalHits":12,"currentPage":2,"totalPages":3}"#;
        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert_eq!((result.total_hits, result.current_page, result.total_pages), (12, 2, 3));
    }

    #[test]
    fn foods_by_id_body_shape() {
        let body = FoodsByIdRequest {
            fdc_ids: &[1, 2],
            api_key: "k",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"fdcIds": [1, 2], "api_key": "k"}));
    }
}

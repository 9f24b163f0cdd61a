//! Recipe record type.

use serde::{Deserialize, Serialize};

use crate::types::RecordId;

/// A recipe as stored by the records service.
///
/// `id` and `created_at` are assigned by the store and absent until the
/// recipe has been created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(rename = "uuid", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// RFC 3339 creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default)]
    pub name: String,

    /// Number of people the recipe serves.
    #[serde(default)]
    pub suitable_for: u32,

    /// Ordered ingredient lines; never empty once submitted.
    #[serde(default)]
    pub ingredients: Vec<String>,

    #[serde(default)]
    pub cooking_instruction: String,

    #[serde(default, alias = "isVegetarian")]
    pub vegetarian: bool,
}

impl Recipe {
    /// An unsaved recipe with a single blank ingredient slot.
    pub fn blank() -> Self {
        Self {
            id: None,
            created_at: None,
            name: String::new(),
            suitable_for: 0,
            ingredients: vec![String::new()],
            cooking_instruction: String::new(),
            vegetarian: false,
        }
    }
}

impl Default for Recipe {
    fn default() -> Self {
        Self::blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_recipe_has_one_empty_ingredient() {
        let recipe = Recipe::blank();
        assert_eq!(recipe.ingredients, vec![String::new()]);
        assert!(recipe.id.is_none());
    }

    #[test]
    fn deserializes_service_response() {
        let recipe: Recipe = serde_json::from_value(json!({
            "uuid": "5f1c2b9e-0b7a-4a55-9d1e-2f3c4d5e6f70",
            "createdAt": "2024-03-01T10:00:00Z",
            "name": "Tomato soup",
            "vegetarian": true,
            "suitableFor": 4,
            "ingredients": ["tomatoes", "salt"],
            "cookingInstruction": "Boil."
        }))
        .unwrap();

        assert_eq!(
            recipe.id.as_ref().map(|id| id.as_str()),
            Some("5f1c2b9e-0b7a-4a55-9d1e-2f3c4d5e6f70")
        );
        assert_eq!(recipe.suitable_for, 4);
        assert!(recipe.vegetarian);
        assert_eq!(recipe.ingredients.len(), 2);
    }

    #[test]
    fn unsaved_recipe_omits_store_fields() {
        let mut recipe = Recipe::blank();
        recipe.name = "Pancakes".to_string();
        let value = serde_json::to_value(&recipe).unwrap();
        assert!(value.get("uuid").is_none());
        assert!(value.get("createdAt").is_none());
        assert_eq!(value["cookingInstruction"], "");
    }
}

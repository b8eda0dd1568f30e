/*
 * Responsibility
 * - Drinks request/response DTOs
 * - The two projections: summary (short: color + parts only) and detail (long: full recipe)
 * - validate() does shape checks only; storage errors are the handler's business
 */
use serde::{Deserialize, Serialize};

use crate::repos::DrinkRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

/// Clients send either a list of ingredients or a single ingredient object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl RecipeInput {
    pub fn into_ingredients(self) -> Vec<Ingredient> {
        match self {
            RecipeInput::Many(list) => list,
            RecipeInput::One(one) => vec![one],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

impl CreateDrinkRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        match &self.title {
            Some(title) if !title.trim().is_empty() => {}
            _ => return Err("title is required"),
        }
        match &self.recipe {
            None => return Err("recipe is required"),
            Some(RecipeInput::Many(list)) if list.is_empty() => {
                return Err("recipe needs at least one ingredient");
            }
            Some(_) => {}
        }

        Ok(())
    }
}

/// Partial update. Absent or empty fields leave the stored value alone.
#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

impl UpdateDrinkRequest {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn into_recipe(self) -> Option<Vec<Ingredient>> {
        self.recipe
            .map(RecipeInput::into_ingredients)
            .filter(|list| !list.is_empty())
    }
}

/// A stored drink with its recipe decoded. Serializes as the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Drink {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientSummary {
    pub color: String,
    pub parts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrinkSummary {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<IngredientSummary>,
}

impl Drink {
    pub fn summary(&self) -> DrinkSummary {
        DrinkSummary {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|i| IngredientSummary {
                    color: i.color.clone(),
                    parts: i.parts,
                })
                .collect(),
        }
    }
}

impl TryFrom<DrinkRow> for Drink {
    type Error = serde_json::Error;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            recipe: serde_json::from_str(&row.recipe)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    pub delete: i32,
}

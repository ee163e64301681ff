use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Ingredient record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub unit_of_measure: String,
}

/// Recipe record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: i32,
    pub name: String,
    pub preparation_method: Option<String>,
}

/// Row of `recipe_ingredients`, tying one recipe to one ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RecipeIngredient {
    pub id: i32,
    pub ingredient_id: i32,
    pub recipe_id: i32,
    pub quantity: f64,
}

/// A link joined with its ingredient. `id` is the link id; name and unit
/// are read through from the ingredient row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LinkDetail {
    pub id: i32,
    pub name: String,
    pub quantity: f64,
    pub unit_of_measure: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewLink {
    pub ingredient_id: i32,
    pub quantity: f64,
}

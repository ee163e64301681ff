use serde::{Deserialize, Serialize};

use crate::store::{LinkDetail, Recipe};

#[derive(Debug, Clone, Deserialize)]
pub struct IngredientQuantity {
    pub name: String,
    pub quantity: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: Option<String>,
    pub preparation_method: Option<String>,
    pub ingredients: Option<Vec<IngredientQuantity>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRecipeRequest {
    pub name: Option<String>,
    pub preparation_method: Option<String>,
    pub ingredients: Option<Vec<IngredientQuantity>>,
}

#[derive(Debug, Serialize)]
pub struct CreatedRecipeResponse {
    pub message: String,
    pub id: i32,
    pub linked_ingredients: usize,
}

/// A recipe with its ingredient list expanded.
#[derive(Debug, Serialize)]
pub struct RecipeDetails {
    pub id: i32,
    pub name: String,
    pub preparation_method: Option<String>,
    pub ingredients: Vec<LinkDetail>,
}

impl RecipeDetails {
    pub fn new(recipe: Recipe, ingredients: Vec<LinkDetail>) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            preparation_method: recipe.preparation_method,
            ingredients,
        }
    }
}

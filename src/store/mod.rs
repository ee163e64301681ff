//! Persistence layer. One repository trait per entity; handlers only ever
//! see `dyn Store`.
//!
//! Name lookups are not backed by a unique index. Every `find_*_by_name`
//! returns the matching row with the lowest id.

use async_trait::async_trait;

#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod repo_types;

pub use repo_types::{Ingredient, LinkDetail, NewLink, Recipe, RecipeIngredient};

#[async_trait]
pub trait IngredientStore: Send + Sync {
    async fn list_ingredients(&self) -> anyhow::Result<Vec<Ingredient>>;

    async fn find_ingredient_by_name(&self, name: &str) -> anyhow::Result<Option<Ingredient>>;

    async fn create_ingredient(&self, name: &str, unit_of_measure: &str)
        -> anyhow::Result<Ingredient>;

    /// Overwrite the row currently identified by `current_id`, primary key
    /// included. Links that still point at the old id are left alone.
    async fn update_ingredient(
        &self,
        current_id: i32,
        changes: &Ingredient,
    ) -> anyhow::Result<Ingredient>;

    /// Delete every link referencing the ingredient, then the ingredient,
    /// in one transaction. Returns the number of links removed.
    async fn delete_ingredient(&self, id: i32) -> anyhow::Result<u64>;
}

#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn list_recipes(&self) -> anyhow::Result<Vec<Recipe>>;

    async fn find_recipe_by_name(&self, name: &str) -> anyhow::Result<Option<Recipe>>;

    async fn create_recipe(
        &self,
        name: &str,
        preparation_method: Option<&str>,
    ) -> anyhow::Result<Recipe>;

    async fn update_recipe(&self, recipe: &Recipe) -> anyhow::Result<Recipe>;

    /// Save the recipe fields and drop all of its links in a single commit.
    /// First half of an ingredient replacement.
    async fn update_recipe_clearing_links(&self, recipe: &Recipe) -> anyhow::Result<u64>;

    /// Delete the recipe's links, then the recipe, in one transaction.
    /// Returns the number of links removed.
    async fn delete_recipe(&self, id: i32) -> anyhow::Result<u64>;
}

#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Links of a recipe ordered by link id. Links whose ingredient no
    /// longer exists are not returned.
    async fn links_for_recipe(&self, recipe_id: i32) -> anyhow::Result<Vec<LinkDetail>>;

    /// Insert all links in one transaction: either every link is stored or
    /// none is.
    async fn insert_links(
        &self,
        recipe_id: i32,
        links: &[NewLink],
    ) -> anyhow::Result<Vec<RecipeIngredient>>;
}

pub trait Store: IngredientStore + RecipeStore + LinkStore {}

impl<T> Store for T where T: IngredientStore + RecipeStore + LinkStore {}

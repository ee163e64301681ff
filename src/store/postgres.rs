use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{
    Ingredient, IngredientStore, LinkDetail, LinkStore, NewLink, Recipe, RecipeIngredient,
    RecipeStore,
};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IngredientStore for PgStore {
    async fn list_ingredients(&self) -> anyhow::Result<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name, unit_of_measure
              FROM ingredients
             ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list ingredients")?;
        Ok(rows)
    }

    async fn find_ingredient_by_name(&self, name: &str) -> anyhow::Result<Option<Ingredient>> {
        let row = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name, unit_of_measure
              FROM ingredients
             WHERE name = $1
             ORDER BY id
             LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await
        .context("find ingredient by name")?;
        Ok(row)
    }

    async fn create_ingredient(
        &self,
        name: &str,
        unit_of_measure: &str,
    ) -> anyhow::Result<Ingredient> {
        let row = sqlx::query_as::<_, Ingredient>(
            r#"
            INSERT INTO ingredients (name, unit_of_measure)
            VALUES ($1, $2)
            RETURNING id, name, unit_of_measure
            "#,
        )
        .bind(name)
        .bind(unit_of_measure)
        .fetch_one(&self.db)
        .await
        .context("insert ingredient")?;
        Ok(row)
    }

    async fn update_ingredient(
        &self,
        current_id: i32,
        changes: &Ingredient,
    ) -> anyhow::Result<Ingredient> {
        let row = sqlx::query_as::<_, Ingredient>(
            r#"
            UPDATE ingredients
               SET id = $1, name = $2, unit_of_measure = $3
             WHERE id = $4
            RETURNING id, name, unit_of_measure
            "#,
        )
        .bind(changes.id)
        .bind(&changes.name)
        .bind(&changes.unit_of_measure)
        .bind(current_id)
        .fetch_one(&self.db)
        .await
        .context("update ingredient")?;
        Ok(row)
    }

    async fn delete_ingredient(&self, id: i32) -> anyhow::Result<u64> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        let links = sqlx::query("DELETE FROM recipe_ingredients WHERE ingredient_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("delete links by ingredient")?
            .rows_affected();

        sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("delete ingredient")?;

        tx.commit().await.context("commit tx")?;
        debug!(ingredient_id = id, links, "ingredient deleted");
        Ok(links)
    }
}

#[async_trait]
impl RecipeStore for PgStore {
    async fn list_recipes(&self) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, name, preparation_method
              FROM recipes
             ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list recipes")?;
        Ok(rows)
    }

    async fn find_recipe_by_name(&self, name: &str) -> anyhow::Result<Option<Recipe>> {
        let row = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, name, preparation_method
              FROM recipes
             WHERE name = $1
             ORDER BY id
             LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await
        .context("find recipe by name")?;
        Ok(row)
    }

    async fn create_recipe(
        &self,
        name: &str,
        preparation_method: Option<&str>,
    ) -> anyhow::Result<Recipe> {
        let row = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (name, preparation_method)
            VALUES ($1, $2)
            RETURNING id, name, preparation_method
            "#,
        )
        .bind(name)
        .bind(preparation_method)
        .fetch_one(&self.db)
        .await
        .context("insert recipe")?;
        Ok(row)
    }

    async fn update_recipe(&self, recipe: &Recipe) -> anyhow::Result<Recipe> {
        let row = sqlx::query_as::<_, Recipe>(
            r#"
            UPDATE recipes
               SET name = $1, preparation_method = $2
             WHERE id = $3
            RETURNING id, name, preparation_method
            "#,
        )
        .bind(&recipe.name)
        .bind(&recipe.preparation_method)
        .bind(recipe.id)
        .fetch_one(&self.db)
        .await
        .context("update recipe")?;
        Ok(row)
    }

    async fn update_recipe_clearing_links(&self, recipe: &Recipe) -> anyhow::Result<u64> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        sqlx::query("UPDATE recipes SET name = $1, preparation_method = $2 WHERE id = $3")
            .bind(&recipe.name)
            .bind(&recipe.preparation_method)
            .bind(recipe.id)
            .execute(&mut *tx)
            .await
            .context("update recipe")?;

        let links = sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe.id)
            .execute(&mut *tx)
            .await
            .context("delete links by recipe")?
            .rows_affected();

        tx.commit().await.context("commit tx")?;
        Ok(links)
    }

    async fn delete_recipe(&self, id: i32) -> anyhow::Result<u64> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        let links = sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("delete links by recipe")?
            .rows_affected();

        sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("delete recipe")?;

        tx.commit().await.context("commit tx")?;
        debug!(recipe_id = id, links, "recipe deleted");
        Ok(links)
    }
}

#[async_trait]
impl LinkStore for PgStore {
    async fn links_for_recipe(&self, recipe_id: i32) -> anyhow::Result<Vec<LinkDetail>> {
        let rows = sqlx::query_as::<_, LinkDetail>(
            r#"
            SELECT ri.id, i.name, ri.quantity, i.unit_of_measure
              FROM recipe_ingredients ri
              JOIN ingredients i ON i.id = ri.ingredient_id
             WHERE ri.recipe_id = $1
             ORDER BY ri.id
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&self.db)
        .await
        .context("list links by recipe")?;
        Ok(rows)
    }

    async fn insert_links(
        &self,
        recipe_id: i32,
        links: &[NewLink],
    ) -> anyhow::Result<Vec<RecipeIngredient>> {
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.db.begin().await.context("begin tx")?;
        let mut rows = Vec::with_capacity(links.len());
        for link in links {
            let row = sqlx::query_as::<_, RecipeIngredient>(
                r#"
                INSERT INTO recipe_ingredients (ingredient_id, recipe_id, quantity)
                VALUES ($1, $2, $3)
                RETURNING id, ingredient_id, recipe_id, quantity
                "#,
            )
            .bind(link.ingredient_id)
            .bind(recipe_id)
            .bind(link.quantity)
            .fetch_one(&mut *tx)
            .await
            .context("insert link")?;
            rows.push(row);
        }
        tx.commit().await.context("commit tx")?;

        Ok(rows)
    }
}

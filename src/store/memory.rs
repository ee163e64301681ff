use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{
    Ingredient, IngredientStore, LinkDetail, LinkStore, NewLink, Recipe, RecipeIngredient,
    RecipeStore,
};

#[derive(Default)]
struct Tables {
    ingredients: Vec<Ingredient>,
    recipes: Vec<Recipe>,
    links: Vec<RecipeIngredient>,
    ingredient_seq: i32,
    recipe_seq: i32,
    link_seq: i32,
}

/// In-process store. A single lock over all tables makes each call behave
/// like one committed transaction.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail until turned off again.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn links(&self) -> Vec<RecipeIngredient> {
        self.tables.lock().await.links.clone()
    }

    fn check_writable(&self) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("store is read-only");
        }
        Ok(())
    }
}

fn sorted_by_id<T: Clone>(rows: &[T], id: impl Fn(&T) -> i32) -> Vec<T> {
    let mut out = rows.to_vec();
    out.sort_by_key(|r| id(r));
    out
}

#[async_trait]
impl IngredientStore for MemoryStore {
    async fn list_ingredients(&self) -> anyhow::Result<Vec<Ingredient>> {
        let t = self.tables.lock().await;
        Ok(sorted_by_id(&t.ingredients, |i| i.id))
    }

    async fn find_ingredient_by_name(&self, name: &str) -> anyhow::Result<Option<Ingredient>> {
        let t = self.tables.lock().await;
        Ok(t
            .ingredients
            .iter()
            .filter(|i| i.name == name)
            .min_by_key(|i| i.id)
            .cloned())
    }

    async fn create_ingredient(
        &self,
        name: &str,
        unit_of_measure: &str,
    ) -> anyhow::Result<Ingredient> {
        self.check_writable()?;
        let mut t = self.tables.lock().await;
        t.ingredient_seq += 1;
        let row = Ingredient {
            id: t.ingredient_seq,
            name: name.to_string(),
            unit_of_measure: unit_of_measure.to_string(),
        };
        t.ingredients.push(row.clone());
        Ok(row)
    }

    async fn update_ingredient(
        &self,
        current_id: i32,
        changes: &Ingredient,
    ) -> anyhow::Result<Ingredient> {
        self.check_writable()?;
        let mut t = self.tables.lock().await;
        if changes.id != current_id && t.ingredients.iter().any(|i| i.id == changes.id) {
            anyhow::bail!("duplicate ingredient id {}", changes.id);
        }
        let row = t
            .ingredients
            .iter_mut()
            .find(|i| i.id == current_id)
            .ok_or_else(|| anyhow::anyhow!("no ingredient with id {current_id}"))?;
        *row = changes.clone();
        Ok(row.clone())
    }

    async fn delete_ingredient(&self, id: i32) -> anyhow::Result<u64> {
        self.check_writable()?;
        let mut t = self.tables.lock().await;
        let before = t.links.len();
        t.links.retain(|l| l.ingredient_id != id);
        let removed = (before - t.links.len()) as u64;
        t.ingredients.retain(|i| i.id != id);
        Ok(removed)
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn list_recipes(&self) -> anyhow::Result<Vec<Recipe>> {
        let t = self.tables.lock().await;
        Ok(sorted_by_id(&t.recipes, |r| r.id))
    }

    async fn find_recipe_by_name(&self, name: &str) -> anyhow::Result<Option<Recipe>> {
        let t = self.tables.lock().await;
        Ok(t
            .recipes
            .iter()
            .filter(|r| r.name == name)
            .min_by_key(|r| r.id)
            .cloned())
    }

    async fn create_recipe(
        &self,
        name: &str,
        preparation_method: Option<&str>,
    ) -> anyhow::Result<Recipe> {
        self.check_writable()?;
        let mut t = self.tables.lock().await;
        t.recipe_seq += 1;
        let row = Recipe {
            id: t.recipe_seq,
            name: name.to_string(),
            preparation_method: preparation_method.map(str::to_string),
        };
        t.recipes.push(row.clone());
        Ok(row)
    }

    async fn update_recipe(&self, recipe: &Recipe) -> anyhow::Result<Recipe> {
        self.check_writable()?;
        let mut t = self.tables.lock().await;
        let row = t
            .recipes
            .iter_mut()
            .find(|r| r.id == recipe.id)
            .ok_or_else(|| anyhow::anyhow!("no recipe with id {}", recipe.id))?;
        *row = recipe.clone();
        Ok(row.clone())
    }

    async fn update_recipe_clearing_links(&self, recipe: &Recipe) -> anyhow::Result<u64> {
        self.check_writable()?;
        let mut t = self.tables.lock().await;
        let row = t
            .recipes
            .iter_mut()
            .find(|r| r.id == recipe.id)
            .ok_or_else(|| anyhow::anyhow!("no recipe with id {}", recipe.id))?;
        *row = recipe.clone();
        let before = t.links.len();
        t.links.retain(|l| l.recipe_id != recipe.id);
        Ok((before - t.links.len()) as u64)
    }

    async fn delete_recipe(&self, id: i32) -> anyhow::Result<u64> {
        self.check_writable()?;
        let mut t = self.tables.lock().await;
        let before = t.links.len();
        t.links.retain(|l| l.recipe_id != id);
        let removed = (before - t.links.len()) as u64;
        t.recipes.retain(|r| r.id != id);
        Ok(removed)
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn links_for_recipe(&self, recipe_id: i32) -> anyhow::Result<Vec<LinkDetail>> {
        let t = self.tables.lock().await;
        let mut out: Vec<LinkDetail> = t
            .links
            .iter()
            .filter(|l| l.recipe_id == recipe_id)
            .filter_map(|l| {
                let ingredient = t.ingredients.iter().find(|i| i.id == l.ingredient_id)?;
                Some(LinkDetail {
                    id: l.id,
                    name: ingredient.name.clone(),
                    quantity: l.quantity,
                    unit_of_measure: ingredient.unit_of_measure.clone(),
                })
            })
            .collect();
        out.sort_by_key(|l| l.id);
        Ok(out)
    }

    async fn insert_links(
        &self,
        recipe_id: i32,
        links: &[NewLink],
    ) -> anyhow::Result<Vec<RecipeIngredient>> {
        self.check_writable()?;
        let mut t = self.tables.lock().await;
        let mut rows = Vec::with_capacity(links.len());
        for link in links {
            t.link_seq += 1;
            let row = RecipeIngredient {
                id: t.link_seq,
                ingredient_id: link.ingredient_id,
                recipe_id,
                quantity: link.quantity,
            };
            t.links.push(row.clone());
            rows.push(row);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn name_lookup_prefers_lowest_id() {
        let store = MemoryStore::new();
        let first = store.create_ingredient("Salt", "g").await.unwrap();
        store.create_ingredient("Salt", "kg").await.unwrap();

        let found = store.find_ingredient_by_name("Salt").await.unwrap().unwrap();
        assert_eq!(found, first);
    }

    #[tokio::test]
    async fn deleting_recipe_cascades_to_its_links_only() {
        let store = MemoryStore::new();
        let flour = store.create_ingredient("Flour", "g").await.unwrap();
        let bread = store.create_recipe("Bread", Some("bake")).await.unwrap();
        let cake = store.create_recipe("Cake", None).await.unwrap();
        let link = NewLink {
            ingredient_id: flour.id,
            quantity: 500.0,
        };
        store.insert_links(bread.id, &[link]).await.unwrap();
        store.insert_links(cake.id, &[link]).await.unwrap();

        let removed = store.delete_recipe(bread.id).await.unwrap();
        assert_eq!(removed, 1);

        let links = store.links().await;
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].recipe_id, cake.id);
        assert!(store.find_recipe_by_name("Bread").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn changing_ingredient_id_orphans_links() {
        let store = MemoryStore::new();
        let sugar = store.create_ingredient("Sugar", "g").await.unwrap();
        let cake = store.create_recipe("Cake", None).await.unwrap();
        store
            .insert_links(
                cake.id,
                &[NewLink {
                    ingredient_id: sugar.id,
                    quantity: 200.0,
                }],
            )
            .await
            .unwrap();

        let moved = Ingredient {
            id: 99,
            ..sugar.clone()
        };
        store.update_ingredient(sugar.id, &moved).await.unwrap();

        assert_eq!(store.links().await.len(), 1);
        assert!(store.links_for_recipe(cake.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_to_existing_id_is_rejected() {
        let store = MemoryStore::new();
        let a = store.create_ingredient("A", "g").await.unwrap();
        let b = store.create_ingredient("B", "g").await.unwrap();

        let clash = Ingredient { id: b.id, ..a.clone() };
        assert!(store.update_ingredient(a.id, &clash).await.is_err());
    }

    #[tokio::test]
    async fn failing_writes_leave_tables_untouched() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        assert!(store.create_ingredient("Egg", "unit").await.is_err());
        store.set_fail_writes(false);
        assert!(store.list_ingredients().await.unwrap().is_empty());
    }
}

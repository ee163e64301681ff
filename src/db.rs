use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::DatabaseConfig;

/// Tables are created when absent; there is no migration history.
/// Link columns carry no foreign keys: cascades are done by the store and an
/// ingredient's id may be rewritten.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS ingredients (
        id              SERIAL PRIMARY KEY,
        name            VARCHAR(100) NOT NULL,
        unit_of_measure VARCHAR(100) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recipes (
        id                 SERIAL PRIMARY KEY,
        name               VARCHAR(100) NOT NULL,
        preparation_method TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recipe_ingredients (
        id            SERIAL PRIMARY KEY,
        ingredient_id INTEGER NOT NULL,
        recipe_id     INTEGER NOT NULL,
        quantity      DOUBLE PRECISION NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS recipe_ingredients_recipe_id_idx ON recipe_ingredients (recipe_id)",
    "CREATE INDEX IF NOT EXISTS recipe_ingredients_ingredient_id_idx ON recipe_ingredients (ingredient_id)",
];

pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.url())
        .await
        .context("connect to database")?;
    info!(host = %config.host, database = %config.name, "database connected");
    Ok(db)
}

pub async fn init_schema(db: &PgPool) -> anyhow::Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(db)
            .await
            .context("create schema")?;
    }
    Ok(())
}

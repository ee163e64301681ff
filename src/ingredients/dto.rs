use serde::Deserialize;

/// Fields are optional so that a missing one can be answered with a 400
/// instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct CreateIngredientRequest {
    pub name: Option<String>,
    pub unit_of_measure: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateIngredientRequest {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub unit_of_measure: Option<String>,
}

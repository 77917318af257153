use thiserror::Error;

/// Errors raised by recipe construction and the ratio engine.
///
/// Zero flour content is not an error: hydration and salt percentage carry
/// `inf`/`NaN` in that case and callers decide how to show it.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// Empty component list, negative or non-finite quantity, duplicate
    /// direct label, or an unknown leaf label in wire input.
    #[error("invalid recipe: {0}")]
    InvalidRecipe(String),

    /// Label not present among the direct components of `recipe`.
    #[error("ingredient `{ingredient}` is not part of {recipe}")]
    IngredientNotFound { ingredient: String, recipe: String },

    #[error("malformed recipe JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RecipeError>;

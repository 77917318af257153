use std::path::PathBuf;

use bm_core::RecipeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid recipe file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{recipe}: unknown ingredient `{ingredient}`")]
    UnknownIngredient { recipe: String, ingredient: String },

    #[error("{recipe}: refers to unknown recipe `{reference}`")]
    UnknownRecipe { recipe: String, reference: String },

    #[error("{recipe}: {message}")]
    Template { recipe: String, message: String },

    #[error(transparent)]
    Recipe(#[from] RecipeError),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

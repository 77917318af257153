//! User recipe files in TOML.
//!
//! ```toml
//! [[recipe]]
//! label = "Rye starter"
//! section = "Starters"
//! components = [
//!     { ingredient = "water", quantity = 1.0 },
//!     { ingredient = "rye", quantity = 1.0 },
//! ]
//!
//! [[recipe]]
//! label = "Rye bread"
//! components = [
//!     { recipe = "Rye starter", quantity = 1.0 },
//!     { ingredient = "rye", quantity = 5.0 },
//! ]
//! hydration = 0.72
//! salt = 0.02
//! scale = { ingredient = "rye", quantity = 500.0, unit = "grams" }
//! ```
//!
//! A `recipe` reference resolves against everything already in the catalog,
//! including earlier tables of the same file. The referenced template is
//! rescaled so its own quantities add up to the quantity it is given.

use std::path::Path;

use bm_core::{
    BaseIngredient, Component, CompositeIngredient, DEFAULT_UNIT, add_salt_percentage,
    adjust_ratio_to, hydrate, multiply,
};
use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};

/// Section for file recipes that do not name one.
pub const CUSTOM_SECTION: &str = "Custom";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecipeFile {
    #[serde(default, rename = "recipe")]
    recipes: Vec<RecipeTemplate>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecipeTemplate {
    label: String,
    #[serde(default)]
    section: Option<String>,
    #[serde(default)]
    unit: Option<String>,
    components: Vec<ComponentTemplate>,
    #[serde(default)]
    hydration: Option<f64>,
    #[serde(default)]
    salt: Option<f64>,
    #[serde(default)]
    scale: Option<ScaleTemplate>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ComponentTemplate {
    #[serde(default)]
    ingredient: Option<String>,
    #[serde(default)]
    recipe: Option<String>,
    quantity: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScaleTemplate {
    ingredient: String,
    quantity: f64,
    #[serde(default)]
    unit: Option<String>,
}

impl Catalog {
    /// Parse recipe tables from TOML and add them. Returns how many recipes
    /// were added or replaced. Nothing is added when any table fails.
    pub fn extend_from_toml_str(&mut self, source: &str) -> Result<usize> {
        let file: RecipeFile = toml::from_str(source)?;
        let count = file.recipes.len();
        let mut staged = self.clone();
        for template in file.recipes {
            let section = template
                .section
                .clone()
                .unwrap_or_else(|| CUSTOM_SECTION.to_string());
            let recipe = template.build(&staged)?;
            tracing::debug!("loaded recipe '{}'", recipe.label());
            staged.insert(section, recipe);
        }
        *self = staged;
        Ok(count)
    }

    pub fn extend_from_toml_file(&mut self, path: &Path) -> Result<usize> {
        let source = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let count = self.extend_from_toml_str(&source)?;
        tracing::info!("loaded {count} recipes from {}", path.display());
        Ok(count)
    }
}

impl RecipeTemplate {
    fn build(&self, catalog: &Catalog) -> Result<CompositeIngredient> {
        let components = self
            .components
            .iter()
            .map(|c| c.resolve(&self.label, catalog))
            .collect::<Result<Vec<_>>>()?;

        let unit = self.unit.as_deref().unwrap_or(DEFAULT_UNIT);
        let mut recipe = CompositeIngredient::new(self.label.as_str(), components)?.with_unit(unit);
        if let Some(target) = self.hydration {
            recipe = hydrate(&recipe, target)?;
        }
        if let Some(target) = self.salt {
            recipe = add_salt_percentage(&recipe, target)?;
        }
        if let Some(scale) = &self.scale {
            let unit = scale.unit.as_deref().unwrap_or(recipe.unit()).to_string();
            recipe = adjust_ratio_to(&recipe, &scale.ingredient, scale.quantity, &unit)?;
        }
        Ok(recipe)
    }
}

impl ComponentTemplate {
    fn resolve(&self, recipe: &str, catalog: &Catalog) -> Result<Component> {
        match (&self.ingredient, &self.recipe) {
            (Some(label), None) => {
                let leaf = BaseIngredient::lookup(label).ok_or_else(|| {
                    CatalogError::UnknownIngredient {
                        recipe: recipe.to_string(),
                        ingredient: label.clone(),
                    }
                })?;
                Ok(Component::new(leaf, self.quantity))
            }
            (None, Some(reference)) => {
                let nested = catalog
                    .get(reference)
                    .ok_or_else(|| CatalogError::UnknownRecipe {
                        recipe: recipe.to_string(),
                        reference: reference.clone(),
                    })?;
                let scaled = multiply(
                    nested,
                    self.quantity / nested.total_weight()?,
                    nested.unit(),
                )?;
                Ok(Component::new(scaled, self.quantity))
            }
            _ => Err(CatalogError::Template {
                recipe: recipe.to_string(),
                message: "each component needs exactly one of `ingredient` or `recipe`"
                    .to_string(),
            }),
        }
    }
}

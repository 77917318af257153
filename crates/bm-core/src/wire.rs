//! JSON serde for recipe trees.
//!
//! Leaves are stored as their bare label; nested composites are stored
//! inline as objects. Import goes through the validating constructor, so a
//! document that decodes always yields a well-formed tree.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_UNIT;
use crate::error::{RecipeError, Result};
use crate::ingredient::{BaseIngredient, Component, CompositeIngredient, Ingredient};

pub const CURRENT_VERSION: &str = "1";

// --- Wire format types ---

#[derive(Serialize, Deserialize, Debug)]
pub struct WireExport {
    pub version: String,
    pub recipe: WireComposite,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WireComposite {
    pub label: String,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub components: Vec<WireComponent>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WireComponent {
    pub ingredient: WireIngredient,
    pub quantity: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum WireIngredient {
    Leaf(String),
    Composite(WireComposite),
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

// --- Conversion: Wire → Domain ---

impl WireComposite {
    pub fn into_composite(self) -> Result<CompositeIngredient> {
        let components = self
            .components
            .into_iter()
            .map(|c| {
                let ingredient = match c.ingredient {
                    WireIngredient::Leaf(label) => Ingredient::Base(
                        BaseIngredient::lookup(&label).ok_or_else(|| {
                            RecipeError::InvalidRecipe(format!("unknown ingredient `{label}`"))
                        })?,
                    ),
                    WireIngredient::Composite(nested) => {
                        Ingredient::Composite(nested.into_composite()?)
                    }
                };
                Ok(Component::new(ingredient, c.quantity))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(CompositeIngredient::new(self.label, components)?.with_unit(self.unit))
    }

    // --- Conversion: Domain → Wire ---

    pub fn from_composite(composite: &CompositeIngredient) -> Self {
        Self {
            label: composite.label().to_string(),
            unit: composite.unit().to_string(),
            components: composite
                .components()
                .iter()
                .map(|c| WireComponent {
                    ingredient: match &c.ingredient {
                        Ingredient::Base(leaf) => WireIngredient::Leaf(leaf.label().to_string()),
                        Ingredient::Composite(nested) => {
                            WireIngredient::Composite(Self::from_composite(nested))
                        }
                    },
                    quantity: c.quantity,
                })
                .collect(),
        }
    }
}

/// Deserialize a recipe from JSON. Accepts both the versioned envelope and a
/// bare recipe object.
pub fn import_json(json: &str) -> Result<CompositeIngredient> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let wire: WireComposite = if value.get("recipe").is_some() {
        serde_json::from_value::<WireExport>(value)?.recipe
    } else {
        serde_json::from_value(value)?
    };
    wire.into_composite()
}

/// Serialize a recipe to the versioned JSON envelope.
pub fn export_json(composite: &CompositeIngredient) -> std::result::Result<String, serde_json::Error> {
    let wire = WireExport {
        version: CURRENT_VERSION.to_string(),
        recipe: WireComposite::from_composite(composite),
    };
    serde_json::to_string_pretty(&wire)
}

use bm_core::{
    BaseIngredient, Component, CompositeIngredient, add_salt_percentage, hydrate, multiply,
};

use crate::error::{CatalogError, Result};

/// Water and flour at `water_percentage` hydration (100 = equal weights).
pub fn sourdough_starter(
    flour: BaseIngredient,
    water_percentage: f64,
    title: &str,
) -> Result<CompositeIngredient> {
    Ok(CompositeIngredient::new(
        title,
        [(BaseIngredient::WATER, water_percentage / 100.0), (flour, 1.0)],
    )?)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourdoughParams {
    pub hydration: f64,
    pub salt_percentage: f64,
    /// Parts of starter in the dough.
    pub starter_quantity: f64,
    /// Parts of flour, split across the flours by their weights.
    pub flour_quantity: f64,
}

impl Default for SourdoughParams {
    fn default() -> Self {
        Self {
            hydration: 0.65,
            salt_percentage: 0.022,
            starter_quantity: 1.0,
            flour_quantity: 5.0,
        }
    }
}

/// A dough of `starter` plus `flours` (relative weights), hydrated and salted.
///
/// The starter is rescaled so its own quantities add up to its quantity in
/// the dough, and the added water and salt account for what it carries.
pub fn sourdough(
    title: &str,
    starter: &CompositeIngredient,
    flours: &[(BaseIngredient, f64)],
    params: SourdoughParams,
) -> Result<CompositeIngredient> {
    let flour_weights: f64 = flours.iter().map(|(_, weight)| weight).sum();
    if flours.is_empty() || flour_weights <= 0.0 {
        return Err(CatalogError::Template {
            recipe: title.to_string(),
            message: "a sourdough needs at least one flour with a positive weight".to_string(),
        });
    }

    let scaled_starter = multiply(
        starter,
        params.starter_quantity / starter.total_weight()?,
        starter.unit(),
    )?;
    let mut components = vec![Component::new(scaled_starter, params.starter_quantity)];
    components.extend(
        flours
            .iter()
            .map(|(flour, weight)| Component::new(*flour, params.flour_quantity * weight / flour_weights)),
    );

    let dough = CompositeIngredient::new(title, components)?;
    let dough = hydrate(&dough, params.hydration)?;
    Ok(add_salt_percentage(&dough, params.salt_percentage)?)
}

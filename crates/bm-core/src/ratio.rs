//! Recursive aggregation and proportional rebalancing over ingredient trees.
//!
//! Every aggregation goes through [`content`], the single fold that knows how
//! to descend into a composite: a nested composite contributes
//! `quantity × (its own content / its own total)`, never its raw internal
//! amounts. The rebalancing operations return new trees.

use serde::Serialize;

use crate::error::{RecipeError, Result};
use crate::ingredient::{BaseIngredient, Component, CompositeIngredient, Ingredient, total_weight};

/// What a content fold counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Content {
    /// Water-bearing leaves (water, milk).
    Water,
    Flour,
    /// The salt leaf only.
    Salt,
}

impl Content {
    fn counts(self, leaf: BaseIngredient) -> bool {
        match self {
            Content::Water => leaf.is_water_bearing(),
            Content::Flour => leaf.is_flour(),
            Content::Salt => leaf == BaseIngredient::SALT,
        }
    }
}

/// Weight of `kind` in one level of components, recursing into composites.
pub fn content(components: &[Component], kind: Content) -> Result<f64> {
    components
        .iter()
        .map(|c| contribution(c, kind))
        .sum()
}

fn contribution(component: &Component, kind: Content) -> Result<f64> {
    Ok(component.quantity * fraction(&component.ingredient, kind)?)
}

/// Share of an ingredient's weight that counts as `kind`.
fn fraction(ingredient: &Ingredient, kind: Content) -> Result<f64> {
    match ingredient {
        Ingredient::Base(leaf) => Ok(if kind.counts(*leaf) { 1.0 } else { 0.0 }),
        Ingredient::Composite(child) => {
            let total = total_weight(child.components())?;
            Ok(content(child.components(), kind)? / total)
        }
    }
}

pub fn water_content(components: &[Component]) -> Result<f64> {
    content(components, Content::Water)
}

pub fn flour_content(components: &[Component]) -> Result<f64> {
    content(components, Content::Flour)
}

pub fn salt_content(components: &[Component]) -> Result<f64> {
    content(components, Content::Salt)
}

/// Water over flour. `inf` or `NaN` when there is no flour.
pub fn hydration(components: &[Component]) -> Result<f64> {
    Ok(water_content(components)? / flour_content(components)?)
}

/// Salt over flour. `inf` or `NaN` when there is no flour.
pub fn salt_percentage(components: &[Component]) -> Result<f64> {
    Ok(salt_content(components)? / flour_content(components)?)
}

/// Each direct component's quantity as a fraction of total flour content.
pub fn bakers_percentages(components: &[Component]) -> Result<Vec<(String, f64)>> {
    let flour = flour_content(components)?;
    Ok(components
        .iter()
        .map(|c| (c.label().to_string(), c.quantity / flour))
        .collect())
}

/// Set the direct water-bearing entry so the whole recipe reaches
/// `target` hydration, counting water already brought in by nested
/// composites and by any other direct liquid.
///
/// The `water` leaf is adjusted when present, otherwise the first direct
/// water-bearing leaf (e.g. milk); with neither, a `water` entry is appended.
/// The result can be negative when nested composites already overshoot the
/// target. It is returned as-is.
pub fn hydrate(composite: &CompositeIngredient, target: f64) -> Result<CompositeIngredient> {
    let slot = leaf_slot(composite, |leaf| leaf == BaseIngredient::WATER)
        .or_else(|| leaf_slot(composite, BaseIngredient::is_water_bearing));
    rebalance(composite, Content::Water, target, slot, BaseIngredient::WATER)
}

/// Set the direct salt entry so the whole recipe reaches `target` salt
/// percentage, counting salt carried by nested composites. Appends a `salt`
/// entry when there is none.
pub fn add_salt_percentage(
    composite: &CompositeIngredient,
    target: f64,
) -> Result<CompositeIngredient> {
    let slot = leaf_slot(composite, |leaf| leaf == BaseIngredient::SALT);
    rebalance(composite, Content::Salt, target, slot, BaseIngredient::SALT)
}

/// First direct leaf accepted by `accept`. Nested composites are never a
/// slot, whatever their label.
fn leaf_slot(
    composite: &CompositeIngredient,
    accept: impl Fn(BaseIngredient) -> bool,
) -> Option<usize> {
    composite
        .components()
        .iter()
        .position(|c| matches!(c.ingredient, Ingredient::Base(leaf) if accept(leaf)))
}

fn rebalance(
    composite: &CompositeIngredient,
    kind: Content,
    target: f64,
    slot: Option<usize>,
    fallback: BaseIngredient,
) -> Result<CompositeIngredient> {
    let components = composite.components();
    let flour = flour_content(components)?;

    let mut from_others = 0.0;
    for (i, component) in components.iter().enumerate() {
        if Some(i) != slot {
            from_others += contribution(component, kind)?;
        }
    }
    let quantity = flour * target - from_others;

    let mut updated = components.to_vec();
    match slot {
        Some(i) => updated[i].quantity = quantity,
        None if composite.position(fallback.label()).is_some() => {
            return Err(RecipeError::InvalidRecipe(format!(
                "{}: cannot add {} next to a nested recipe of the same name",
                composite.label(),
                fallback.label()
            )));
        }
        None => updated.push(Component::new(fallback, quantity)),
    }
    Ok(CompositeIngredient::from_parts(
        composite.label().to_string(),
        composite.unit().to_string(),
        updated,
    ))
}

/// Scale the recipe so the direct entry `label` weighs `quantity`, switching
/// the whole tree to `unit`.
///
/// Pie dough at 3:2:1 parts flour/butter/sugar adjusted to 50 grams sugar
/// becomes 150/100/50 grams.
pub fn adjust_ratio_to(
    composite: &CompositeIngredient,
    label: &str,
    quantity: f64,
    unit: &str,
) -> Result<CompositeIngredient> {
    let current = composite
        .quantity_of(label)
        .ok_or_else(|| composite.not_found(label))?;
    if current <= 0.0 {
        return Err(RecipeError::InvalidRecipe(format!(
            "cannot scale to {label}: its quantity is {current}"
        )));
    }
    multiply(composite, quantity / current, unit)
}

/// Multiply every quantity by `factor` and relabel the tree with `unit`.
///
/// A nested composite is rescaled by `factor × quantity / its total`, which
/// keeps its internal ratios and makes its internal quantities add up to its
/// new quantity in the parent. `factor` must be finite and not negative.
pub fn multiply(
    composite: &CompositeIngredient,
    factor: f64,
    unit: &str,
) -> Result<CompositeIngredient> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(RecipeError::InvalidRecipe(format!(
            "cannot scale {} by {factor}",
            composite.label()
        )));
    }
    scale_tree(composite, factor, unit)
}

fn scale_tree(
    composite: &CompositeIngredient,
    factor: f64,
    unit: &str,
) -> Result<CompositeIngredient> {
    let components = composite
        .components()
        .iter()
        .map(|c| scale_component(c, factor, unit))
        .collect::<Result<Vec<_>>>()?;
    Ok(CompositeIngredient::from_parts(
        composite.label().to_string(),
        unit.to_string(),
        components,
    ))
}

fn scale_component(component: &Component, factor: f64, unit: &str) -> Result<Component> {
    let quantity = component.quantity * factor;
    let ingredient = match &component.ingredient {
        Ingredient::Base(leaf) => Ingredient::Base(*leaf),
        Ingredient::Composite(child) => Ingredient::Composite(resize(child, quantity, unit)?),
    };
    Ok(Component {
        ingredient,
        quantity,
    })
}

/// Rescale `child` so its own quantities add up to `quantity`. At zero the
/// child keeps its quantities so its fractions stay defined.
fn resize(child: &CompositeIngredient, quantity: f64, unit: &str) -> Result<CompositeIngredient> {
    let total = total_weight(child.components())?;
    let factor = if quantity > 0.0 && total > 0.0 { quantity / total } else { 1.0 };
    scale_tree(child, factor, unit)
}

/// Replace one direct quantity. A composite entry has its own quantities
/// rescaled to add up to the new value, in its own unit.
pub fn set_quantity(
    composite: &CompositeIngredient,
    label: &str,
    quantity: f64,
) -> Result<CompositeIngredient> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(RecipeError::InvalidRecipe(format!(
            "{label} has quantity {quantity}"
        )));
    }
    let index = composite
        .position(label)
        .ok_or_else(|| composite.not_found(label))?;

    let mut updated = composite.components().to_vec();
    let entry = &mut updated[index];
    if let Ingredient::Composite(child) = &entry.ingredient {
        entry.ingredient = Ingredient::Composite(resize(child, quantity, child.unit())?);
    }
    entry.quantity = quantity;

    Ok(CompositeIngredient::from_parts(
        composite.label().to_string(),
        composite.unit().to_string(),
        updated,
    ))
}

/// Aggregate numbers for one recipe.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecipeSummary {
    pub label: String,
    pub unit: String,
    pub total_weight: f64,
    pub flour: f64,
    pub water: f64,
    pub salt: f64,
    pub hydration: f64,
    pub salt_percentage: f64,
}

impl RecipeSummary {
    pub fn of(composite: &CompositeIngredient) -> Result<Self> {
        let components = composite.components();
        let flour = flour_content(components)?;
        let water = water_content(components)?;
        let salt = salt_content(components)?;
        Ok(Self {
            label: composite.label().to_string(),
            unit: composite.unit().to_string(),
            total_weight: components.iter().map(|c| c.quantity).sum(),
            flour,
            water,
            salt,
            hydration: water / flour,
            salt_percentage: salt / flour,
        })
    }
}

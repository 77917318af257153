//! Baker's math engine.
//!
//! Recipes are trees of weighted ingredients: leaves from a fixed catalog
//! (flours, liquids, salt, ...) and composites that nest to any depth, such
//! as a sourdough starter inside a dough. The engine folds water, flour and
//! salt content through the tree and rebalances recipes to a target
//! hydration, salt percentage or absolute quantity, returning new trees.
//!
//! Zero I/O. Pure math with no opinions about presentation or storage.

pub mod constants;
pub mod error;
pub mod format;
pub mod ingredient;
pub mod ratio;
pub mod wire;

pub use constants::{DEFAULT_UNIT, DISPLAY_DECIMALS, EPSILON};
pub use error::{RecipeError, Result};
pub use format::{FormatOptions, Rounding, format_quantity, render_with, round_to, round_to_with};
pub use ingredient::{
    BaseIngredient, Component, CompositeIngredient, Ingredient, composite_ingredient, is_flour,
    is_water_bearing, total_weight,
};
pub use ratio::{
    Content, RecipeSummary, add_salt_percentage, adjust_ratio_to, bakers_percentages, content,
    flour_content, hydrate, hydration, multiply, salt_content, salt_percentage, set_quantity,
    water_content,
};
pub use wire::{CURRENT_VERSION, export_json, import_json};

//! Deterministic text rendering of recipes.

use std::fmt;

use crate::constants::DISPLAY_DECIMALS;
use crate::ingredient::{Component, CompositeIngredient, Ingredient};

/// How ties are broken when rounding for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rounding {
    /// At 0 decimals: 2.5 → 3, -2.5 → -3
    #[default]
    HalfAwayFromZero,
    /// Banker's rounding at 0 decimals: 2.5 → 2, 3.5 → 4
    HalfEven,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    pub decimals: u32,
    pub rounding: Rounding,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            decimals: DISPLAY_DECIMALS,
            rounding: Rounding::default(),
        }
    }
}

/// Round to `decimals` places, ties away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    round_to_with(value, decimals, Rounding::HalfAwayFromZero)
}

pub fn round_to_with(value: f64, decimals: u32, rounding: Rounding) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    let rounded = match rounding {
        Rounding::HalfAwayFromZero => scaled.round(),
        Rounding::HalfEven => scaled.round_ties_even(),
    };
    rounded / factor
}

/// Shortest form that reads back to the same value, keeping one decimal on
/// whole numbers: `200.0`, `83.33`.
pub fn format_quantity(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// `label` on the first line, then `"<qty> <unit> <label>"` for every direct
/// component joined by `", "`. Nested composites list their own components
/// in parentheses.
pub fn render_with(composite: &CompositeIngredient, options: &FormatOptions) -> String {
    format!(
        "{}\n{}",
        composite.label(),
        describe_components(composite, options)
    )
}

fn describe_components(composite: &CompositeIngredient, options: &FormatOptions) -> String {
    composite
        .components()
        .iter()
        .map(|c| describe_component(c, composite.unit(), options))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_component(component: &Component, unit: &str, options: &FormatOptions) -> String {
    let quantity = round_to_with(component.quantity, options.decimals, options.rounding);
    let mut line = format!(
        "{} {} {}",
        format_quantity(quantity),
        unit,
        component.label().to_lowercase()
    );
    if let Ingredient::Composite(child) = &component.ingredient {
        line.push_str(&format!(" ({})", describe_components(child, options)));
    }
    line
}

impl fmt::Display for CompositeIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_with(self, &FormatOptions::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient::BaseIngredient;
    use crate::ratio::multiply;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(std::f64::consts::PI, 2), 3.14);
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_to_with(2.5, 0, Rounding::HalfEven), 2.0);
        assert_eq!(round_to_with(3.5, 0, Rounding::HalfEven), 4.0);
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(200.0), "200.0");
        assert_eq!(format_quantity(83.33), "83.33");
        assert_eq!(format_quantity(f64::NAN), "NaN");
    }

    #[test]
    fn test_display_flat() {
        let pie = CompositeIngredient::new(
            "Pie Dough",
            [
                (BaseIngredient::ALL_PURPOSE_FLOUR, 3.0),
                (BaseIngredient::BUTTER, 2.0),
                (BaseIngredient::SUGAR, 1.0),
            ],
        )
        .unwrap();
        assert_eq!(
            pie.to_string(),
            "Pie Dough\n3.0 parts all purpose flour, 2.0 parts butter, 1.0 parts sugar"
        );
    }

    #[test]
    fn test_display_nested_and_rounded() {
        let starter = CompositeIngredient::new(
            "Rye Starter",
            [(BaseIngredient::WATER, 1.0), (BaseIngredient::RYE, 2.0)],
        )
        .unwrap();
        let dough = CompositeIngredient::new(
            "Rye Bread",
            [
                Component::new(starter, 1.0),
                Component::new(BaseIngredient::RYE, 2.0),
            ],
        )
        .unwrap();
        let grams = multiply(&dough, 100.0, "grams").unwrap();
        assert_eq!(
            grams.to_string(),
            "Rye Bread\n100.0 grams rye starter (33.33 grams water, 66.67 grams rye), 200.0 grams rye"
        );
    }

    #[test]
    fn test_render_with_more_decimals() {
        let dough = CompositeIngredient::new(
            "Thirds",
            [(BaseIngredient::WHEAT, 2.0), (BaseIngredient::WATER, 1.0)],
        )
        .unwrap();
        let grams = multiply(&dough, 1.0 / 3.0, "grams").unwrap();
        let options = FormatOptions {
            decimals: 3,
            rounding: Rounding::HalfAwayFromZero,
        };
        assert_eq!(
            render_with(&grams, &options),
            "Thirds\n0.667 grams wheat, 0.333 grams water"
        );
    }
}

//! Text and JSON views shared by the CLI and the MCP server.

use anyhow::{Result, bail};
use bm_core::wire::WireComposite;
use bm_core::{CompositeIngredient, RecipeSummary, bakers_percentages, format_quantity, round_to};
use bm_recipes::Catalog;

/// Parse a user-entered percentage: `65`, `65%`, ` 2.2 % `.
pub fn parse_percent(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    let value: f64 = match number.parse() {
        Ok(v) => v,
        Err(_) => bail!("'{raw}' is not a percentage"),
    };
    if !value.is_finite() {
        bail!("'{raw}' is not a percentage");
    }
    Ok(value / 100.0)
}

/// `0.65` → `65.00%`. Zero flour makes ratios undefined.
pub fn format_percent(ratio: f64) -> String {
    if ratio.is_finite() {
        format!("{:.2}%", round_to(ratio * 100.0, 2))
    } else {
        "undefined (no flour)".to_string()
    }
}

/// Direct entries the engine had to push below zero.
pub fn warnings(recipe: &CompositeIngredient) -> Vec<String> {
    recipe
        .components()
        .iter()
        .filter(|c| c.quantity < 0.0)
        .map(|c| {
            format!(
                "{} is negative: nested ingredients already exceed the target",
                c.label().to_lowercase()
            )
        })
        .collect()
}

pub fn recipe_text(recipe: &CompositeIngredient) -> Result<String> {
    let summary = RecipeSummary::of(recipe)?;
    let mut text = format!(
        "{recipe}\n\nhydration: {}\nsalt:      {}\ntotal:     {} {}",
        format_percent(summary.hydration),
        format_percent(summary.salt_percentage),
        format_quantity(round_to(summary.total_weight, 2)),
        summary.unit,
    );
    for warning in warnings(recipe) {
        text.push_str(&format!("\nwarning: {warning}"));
    }
    Ok(text)
}

pub fn recipe_json(recipe: &CompositeIngredient) -> Result<serde_json::Value> {
    let summary = RecipeSummary::of(recipe)?;
    let percentages: Vec<serde_json::Value> = bakers_percentages(recipe.components())?
        .into_iter()
        .map(|(ingredient, ratio)| {
            serde_json::json!({
                "ingredient": ingredient,
                "percent": round_to(ratio * 100.0, 2),
            })
        })
        .collect();
    Ok(serde_json::json!({
        "text": recipe.to_string(),
        "summary": summary,
        "bakers_percentages": percentages,
        "warnings": warnings(recipe),
        "recipe": WireComposite::from_composite(recipe),
    }))
}

pub fn catalog_json(catalog: &Catalog) -> serde_json::Value {
    let sections: Vec<serde_json::Value> = catalog
        .sections()
        .into_iter()
        .map(|(section, recipes)| {
            let labels: Vec<&str> = recipes.iter().map(|r| r.label()).collect();
            serde_json::json!({ "section": section, "recipes": labels })
        })
        .collect();
    serde_json::json!({ "sections": sections })
}

pub fn catalog_text(catalog: &Catalog) -> String {
    let mut text = String::new();
    for (section, recipes) in catalog.sections() {
        text.push_str(section);
        text.push('\n');
        for recipe in recipes {
            text.push_str(&format!("  {} ({})\n", recipe.label(), recipe.unit()));
        }
    }
    text.trim_end().to_string()
}

use bm_core::{
    BaseIngredient, Component, CompositeIngredient, add_salt_percentage, adjust_ratio_to, hydrate,
};

use crate::builders::{SourdoughParams, sourdough, sourdough_starter};
use crate::error::Result;

pub const SOURDOUGH_SECTION: &str = "Sourdough Breads";
pub const OTHER_SECTION: &str = "Other";

/// A recipe template and the section it is listed under.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    pub section: String,
    pub recipe: CompositeIngredient,
}

/// Ordered, read-only-after-load list of recipe templates.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The recipes that ship with the tool, scaled to grams.
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::empty();
        let params = SourdoughParams::default();

        let wheat_starter = sourdough_starter(BaseIngredient::WHEAT, 100.0, "Wheat based starter")?;
        let whole_wheat_starter =
            sourdough_starter(BaseIngredient::WHOLE_WHEAT, 100.0, "Whole wheat based starter")?;
        let rye_starter = sourdough_starter(BaseIngredient::RYE, 100.0, "Rye based starter")?;

        let wheat = sourdough("Sourdough", &wheat_starter, &[(BaseIngredient::WHEAT, 1.0)], params)?;
        catalog.insert(SOURDOUGH_SECTION, to_grams(&wheat, BaseIngredient::WHEAT, 500.0)?);

        let whole_wheat = sourdough(
            "WholeWheat Sourdough",
            &whole_wheat_starter,
            &[(BaseIngredient::WHEAT, 0.6), (BaseIngredient::WHOLE_WHEAT, 0.4)],
            params,
        )?;
        catalog.insert(SOURDOUGH_SECTION, to_grams(&whole_wheat, BaseIngredient::WHEAT, 500.0)?);

        let mixed = sourdough(
            "Mixed Rye, WholeWheat, and Wheat Sourdough",
            &rye_starter,
            &[
                (BaseIngredient::WHEAT, 0.6),
                (BaseIngredient::RYE, 0.2),
                (BaseIngredient::WHOLE_WHEAT, 0.2),
            ],
            params,
        )?;
        catalog.insert(SOURDOUGH_SECTION, to_grams(&mixed, BaseIngredient::WHEAT, 500.0)?);

        let pie = CompositeIngredient::new(
            "Pie Dough",
            [
                (BaseIngredient::ALL_PURPOSE_FLOUR, 3.0),
                (BaseIngredient::BUTTER, 2.0),
                (BaseIngredient::SUGAR, 1.0),
            ],
        )?;
        let pie = hydrate(&add_salt_percentage(&pie, 0.022)?, 0.03)?;
        catalog.insert(OTHER_SECTION, to_grams(&pie, BaseIngredient::ALL_PURPOSE_FLOUR, 100.0)?);

        let oliebollen = CompositeIngredient::new(
            "Sourdough Oliebollen (Dutch Donut) Batter",
            [
                Component::new(wheat_starter, 10.0),
                Component::new(BaseIngredient::ALL_PURPOSE_FLOUR, 100.0),
                Component::new(BaseIngredient::MILK, 95.0),
                Component::new(BaseIngredient::SUGAR, 15.0),
            ],
        )?;
        let oliebollen = add_salt_percentage(&oliebollen, 0.022)?;
        catalog.insert(
            OTHER_SECTION,
            to_grams(&oliebollen, BaseIngredient::ALL_PURPOSE_FLOUR, 250.0)?,
        );

        let pancakes = CompositeIngredient::new(
            "Pancake Batter",
            [(BaseIngredient::ALL_PURPOSE_FLOUR, 1.0)],
        )?;
        let pancakes = add_salt_percentage(&hydrate(&pancakes, 0.95)?, 0.022)?;
        catalog.insert(OTHER_SECTION, pancakes);

        Ok(catalog)
    }

    /// Add a recipe, replacing any entry with the same label in place.
    pub fn insert(&mut self, section: impl Into<String>, recipe: CompositeIngredient) {
        let entry = CatalogEntry {
            section: section.into(),
            recipe,
        };
        match self.position(entry.recipe.label()) {
            Some(i) => {
                tracing::warn!("recipe '{}' replaces an existing entry", entry.recipe.label());
                self.entries[i] = entry;
            }
            None => self.entries.push(entry),
        }
    }

    /// Add every entry of `other`, in order. Entries with a label already
    /// present replace the existing one.
    pub fn merge(&mut self, other: Catalog) {
        for entry in other.entries {
            self.insert(entry.section, entry.recipe);
        }
    }

    /// Recipe by label, ignoring case.
    pub fn get(&self, label: &str) -> Option<&CompositeIngredient> {
        self.position(label).map(|i| &self.entries[i].recipe)
    }

    /// The recipe shown when nothing has been picked yet.
    pub fn first(&self) -> Option<&CompositeIngredient> {
        self.entries.first().map(|e| &e.recipe)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Sections in first-seen order with their recipes.
    pub fn sections(&self) -> Vec<(&str, Vec<&CompositeIngredient>)> {
        let mut sections: Vec<(&str, Vec<&CompositeIngredient>)> = Vec::new();
        for entry in &self.entries {
            match sections.iter_mut().find(|(name, _)| *name == entry.section) {
                Some((_, recipes)) => recipes.push(&entry.recipe),
                None => sections.push((entry.section.as_str(), vec![&entry.recipe])),
            }
        }
        sections
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, label: &str) -> Option<usize> {
        let label = label.trim();
        self.entries
            .iter()
            .position(|e| e.recipe.label().eq_ignore_ascii_case(label))
    }
}

fn to_grams(
    recipe: &CompositeIngredient,
    reference: BaseIngredient,
    grams: f64,
) -> Result<CompositeIngredient> {
    Ok(adjust_ratio_to(recipe, reference.label(), grams, "grams")?)
}

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::constants::DEFAULT_UNIT;
use crate::error::{RecipeError, Result};

/// A leaf ingredient from the fixed catalog.
///
/// Classification travels with the value, so every aggregation asks the
/// leaf what it is instead of matching on which leaf it is. Adding a leaf
/// means adding a constant and listing it in [`BaseIngredient::ALL`].
#[derive(Clone, Copy, Debug)]
pub struct BaseIngredient {
    label: &'static str,
    is_flour: bool,
    is_water_bearing: bool,
}

impl BaseIngredient {
    pub const WATER: Self = Self::liquid("water");
    pub const MILK: Self = Self::liquid("milk");
    pub const ALL_PURPOSE_FLOUR: Self = Self::flour("all purpose flour");
    pub const WHEAT: Self = Self::flour("wheat");
    pub const WHOLE_WHEAT: Self = Self::flour("whole wheat");
    pub const RYE: Self = Self::flour("rye");
    pub const SPELT: Self = Self::flour("spelt");
    pub const SALT: Self = Self::other("salt");
    pub const BUTTER: Self = Self::other("butter");
    pub const SUGAR: Self = Self::other("sugar");

    /// Every known leaf, in display order.
    pub const ALL: [Self; 10] = [
        Self::WATER,
        Self::MILK,
        Self::ALL_PURPOSE_FLOUR,
        Self::WHEAT,
        Self::WHOLE_WHEAT,
        Self::RYE,
        Self::SPELT,
        Self::SALT,
        Self::BUTTER,
        Self::SUGAR,
    ];

    const fn flour(label: &'static str) -> Self {
        Self {
            label,
            is_flour: true,
            is_water_bearing: false,
        }
    }

    const fn liquid(label: &'static str) -> Self {
        Self {
            label,
            is_flour: false,
            is_water_bearing: true,
        }
    }

    const fn other(label: &'static str) -> Self {
        Self {
            label,
            is_flour: false,
            is_water_bearing: false,
        }
    }

    /// Resolve a label against the catalog, ignoring case and surrounding
    /// whitespace.
    pub fn lookup(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|leaf| leaf.label.eq_ignore_ascii_case(label))
    }

    pub fn label(self) -> &'static str {
        self.label
    }

    pub fn is_flour(self) -> bool {
        self.is_flour
    }

    pub fn is_water_bearing(self) -> bool {
        self.is_water_bearing
    }
}

impl PartialEq for BaseIngredient {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl Eq for BaseIngredient {}

impl Hash for BaseIngredient {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
    }
}

/// Either a catalog leaf or a nested mixture.
#[derive(Clone, Debug, PartialEq)]
pub enum Ingredient {
    Base(BaseIngredient),
    Composite(CompositeIngredient),
}

impl Ingredient {
    pub fn label(&self) -> &str {
        match self {
            Ingredient::Base(leaf) => leaf.label(),
            Ingredient::Composite(composite) => composite.label(),
        }
    }

    /// True only for flour leaves. A composite's flour is derived by
    /// aggregation, never by classification.
    pub fn is_flour(&self) -> bool {
        matches!(self, Ingredient::Base(leaf) if leaf.is_flour())
    }

    /// True only for water-bearing leaves (water, milk).
    pub fn is_water_bearing(&self) -> bool {
        matches!(self, Ingredient::Base(leaf) if leaf.is_water_bearing())
    }

    pub fn as_composite(&self) -> Option<&CompositeIngredient> {
        match self {
            Ingredient::Composite(composite) => Some(composite),
            Ingredient::Base(_) => None,
        }
    }

    fn matches_label(&self, label: &str) -> bool {
        self.label().eq_ignore_ascii_case(label.trim())
    }
}

impl From<BaseIngredient> for Ingredient {
    fn from(leaf: BaseIngredient) -> Self {
        Ingredient::Base(leaf)
    }
}

impl From<CompositeIngredient> for Ingredient {
    fn from(composite: CompositeIngredient) -> Self {
        Ingredient::Composite(composite)
    }
}

/// One weighted entry of a composite, denominated in the composite's unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    pub ingredient: Ingredient,
    pub quantity: f64,
}

impl Component {
    pub fn new(ingredient: impl Into<Ingredient>, quantity: f64) -> Self {
        Self {
            ingredient: ingredient.into(),
            quantity,
        }
    }

    pub fn label(&self) -> &str {
        self.ingredient.label()
    }
}

impl<I: Into<Ingredient>> From<(I, f64)> for Component {
    fn from((ingredient, quantity): (I, f64)) -> Self {
        Component::new(ingredient, quantity)
    }
}

/// A named mixture of weighted ingredients, nested to any depth.
///
/// Values are never changed in place: engine operations build new
/// composites and leave their input untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeIngredient {
    label: String,
    unit: String,
    components: Vec<Component>,
}

impl CompositeIngredient {
    /// Build a composite in the default `parts` unit.
    ///
    /// Fails with [`RecipeError::InvalidRecipe`] when `components` is empty,
    /// holds a negative or non-finite quantity, repeats a direct label, or
    /// nests a composite whose own total weight is undefined.
    pub fn new<C: Into<Component>>(
        label: impl Into<String>,
        components: impl IntoIterator<Item = C>,
    ) -> Result<Self> {
        let label = label.into();
        let components: Vec<Component> = components.into_iter().map(Into::into).collect();
        validate(&label, &components)?;
        Ok(Self::from_parts(label, DEFAULT_UNIT.to_string(), components))
    }

    /// Same composite in another display unit.
    pub fn with_unit(self, unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            ..self
        }
    }

    /// Unchecked constructor for engine results, which may legitimately
    /// carry a negative suggested quantity.
    pub(crate) fn from_parts(label: String, unit: String, components: Vec<Component>) -> Self {
        Self {
            label,
            unit,
            components,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Direct component with the given label (case-insensitive).
    pub fn component(&self, label: &str) -> Option<&Component> {
        self.position(label).map(|i| &self.components[i])
    }

    /// Quantity of the direct component with the given label.
    pub fn quantity_of(&self, label: &str) -> Option<f64> {
        self.component(label).map(|c| c.quantity)
    }

    pub fn total_weight(&self) -> Result<f64> {
        total_weight(&self.components)
    }

    pub(crate) fn position(&self, label: &str) -> Option<usize> {
        self.components
            .iter()
            .position(|c| c.ingredient.matches_label(label))
    }

    pub(crate) fn not_found(&self, label: &str) -> RecipeError {
        RecipeError::IngredientNotFound {
            ingredient: label.to_string(),
            recipe: self.label.clone(),
        }
    }
}

/// Construct a composite with an explicit unit.
pub fn composite_ingredient<C: Into<Component>>(
    label: impl Into<String>,
    components: impl IntoIterator<Item = C>,
    unit: impl Into<String>,
) -> Result<CompositeIngredient> {
    Ok(CompositeIngredient::new(label, components)?.with_unit(unit))
}

pub fn is_flour(ingredient: &Ingredient) -> bool {
    ingredient.is_flour()
}

pub fn is_water_bearing(ingredient: &Ingredient) -> bool {
    ingredient.is_water_bearing()
}

/// Sum of the direct quantities. A nested composite counts with its stated
/// quantity, not its internal sum.
pub fn total_weight(components: &[Component]) -> Result<f64> {
    if components.is_empty() {
        return Err(RecipeError::InvalidRecipe(
            "a recipe needs at least one component".to_string(),
        ));
    }
    let mut total = 0.0;
    for component in components {
        if !component.quantity.is_finite() || component.quantity < 0.0 {
            return Err(RecipeError::InvalidRecipe(format!(
                "{} has quantity {}",
                component.label(),
                component.quantity
            )));
        }
        total += component.quantity;
    }
    Ok(total)
}

fn validate(label: &str, components: &[Component]) -> Result<()> {
    total_weight(components).map_err(|e| match e {
        RecipeError::InvalidRecipe(msg) => RecipeError::InvalidRecipe(format!("{label}: {msg}")),
        other => other,
    })?;

    let mut seen = HashSet::new();
    for component in components {
        if !seen.insert(component.label().to_lowercase()) {
            return Err(RecipeError::InvalidRecipe(format!(
                "{label}: `{}` is listed more than once",
                component.label()
            )));
        }
        if let Ingredient::Composite(child) = &component.ingredient {
            child.total_weight()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starter() -> CompositeIngredient {
        CompositeIngredient::new(
            "Sourdough Starter",
            [(BaseIngredient::WATER, 1.0), (BaseIngredient::WHOLE_WHEAT, 1.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_leaf_classification() {
        assert!(BaseIngredient::RYE.is_flour());
        assert!(!BaseIngredient::RYE.is_water_bearing());
        assert!(BaseIngredient::MILK.is_water_bearing());
        assert!(!BaseIngredient::SALT.is_flour());
        assert!(!BaseIngredient::SALT.is_water_bearing());
        assert!(!BaseIngredient::BUTTER.is_flour());
    }

    #[test]
    fn test_lookup_ignores_case_and_whitespace() {
        assert_eq!(
            BaseIngredient::lookup("  Whole Wheat "),
            Some(BaseIngredient::WHOLE_WHEAT)
        );
        assert_eq!(BaseIngredient::lookup("yeast"), None);
    }

    #[test]
    fn test_catalog_labels_unique() {
        let labels: HashSet<_> = BaseIngredient::ALL.iter().map(|l| l.label()).collect();
        assert_eq!(labels.len(), BaseIngredient::ALL.len());
    }

    #[test]
    fn test_composite_is_never_flour() {
        let nested = Ingredient::from(starter());
        assert!(!is_flour(&nested));
        assert!(!is_water_bearing(&nested));
        assert!(is_flour(&BaseIngredient::SPELT.into()));
        assert!(is_water_bearing(&BaseIngredient::WATER.into()));
    }

    #[test]
    fn test_total_weight_counts_nested_quantity_only() {
        let dough = CompositeIngredient::new(
            "Dough",
            [
                Component::new(starter(), 0.5),
                Component::new(BaseIngredient::WHEAT, 5.0),
            ],
        )
        .unwrap();
        assert_eq!(dough.total_weight().unwrap(), 5.5);
    }

    #[test]
    fn test_total_weight_empty_is_invalid() {
        assert!(matches!(
            total_weight(&[]),
            Err(RecipeError::InvalidRecipe(_))
        ));
    }

    #[test]
    fn test_total_weight_negative_is_invalid() {
        let components = [Component::new(BaseIngredient::WATER, -1.0)];
        assert!(matches!(
            total_weight(&components),
            Err(RecipeError::InvalidRecipe(_))
        ));
    }

    #[test]
    fn test_new_rejects_duplicate_labels() {
        let err = CompositeIngredient::new(
            "Twice",
            [(BaseIngredient::WATER, 1.0), (BaseIngredient::WATER, 2.0)],
        )
        .unwrap_err();
        assert!(err.to_string().contains("more than once"), "{err}");
    }

    #[test]
    fn test_new_rejects_empty() {
        let empty: [Component; 0] = [];
        assert!(CompositeIngredient::new("Nothing", empty).is_err());
    }

    #[test]
    fn test_new_rejects_nan_quantity() {
        assert!(CompositeIngredient::new("Bad", [(BaseIngredient::RYE, f64::NAN)]).is_err());
    }

    #[test]
    fn test_default_unit_and_with_unit() {
        let s = starter();
        assert_eq!(s.unit(), DEFAULT_UNIT);
        let grams = composite_ingredient("Starter", [(BaseIngredient::RYE, 1.0)], "grams").unwrap();
        assert_eq!(grams.unit(), "grams");
    }

    #[test]
    fn test_component_lookup_by_label() {
        let s = starter();
        assert_eq!(s.quantity_of("water"), Some(1.0));
        assert_eq!(s.quantity_of("WHOLE WHEAT"), Some(1.0));
        assert!(s.component("rye").is_none());
    }
}

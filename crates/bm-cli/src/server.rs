use std::sync::Arc;

use anyhow::Context;
use bm_core::{
    CompositeIngredient, RecipeError, add_salt_percentage, adjust_ratio_to, export_json, hydrate,
    import_json, multiply, set_quantity,
};
use bm_recipes::Catalog;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::view;

const DEFAULT_SCALE_UNIT: &str = "grams";

#[derive(Clone)]
pub struct BmServer {
    state: Arc<Mutex<ServerState>>,
    tool_router: ToolRouter<Self>,
}

struct ServerState {
    catalog: Catalog,
    /// Last selected catalog entry; `bm_reset` goes back to it.
    template: CompositeIngredient,
    current: CompositeIngredient,
}

impl BmServer {
    pub fn new(catalog: Catalog) -> anyhow::Result<Self> {
        let template = catalog
            .first()
            .cloned()
            .context("recipe catalog is empty")?;
        Ok(Self {
            state: Arc::new(Mutex::new(ServerState {
                catalog,
                current: template.clone(),
                template,
            })),
            tool_router: Self::tool_router(),
        })
    }

    fn recipe_result(recipe: &CompositeIngredient) -> Result<CallToolResult, McpError> {
        let json =
            view::recipe_json(recipe).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&json).unwrap_or_default(),
        )]))
    }

    /// Replace the working recipe with `op(current)`. On error the working
    /// recipe is left as it was.
    async fn apply<F>(&self, op: F) -> Result<CallToolResult, McpError>
    where
        F: FnOnce(&CompositeIngredient) -> bm_core::Result<CompositeIngredient> + Send,
    {
        let mut state = self.state.lock().await;
        let next = op(&state.current).map_err(invalid_params)?;
        let result = Self::recipe_result(&next)?;
        tracing::debug!("working recipe is now '{}'", next.label());
        state.current = next;
        Ok(result)
    }
}

fn invalid_params(e: RecipeError) -> McpError {
    McpError::invalid_params(e.to_string(), None)
}

// --- Tool parameter types ---

#[derive(Debug, Deserialize, JsonSchema)]
struct SelectRequest {
    /// Catalog label of the recipe to work on (case-insensitive)
    recipe: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PercentRequest {
    /// Target as a percentage of total flour weight, e.g. 70 for 70%
    percent: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AdjustRequest {
    /// Label of a direct ingredient of the working recipe
    ingredient: String,
    /// Quantity that ingredient should have after rescaling
    quantity: f64,
    /// Unit of the rescaled recipe (default "grams")
    unit: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct MultiplyRequest {
    /// Factor applied to every quantity, nested recipes included
    factor: f64,
    /// Unit of the result (defaults to the current unit)
    unit: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SetQuantityRequest {
    /// Label of a direct ingredient of the working recipe
    ingredient: String,
    /// New quantity; nested recipes are rescaled to keep their ratios
    quantity: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ImportRequest {
    /// Recipe JSON as produced by bm_export (envelope or bare recipe object)
    recipe: serde_json::Value,
}

#[tool_router]
impl BmServer {
    #[tool(description = "List the recipe catalog by section, plus the label of the working recipe.")]
    async fn bm_list(&self) -> Result<CallToolResult, McpError> {
        let state = self.state.lock().await;
        let mut result = view::catalog_json(&state.catalog);
        result["current"] = serde_json::json!(state.current.label());
        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&result).unwrap_or_default(),
        )]))
    }

    #[tool(
        description = "Select a catalog recipe as the working recipe. Replaces any edits to the previous one."
    )]
    async fn bm_select(
        &self,
        Parameters(req): Parameters<SelectRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        let recipe = state.catalog.get(&req.recipe).cloned().ok_or_else(|| {
            McpError::invalid_params(format!("unknown recipe '{}'", req.recipe), None)
        })?;
        tracing::info!("selected '{}'", recipe.label());
        state.template = recipe.clone();
        state.current = recipe;
        Self::recipe_result(&state.current)
    }

    #[tool(
        description = "Show the working recipe: rendered text, hydration, salt percentage, baker's percentages and the JSON tree."
    )]
    async fn bm_current(&self) -> Result<CallToolResult, McpError> {
        let state = self.state.lock().await;
        Self::recipe_result(&state.current)
    }

    #[tool(
        description = "Rebalance water so total water is the given percentage of total flour, counting water and flour inside nested recipes. May produce negative water when nested ingredients already exceed the target."
    )]
    async fn bm_hydrate(
        &self,
        Parameters(req): Parameters<PercentRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.apply(|current| hydrate(current, req.percent / 100.0))
            .await
    }

    #[tool(
        description = "Rebalance salt so total salt is the given percentage of total flour, counting nested recipes."
    )]
    async fn bm_salt(
        &self,
        Parameters(req): Parameters<PercentRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.apply(|current| add_salt_percentage(current, req.percent / 100.0))
            .await
    }

    #[tool(
        description = "Rescale the whole working recipe so one direct ingredient has the given quantity, e.g. 500 grams of wheat."
    )]
    async fn bm_adjust(
        &self,
        Parameters(req): Parameters<AdjustRequest>,
    ) -> Result<CallToolResult, McpError> {
        let unit = req.unit.unwrap_or_else(|| DEFAULT_SCALE_UNIT.to_string());
        self.apply(|current| adjust_ratio_to(current, &req.ingredient, req.quantity, &unit))
            .await
    }

    #[tool(description = "Multiply every quantity of the working recipe by a factor.")]
    async fn bm_multiply(
        &self,
        Parameters(req): Parameters<MultiplyRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.apply(|current| {
            let unit = req.unit.as_deref().unwrap_or(current.unit()).to_string();
            multiply(current, req.factor, &unit)
        })
        .await
    }

    #[tool(
        description = "Set the quantity of one direct ingredient without touching the others. A nested recipe is rescaled to the new quantity."
    )]
    async fn bm_set_quantity(
        &self,
        Parameters(req): Parameters<SetQuantityRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.apply(|current| set_quantity(current, &req.ingredient, req.quantity))
            .await
    }

    #[tool(description = "Discard edits and go back to the last selected catalog recipe.")]
    async fn bm_reset(&self) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        state.current = state.template.clone();
        Self::recipe_result(&state.current)
    }

    #[tool(description = "Export the working recipe as versioned JSON.")]
    async fn bm_export(&self) -> Result<CallToolResult, McpError> {
        let state = self.state.lock().await;
        let json = export_json(&state.current)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Replace the working recipe with one from JSON. The catalog is unchanged.")]
    async fn bm_import(
        &self,
        Parameters(req): Parameters<ImportRequest>,
    ) -> Result<CallToolResult, McpError> {
        let json = serde_json::to_string(&req.recipe)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let imported = import_json(&json)
            .map_err(|e| McpError::invalid_params(format!("invalid recipe JSON: {e}"), None))?;

        let mut state = self.state.lock().await;
        state.template = imported.clone();
        state.current = imported;
        Self::recipe_result(&state.current)
    }
}

#[tool_handler]
impl ServerHandler for BmServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Baker's math over nested recipes. Quantities are relative weights in the recipe's unit; \
                 a component can itself be a recipe (a starter inside a dough).\n\n\
                 WORKFLOW:\n\
                 1. bm_list to see the catalog, bm_select to pick a working recipe.\n\
                 2. bm_hydrate / bm_salt take percentages of total flour (65 means 65%). \
                    They count water, flour and salt inside nested recipes.\n\
                 3. bm_adjust scales to a concrete weight of one ingredient; bm_multiply scales by a factor.\n\
                 4. bm_set_quantity changes one ingredient only. bm_reset undoes all edits.\n\n\
                 Every tool returns the rendered recipe, a summary with hydration and salt_percentage \
                 as fractions, and warnings for negative quantities."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

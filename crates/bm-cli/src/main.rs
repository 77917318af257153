mod server;
mod view;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use bm_core::{
    CompositeIngredient, add_salt_percentage, adjust_ratio_to, export_json, hydrate, import_json,
    multiply, set_quantity,
};
use bm_recipes::Catalog;
use clap::{Args, Parser, Subcommand};
use rmcp::{ServiceExt, transport::stdio};

#[derive(Parser)]
#[command(name = "bmath", about = "Baker's math for nested recipes: hydration, salt and scaling")]
struct Cli {
    /// Extra recipe templates (TOML) added to the built-in catalog
    #[arg(long, global = true, env = "BMATH_RECIPES")]
    recipes: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Save {
    /// Also write the result as a JSON recipe
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server on stdio transport
    Serve,

    /// List the recipe catalog
    List,

    /// Show a recipe with its hydration and salt
    Show {
        /// Catalog label or path to a .json recipe
        recipe: String,
    },

    /// Rebalance water to a hydration percentage (e.g. 70 or 70%)
    Hydrate {
        recipe: String,
        percent: String,
        #[command(flatten)]
        save: Save,
    },

    /// Rebalance salt to a percentage of total flour
    Salt {
        recipe: String,
        percent: String,
        #[command(flatten)]
        save: Save,
    },

    /// Rescale everything so one ingredient weighs the given quantity
    Scale {
        recipe: String,
        ingredient: String,
        quantity: f64,
        /// Unit of the scaled recipe
        #[arg(long, default_value = "grams")]
        unit: String,
        #[command(flatten)]
        save: Save,
    },

    /// Multiply every quantity by a factor
    Multiply {
        recipe: String,
        factor: f64,
        /// Unit of the result (defaults to the recipe's)
        #[arg(long)]
        unit: Option<String>,
        #[command(flatten)]
        save: Save,
    },

    /// Set one ingredient's quantity; nested recipes keep their ratios
    Set {
        recipe: String,
        ingredient: String,
        quantity: f64,
        #[command(flatten)]
        save: Save,
    },

    /// Export a recipe to a JSON file
    Export {
        recipe: String,
        /// Output file path
        path: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let catalog = load_catalog(&cli)?;

    match &cli.command {
        Commands::Serve => cmd_serve(catalog).await,
        Commands::List => cmd_list(&cli, &catalog),
        Commands::Show { recipe } => emit(&cli, &load_recipe(&catalog, recipe)?, None),
        Commands::Hydrate {
            recipe,
            percent,
            save,
        } => {
            let target = view::parse_percent(percent)?;
            let result = hydrate(&load_recipe(&catalog, recipe)?, target)?;
            emit(&cli, &result, save.save.as_deref())
        }
        Commands::Salt {
            recipe,
            percent,
            save,
        } => {
            let target = view::parse_percent(percent)?;
            let result = add_salt_percentage(&load_recipe(&catalog, recipe)?, target)?;
            emit(&cli, &result, save.save.as_deref())
        }
        Commands::Scale {
            recipe,
            ingredient,
            quantity,
            unit,
            save,
        } => {
            let result = adjust_ratio_to(&load_recipe(&catalog, recipe)?, ingredient, *quantity, unit)?;
            emit(&cli, &result, save.save.as_deref())
        }
        Commands::Multiply {
            recipe,
            factor,
            unit,
            save,
        } => {
            let base = load_recipe(&catalog, recipe)?;
            let unit = unit.as_deref().unwrap_or(base.unit()).to_string();
            let result = multiply(&base, *factor, &unit)?;
            emit(&cli, &result, save.save.as_deref())
        }
        Commands::Set {
            recipe,
            ingredient,
            quantity,
            save,
        } => {
            let result = set_quantity(&load_recipe(&catalog, recipe)?, ingredient, *quantity)?;
            emit(&cli, &result, save.save.as_deref())
        }
        Commands::Export { recipe, path } => cmd_export(&load_recipe(&catalog, recipe)?, path),
    }
}

fn load_catalog(cli: &Cli) -> Result<Catalog> {
    let mut catalog = Catalog::builtin().context("failed to build recipe catalog")?;
    if let Some(path) = &cli.recipes {
        catalog
            .extend_from_toml_file(path)
            .with_context(|| format!("failed to load recipes from {}", path.display()))?;
    }
    tracing::debug!("catalog has {} recipes", catalog.len());
    Ok(catalog)
}

/// A catalog label, or a path to a JSON recipe written by `export`/`--save`.
fn load_recipe(catalog: &Catalog, name: &str) -> Result<CompositeIngredient> {
    let path = Path::new(name);
    if path.extension().is_some_and(|ext| ext == "json") && path.is_file() {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return import_json(&json).with_context(|| format!("failed to import {}", path.display()));
    }
    match catalog.get(name) {
        Some(recipe) => Ok(recipe.clone()),
        None => bail!("unknown recipe '{name}' (see `bmath list`)"),
    }
}

fn emit(cli: &Cli, recipe: &CompositeIngredient, save: Option<&Path>) -> Result<()> {
    if let Some(path) = save {
        write_recipe(recipe, path)?;
    }
    if cli.json {
        let json = view::recipe_json(recipe)?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{}", view::recipe_text(recipe)?);
    }
    if cli.verbose {
        eprintln!(
            "--- {} direct components, unit={} ---",
            recipe.components().len(),
            recipe.unit()
        );
    }
    Ok(())
}

async fn cmd_serve(catalog: Catalog) -> Result<()> {
    tracing::info!("starting MCP server with {} recipes", catalog.len());

    let server = server::BmServer::new(catalog)?;
    let service = match server.serve(stdio()).await {
        Ok(service) => service,
        // stdio only fails the handshake when the client hangs up
        Err(e) => {
            tracing::info!("client left before initialization: {e}");
            return Ok(());
        }
    };

    let reason = service.waiting().await.context("MCP server task failed")?;
    tracing::info!("MCP server stopped: {reason:?}");
    Ok(())
}

fn cmd_list(cli: &Cli, catalog: &Catalog) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view::catalog_json(catalog))?);
    } else {
        println!("{}", view::catalog_text(catalog));
    }
    Ok(())
}

fn cmd_export(recipe: &CompositeIngredient, path: &Path) -> Result<()> {
    write_recipe(recipe, path)?;
    println!("exported {} to {}", recipe.label(), path.display());
    Ok(())
}

fn write_recipe(recipe: &CompositeIngredient, path: &Path) -> Result<()> {
    let json = export_json(recipe).context("failed to serialize recipe")?;
    std::fs::write(path, &json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

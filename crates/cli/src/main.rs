//! Vitrine CLI - Drive the products API, the route table and the category list.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally in one category
//! vitrine products list
//! vitrine products list --category 3
//!
//! # Create a product with an uploaded image (multipart transport)
//! VITRINE_API_TRANSPORT=multipart \
//!     vitrine products create -n Lamp --image-file ./lamp.jpg -c 2
//!
//! # Partial update and delete
//! vitrine products update 7 --name Lamp2
//! vitrine products delete 7
//!
//! # Routing and categories
//! vitrine route /products/category/42
//! vitrine href product-detail --id 7
//! vitrine categories
//! ```
//!
//! # Commands
//!
//! - `products` - CRUD calls against the products API
//! - `categories` - Print the built-in category list
//! - `route` - Resolve a path to a page view
//! - `href` - Build the path of a named route
//!
//! Results are printed to stdout as JSON. Logs go to stderr (`RUST_LOG`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "Vitrine catalog tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call the products API
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Print the built-in categories
    Categories,
    /// Resolve a URL path to a page view
    Route {
        /// Path to resolve (query and fragment are ignored)
        path: String,

        /// Path the router is mounted under (default: `VITRINE_BASE_PATH` or `/`)
        #[arg(long)]
        base: Option<String>,
    },
    /// Build the path of a named route
    Href {
        /// Route name (`home`, `login`, `category`, `products`, `product-detail`)
        name: String,

        /// Value for the route's `id` parameter
        #[arg(long)]
        id: Option<String>,

        /// Path the router is mounted under (default: `VITRINE_BASE_PATH` or `/`)
        #[arg(long)]
        base: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<i32>,
    },
    /// Get one product
    Get {
        /// Product ID
        id: String,
    },
    /// Create a product
    Create {
        /// Product name
        #[arg(short, long)]
        name: String,

        #[command(flatten)]
        image: ImageArgs,

        /// Category ID
        #[arg(short, long)]
        category: i32,
    },
    /// Update only the given fields of a product
    Update {
        /// Product ID
        id: String,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        #[command(flatten)]
        image: ImageArgs,

        /// New category ID
        #[arg(short, long)]
        category: Option<i32>,
    },
    /// Delete a product
    Delete {
        /// Product ID
        id: String,
    },
}

/// Image source for product writes.
#[derive(Args)]
#[group(multiple = false)]
struct ImageArgs {
    /// Upload this image file (multipart transport)
    #[arg(long)]
    image_file: Option<PathBuf>,

    /// Reference an image the backend already has
    #[arg(long)]
    image_ref: Option<String>,
}

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vitrine_storefront=info,vitrine_cli=info".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Products { action } => match action {
            ProductAction::List { category } => commands::products::list(category).await?,
            ProductAction::Get { id } => commands::products::get(&id).await?,
            ProductAction::Create {
                name,
                image,
                category,
            } => {
                let image = commands::products::load_image(image.image_file, image.image_ref)
                    .await?
                    .ok_or(commands::products::ProductsError::MissingImage)?;
                commands::products::create(name, image, category).await?;
            }
            ProductAction::Update {
                id,
                name,
                image,
                category,
            } => {
                let image =
                    commands::products::load_image(image.image_file, image.image_ref).await?;
                commands::products::update(&id, name, image, category).await?;
            }
            ProductAction::Delete { id } => commands::products::delete(&id).await?,
        },
        Commands::Categories => commands::catalog::categories()?,
        Commands::Route { path, base } => {
            commands::catalog::route(base.as_deref(), &path)?;
        }
        Commands::Href { name, id, base } => {
            commands::catalog::href(base.as_deref(), &name, id.as_deref())?;
        }
    }
    Ok(())
}

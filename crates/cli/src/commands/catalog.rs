//! Categories and routing commands. These need no API configuration.
//!
//! # Usage
//!
//! ```bash
//! vitrine categories
//! vitrine route /products/category/42
//! vitrine href category --id 42 --base /shop/
//! ```

use vitrine_core::CategoryRegistry;
use vitrine_storefront::config::RouterConfig;
use vitrine_storefront::router::{RouteError, RouteName, RouteTable};

use super::print_json;

/// Print the built-in category list.
pub fn categories() -> Result<(), Box<dyn std::error::Error>> {
    let registry = CategoryRegistry::builtin();
    print_json(registry.as_slice())?;
    Ok(())
}

/// Route table at `--base` if given, else at `VITRINE_BASE_PATH`.
fn route_table(base: Option<&str>) -> Result<RouteTable, RouteError> {
    let config = base.map_or_else(RouterConfig::from_env, RouterConfig::new);
    tracing::debug!(base = %config.base_path, "Using route base path");
    RouteTable::from_config(&config)
}

/// Resolve `path` against the route table.
pub fn route(base: Option<&str>, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let routes = route_table(base)?;
    let resolved = routes.resolve(path);
    tracing::debug!(path = %path, route = %resolved.name, "Resolved route");
    print_json(&resolved)?;
    Ok(())
}

/// Print the path of the route called `name`.
pub fn href(
    base: Option<&str>,
    name: &str,
    id: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let routes = route_table(base)?;
    let name: RouteName = name.parse()?;
    let params: Vec<(&str, &str)> = id.map(|id| ("id", id)).into_iter().collect();
    print_json(&routes.href(name, &params)?)?;
    Ok(())
}

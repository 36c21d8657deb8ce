//! Route table mapping URL paths to page views.
//!
//! # Routes
//!
//! ```text
//! /                         home
//! /login                    login
//! /products                 products
//! /products/category/{id}   category        (id: category id)
//! /product/{id}             product-detail  (id: product id)
//! anything else             not-found
//! ```
//!
//! Matching is done by a `matchit` radix tree: literal segments plus single
//! named-parameter segments. The table is built once and never mutated.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use matchit::Router as MatchitRouter;
use serde::Serialize;
use thiserror::Error;

use crate::config::RouterConfig;

/// Errors raised when building the table or reverse routing.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A pattern could not be registered.
    #[error("invalid route: {0}")]
    Insert(#[from] matchit::InsertError),

    /// `href` was called without a parameter the route needs.
    #[error("route {route} requires parameter {param}")]
    MissingParam { route: RouteName, param: &'static str },

    /// The route has no path of its own.
    #[error("route {0} has no path")]
    NoPath(RouteName),
}

/// Page view a path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteName {
    Home,
    Login,
    Category,
    Products,
    ProductDetail,
    /// Fallback for paths no route matches.
    NotFound,
}

impl RouteName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Login => "login",
            Self::Category => "category",
            Self::Products => "products",
            Self::ProductDetail => "product-detail",
            Self::NotFound => "not-found",
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Self::Home),
            "login" => Ok(Self::Login),
            "category" => Ok(Self::Category),
            "products" => Ok(Self::Products),
            "product-detail" => Ok(Self::ProductDetail),
            "not-found" => Ok(Self::NotFound),
            _ => Err(format!("unknown route: {s}")),
        }
    }
}

/// A static route definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub name: RouteName,
    /// `matchit` pattern, parameters written as `{name}`.
    pub pattern: &'static str,
    pub params: &'static [&'static str],
}

/// Every routed view, in registration order.
pub const ROUTES: &[Route] = &[
    Route {
        name: RouteName::Home,
        pattern: "/",
        params: &[],
    },
    Route {
        name: RouteName::Login,
        pattern: "/login",
        params: &[],
    },
    Route {
        name: RouteName::Category,
        pattern: "/products/category/{id}",
        params: &["id"],
    },
    Route {
        name: RouteName::Products,
        pattern: "/products",
        params: &[],
    },
    Route {
        name: RouteName::ProductDetail,
        pattern: "/product/{id}",
        params: &["id"],
    },
];

/// Outcome of resolving a path. Always names exactly one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
    pub name: RouteName,
    pub params: BTreeMap<String, String>,
}

impl ResolvedRoute {
    const fn not_found() -> Self {
        Self {
            name: RouteName::NotFound,
            params: BTreeMap::new(),
        }
    }

    /// A decoded path parameter.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.name == RouteName::NotFound
    }
}

/// The application's route table, mounted under a base path.
pub struct RouteTable {
    /// Normalized base: empty for `/`, otherwise `/segment` with no trailing slash.
    base: String,
    tree: MatchitRouter<RouteName>,
}

impl RouteTable {
    /// Build the table mounted at `base_path` (e.g. `/` or `/shop/`).
    ///
    /// # Errors
    ///
    /// Returns `RouteError::Insert` if a route pattern is rejected.
    pub fn new(base_path: &str) -> Result<Self, RouteError> {
        let mut tree = MatchitRouter::new();
        for route in ROUTES {
            tree.insert(route.pattern, route.name)?;
        }
        Ok(Self {
            base: normalize_base(base_path),
            tree,
        })
    }

    /// Build the table mounted at the configured base path.
    ///
    /// # Errors
    ///
    /// Returns `RouteError::Insert` if a route pattern is rejected.
    pub fn from_config(config: &RouterConfig) -> Result<Self, RouteError> {
        Self::new(&config.base_path)
    }

    /// Base path as configured, always ending in `/`.
    #[must_use]
    pub fn base_path(&self) -> String {
        format!("{}/", self.base)
    }

    /// Registered routes, in registration order.
    #[must_use]
    pub const fn routes(&self) -> &'static [Route] {
        ROUTES
    }

    /// Resolve a location (path with optional query and fragment) to a view.
    ///
    /// Unmatched paths, including those outside the base path, resolve to
    /// [`RouteName::NotFound`].
    #[must_use]
    pub fn resolve(&self, location: &str) -> ResolvedRoute {
        let path = location.split(['?', '#']).next().unwrap_or(location);

        let Some(path) = self.strip_base(path) else {
            return ResolvedRoute::not_found();
        };
        // Trim one trailing slash, but never into an empty segment (`//`).
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() && !trimmed.ends_with('/') => trimmed,
            _ => path,
        };

        let Ok(matched) = self.tree.at(path) else {
            return ResolvedRoute::not_found();
        };

        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), decode_param(v)))
            .collect();

        ResolvedRoute {
            name: *matched.value,
            params,
        }
    }

    /// Build the URL of a named route, base path included.
    ///
    /// # Errors
    ///
    /// Returns `RouteError::MissingParam` if a required parameter is absent,
    /// or `RouteError::NoPath` for [`RouteName::NotFound`].
    pub fn href(&self, name: RouteName, params: &[(&str, &str)]) -> Result<String, RouteError> {
        let route = ROUTES
            .iter()
            .find(|r| r.name == name)
            .ok_or(RouteError::NoPath(name))?;

        let mut path = route.pattern.to_owned();
        for &param in route.params {
            let value = params
                .iter()
                .find(|(k, _)| *k == param)
                .map(|(_, v)| *v)
                .ok_or(RouteError::MissingParam { route: name, param })?;
            path = path.replace(&format!("{{{param}}}"), &urlencoding::encode(value));
        }

        Ok(format!("{}{path}", self.base))
    }

    /// The path relative to the base, or `None` when outside it.
    fn strip_base<'a>(&self, path: &'a str) -> Option<&'a str> {
        let path = if path.is_empty() { "/" } else { path };
        if self.base.is_empty() {
            return Some(path);
        }
        match path.strip_prefix(self.base.as_str())? {
            "" => Some("/"),
            rest if rest.starts_with('/') => Some(rest),
            _ => None,
        }
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("base", &self.base_path())
            .field("routes", &ROUTES.len())
            .finish_non_exhaustive()
    }
}

/// Empty for `/`, otherwise `/segment` with no trailing slash.
pub(crate) fn normalize_base(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn decode_param(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), std::borrow::Cow::into_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new("/").unwrap()
    }

    #[test]
    fn test_resolve_static_routes() {
        let routes = table();
        assert_eq!(routes.resolve("/").name, RouteName::Home);
        assert_eq!(routes.resolve("/login").name, RouteName::Login);
        assert_eq!(routes.resolve("/products").name, RouteName::Products);
        assert!(routes.resolve("/products").params.is_empty());
    }

    #[test]
    fn test_resolve_category_param() {
        let resolved = table().resolve("/products/category/42");
        assert_eq!(resolved.name, RouteName::Category);
        assert_eq!(resolved.param("id"), Some("42"));
        assert_eq!(resolved.params.len(), 1);
    }

    #[test]
    fn test_resolve_product_detail_param() {
        let resolved = table().resolve("/product/7");
        assert_eq!(resolved.name, RouteName::ProductDetail);
        assert_eq!(resolved.param("id"), Some("7"));
    }

    #[test]
    fn test_unmatched_paths_fall_back_to_not_found() {
        let routes = table();
        for path in [
            "/cart",
            "/product",
            "/product/7/reviews",
            "/products/category",
            "/LOGIN",
            "//",
            "/login//",
            "/product//",
        ] {
            let resolved = routes.resolve(path);
            assert!(resolved.is_not_found(), "{path} should not match");
            assert!(resolved.params.is_empty());
        }
    }

    #[test]
    fn test_query_and_fragment_are_ignored() {
        let routes = table();
        assert_eq!(routes.resolve("/products?page=2").name, RouteName::Products);
        assert_eq!(routes.resolve("/login#top").name, RouteName::Login);

        let resolved = routes.resolve("/product/7?ref=home#reviews");
        assert_eq!(resolved.param("id"), Some("7"));
    }

    #[test]
    fn test_trailing_slash_is_tolerated() {
        let routes = table();
        assert_eq!(routes.resolve("/login/").name, RouteName::Login);
        assert_eq!(routes.resolve("/product/7/").param("id"), Some("7"));
        assert_eq!(routes.resolve("").name, RouteName::Home);
    }

    #[test]
    fn test_params_are_percent_decoded() {
        let resolved = table().resolve("/product/caf%C3%A9%20lamp");
        assert_eq!(resolved.param("id"), Some("café lamp"));
    }

    #[test]
    fn test_base_path_is_stripped() {
        let routes = RouteTable::new("/shop/").unwrap();
        assert_eq!(routes.base_path(), "/shop/");
        assert!(routes.resolve("/shop//").is_not_found());
        assert_eq!(routes.resolve("/shop").name, RouteName::Home);
        assert_eq!(routes.resolve("/shop/").name, RouteName::Home);
        assert_eq!(routes.resolve("/shop/login").name, RouteName::Login);
        assert_eq!(
            routes.resolve("/shop/products/category/3").param("id"),
            Some("3")
        );
        assert!(routes.resolve("/login").is_not_found());
        assert!(routes.resolve("/shopping/login").is_not_found());
    }

    #[test]
    fn test_href_builds_paths() {
        let routes = table();
        assert_eq!(routes.href(RouteName::Home, &[]).unwrap(), "/");
        assert_eq!(routes.href(RouteName::Products, &[]).unwrap(), "/products");
        assert_eq!(
            routes.href(RouteName::Category, &[("id", "3")]).unwrap(),
            "/products/category/3"
        );
        assert_eq!(
            routes.href(RouteName::ProductDetail, &[("id", "a b")]).unwrap(),
            "/product/a%20b"
        );
    }

    #[test]
    fn test_href_with_base_path() {
        let routes = RouteTable::new("shop").unwrap();
        assert_eq!(routes.href(RouteName::Home, &[]).unwrap(), "/shop/");
        assert_eq!(
            routes.href(RouteName::ProductDetail, &[("id", "7")]).unwrap(),
            "/shop/product/7"
        );
    }

    #[test]
    fn test_from_config_accepts_unslashed_base() {
        let routes = RouteTable::from_config(&RouterConfig::new("shop")).unwrap();
        assert_eq!(routes.base_path(), "/shop/");
        assert_eq!(routes.resolve("/shop/login").name, RouteName::Login);
        assert_eq!(
            routes.href(RouteName::Category, &[("id", "2")]).unwrap(),
            "/shop/products/category/2"
        );
    }

    #[test]
    fn test_href_errors() {
        let routes = table();
        assert!(matches!(
            routes.href(RouteName::Category, &[]),
            Err(RouteError::MissingParam {
                route: RouteName::Category,
                param: "id"
            })
        ));
        assert!(matches!(
            routes.href(RouteName::NotFound, &[]),
            Err(RouteError::NoPath(RouteName::NotFound))
        ));
    }

    #[test]
    fn test_href_round_trips_through_resolve() {
        let routes = RouteTable::new("/shop").unwrap();
        for route in routes.routes() {
            let params: Vec<(&str, &str)> = route.params.iter().map(|p| (*p, "9")).collect();
            let href = routes.href(route.name, &params).unwrap();
            let resolved = routes.resolve(&href);
            assert_eq!(resolved.name, route.name, "{href}");
            for p in route.params {
                assert_eq!(resolved.param(p), Some("9"));
            }
        }
    }

    #[test]
    fn test_route_name_strings() {
        for name in [
            RouteName::Home,
            RouteName::Login,
            RouteName::Category,
            RouteName::Products,
            RouteName::ProductDetail,
            RouteName::NotFound,
        ] {
            assert_eq!(name.as_str().parse::<RouteName>().unwrap(), name);
        }
        assert_eq!(
            serde_json::to_value(RouteName::ProductDetail).unwrap(),
            "product-detail"
        );
    }
}

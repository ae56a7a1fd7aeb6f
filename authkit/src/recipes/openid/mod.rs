//! OpenID recipe.
//!
//! Composes the JWT recipe: serves the provider discovery document and
//! mints tokens that always carry the configured issuer claim. The JWT
//! sub-recipe keeps its own independent override layer, configured through
//! the `jwt` field of [`OpenIdOverrides`].

mod api;
mod config;
mod recipe;
mod types;

pub use api::{ApiInterface, DISCOVERY_ROUTE, OpenIdApiOptions, TOKEN_ROUTE};
pub use config::{OpenIdConfig, OpenIdOverrides, OpenIdSettings};
pub use recipe::{OpenIdRecipe, RECIPE_ID, RecipeInterface, init};
pub use types::{DiscoveryConfiguration, GetDiscoveryConfigurationInput};

//! Third-party-email-password recipe.
//!
//! One recipe offering both password and provider sign-in, built by
//! composing the two standalone recipes through a unified capability
//! table and a pair of adapters (see [`recipe`] and `adapters`).

mod adapters;
mod config;
mod recipe;
mod types;

pub use config::{TpepConfig, TpepOverrides, TpepSettings};
pub use recipe::{ApiInterface, RECIPE_ID, RecipeInterface, TpepRecipe, init};
pub use types::{
    GetUserByEmailInput, GetUserByIdInput, SignInUpCredentials, SignInUpInput, SignInUpOutcome,
    User,
};

//! Email-password authentication recipe.
//!
//! Sign-up and sign-in against the remote core with credentials collected
//! by the host application. Password hashing and storage live in the core;
//! this recipe owns the HTTP surface, input validation, and the capability
//! tables the integrator can override.

mod api;
mod config;
mod recipe;
mod types;

pub use api::{
    ApiInterface, EMAIL_EXISTS_ROUTE, EmailPasswordApiOptions, SIGN_IN_ROUTE, SIGN_UP_ROUTE,
};
pub use config::{
    DEFAULT_MINIMUM_PASSWORD_LENGTH, EmailPasswordConfig, EmailPasswordOverrides,
    EmailPasswordSettings,
};
pub use recipe::{EmailPasswordRecipe, RECIPE_ID, RecipeInterface, init};
pub use types::{
    GetUserByEmailInput, GetUserByIdInput, SignInInput, SignInOutcome, SignUpInput, SignUpOutcome,
    User,
};

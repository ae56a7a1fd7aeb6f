//! The recipe kernel: capability-table slots, override hooks, route
//! descriptors, and the module trait every recipe implements.
//!
//! Every recipe in this crate (session, emailpassword, jwt, openid,
//! userroles, thirdparty, thirdpartyemailpassword) is an instance of the
//! same pattern:
//!
//! 1. normalize the sparse config into settings,
//! 2. build a default programmatic capability table and run the user's
//!    `functions` override hook over it,
//! 3. build a default HTTP capability table (which sees the post-override
//!    programmatic table through the per-request options bundle) and run the
//!    user's `apis` override hook over it,
//! 4. derive one route descriptor per known route id, enabled iff the HTTP
//!    slot survived the overrides,
//! 5. expose the whole thing through [`RecipeModule`].

mod module;
mod overrides;
mod routes;

pub use module::{
    ApiHandler, ApiOptions, BoxFuture, Fallback, Op, RecipeBuildContext, RecipeInit, RecipeModule,
    passthrough_fallback,
};
pub use overrides::{OverrideFn, Overrides, apply_override};
pub use routes::{RouteDescriptor, find_route};

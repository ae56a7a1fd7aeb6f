//! Route descriptors and the matching used by the process registry

use http::Method;

/// One HTTP endpoint a recipe owns.
///
/// Immutable after construction; recomputing a descriptor requires
/// rebuilding the recipe. `enabled` is derived at construction from whether
/// the corresponding HTTP capability-table slot survived the overrides.
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    /// Route id, unique within the recipe
    pub id: &'static str,
    pub method: Method,
    /// Path relative to the application's api base path
    pub path: &'static str,
    /// False when the HTTP slot was cleared by an override; a disabled
    /// route never matches, so the host's own handler (or 404) answers
    pub enabled: bool,
    /// Recipe id that dispatches this route. Differs from the recipe that
    /// *advertises* it only inside composed recipes, where sub-recipe
    /// routes are re-exported under the composer.
    pub handled_by: &'static str,
}

impl RouteDescriptor {
    pub fn new(
        id: &'static str,
        method: Method,
        path: &'static str,
        enabled: bool,
        handled_by: &'static str,
    ) -> Self {
        Self {
            id,
            method,
            path,
            enabled,
            handled_by,
        }
    }
}

/// Find the first enabled descriptor matching an exact (method, relative
/// path) pair. `relative_path` must already have the api base path stripped
/// and be in normalized form (leading slash, no trailing slash).
pub fn find_route<'a>(
    routes: &'a [RouteDescriptor],
    method: &Method,
    relative_path: &str,
) -> Option<&'a RouteDescriptor> {
    routes
        .iter()
        .find(|route| route.enabled && route.method == *method && route.path == relative_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> Vec<RouteDescriptor> {
        vec![
            RouteDescriptor::new("signin", Method::POST, "/signin", true, "emailpassword"),
            RouteDescriptor::new("signup", Method::POST, "/signup", false, "emailpassword"),
            RouteDescriptor::new(
                "emailexists",
                Method::GET,
                "/signup/email/exists",
                true,
                "emailpassword",
            ),
        ]
    }

    #[test]
    fn test_exact_match_on_method_and_path() {
        let routes = routes();
        let hit = find_route(&routes, &Method::POST, "/signin").unwrap();
        assert_eq!(hit.id, "signin");
        assert!(find_route(&routes, &Method::GET, "/signin").is_none());
        assert!(find_route(&routes, &Method::POST, "/sign").is_none());
    }

    #[test]
    fn test_disabled_routes_never_match() {
        let routes = routes();
        assert!(find_route(&routes, &Method::POST, "/signup").is_none());
    }

    mod props {
        use proptest::prelude::*;

        use crate::config::NormalizedPath;

        proptest! {
            /// Joining a normalized suffix under a base and stripping the
            /// base again is the identity
            #[test]
            fn join_then_strip_roundtrips(segments in proptest::collection::vec("[a-z0-9]{1,8}", 1..4)) {
                let base = NormalizedPath::parse("/auth", "p").unwrap();
                let suffix = format!("/{}", segments.join("/"));
                let joined = base.join(&suffix);
                prop_assert_eq!(base.strip_from(&joined), Some(suffix));
            }

            /// Path normalization is idempotent regardless of stray slashes
            #[test]
            fn normalization_is_idempotent(segments in proptest::collection::vec("[a-z0-9]{1,8}", 0..4), trailing in any::<bool>()) {
                let mut raw = segments.iter().map(|s| format!("//{s}")).collect::<String>();
                if trailing {
                    raw.push('/');
                }
                let once = NormalizedPath::parse(&raw, "p").unwrap();
                let twice = NormalizedPath::parse(once.as_str(), "p").unwrap();
                prop_assert_eq!(once, twice);
            }
        }
    }
}

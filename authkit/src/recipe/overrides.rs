//! Override hooks: user-supplied transformations of a default capability
//! table into the final one.
//!
//! Each recipe carries two independent hooks, one for the programmatic
//! table and one for the HTTP table. A hook receives the full default table
//! and returns a table of the same shape; replacing a slot, wrapping it (by
//! capturing the previous value in a closure), and clearing it to `None`
//! are all first-class moves. Applying a hook cannot fail: a misbehaving
//! override surfaces as a failure in the wrapped operation itself.

/// A user-supplied transformation of a capability table
pub type OverrideFn<T> = Box<dyn Fn(T) -> T + Send + Sync>;

/// The override record of a simple (non-composed) recipe. Composed recipes
/// define their own record with one extra field per sub-recipe, so that
/// overriding a sub-recipe is configured independently of overriding the
/// composer.
pub struct Overrides<R, A> {
    /// Hook over the programmatic capability table
    pub functions: Option<OverrideFn<R>>,
    /// Hook over the HTTP capability table; runs after `functions`, and the
    /// HTTP defaults already see the post-override programmatic table
    pub apis: Option<OverrideFn<A>>,
}

impl<R, A> Default for Overrides<R, A> {
    fn default() -> Self {
        Self {
            functions: None,
            apis: None,
        }
    }
}

/// Run a hook over a default table; absent hook means identity
pub fn apply_override<T>(default: T, hook: Option<OverrideFn<T>>) -> T {
    match hook {
        Some(hook) => hook(default),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::errors::AuthError;
    use crate::recipe::module::Op;

    /// Minimal stand-in for a recipe's programmatic table
    struct Table {
        greet: Option<Op<String, String>>,
    }

    fn default_table() -> Table {
        Table {
            greet: Some(Arc::new(|name| {
                Box::pin(async move { Ok(format!("hello {name}")) })
            })),
        }
    }

    #[tokio::test]
    async fn test_no_hook_is_identity() {
        let default = default_table();
        let original = default.greet.clone().unwrap();
        let finalized = apply_override(default, None);
        // The exact same slot value survives, not a rebuilt equivalent
        assert!(Arc::ptr_eq(&original, &finalized.greet.unwrap()));
    }

    #[tokio::test]
    async fn test_clearing_a_slot_is_distinct_from_leaving_it() {
        let finalized = apply_override(
            default_table(),
            Some(Box::new(|mut table: Table| {
                table.greet = None;
                table
            }) as OverrideFn<Table>),
        );
        assert!(finalized.greet.is_none());
    }

    #[tokio::test]
    async fn test_wrap_calls_through_to_original() {
        let finalized = apply_override(
            default_table(),
            Some(Box::new(|mut table: Table| {
                let original = table.greet.take().expect("default slot populated");
                table.greet = Some(Arc::new(move |name: String| {
                    let original = original.clone();
                    Box::pin(async move {
                        let inner = original(name).await?;
                        Ok(format!("[{inner}]"))
                    })
                }));
                table
            }) as OverrideFn<Table>),
        );
        let greet = finalized.greet.unwrap();
        assert_eq!(greet("world".to_string()).await.unwrap(), "[hello world]");
    }

    fn wrapping_hook(label: &'static str, events: Arc<Mutex<Vec<String>>>) -> OverrideFn<Table> {
        Box::new(move |mut table: Table| {
            let original = table.greet.take().expect("slot populated");
            let events = events.clone();
            table.greet = Some(Arc::new(move |name: String| {
                let original = original.clone();
                let events = events.clone();
                Box::pin(async move {
                    events.lock().unwrap().push(format!("{label}-pre"));
                    let inner = original(name).await?;
                    events.lock().unwrap().push(format!("{label}-post"));
                    Ok(inner)
                })
            }));
            table
        })
    }

    #[tokio::test]
    async fn test_double_wrap_executes_newest_first() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let logging_default = {
            let events = events.clone();
            Table {
                greet: Some(Arc::new(move |name: String| {
                    let events = events.clone();
                    Box::pin(async move {
                        events.lock().unwrap().push("default".to_string());
                        Ok(name)
                    })
                })),
            }
        };

        let after_a = apply_override(logging_default, Some(wrapping_hook("A", events.clone())));
        let after_b = apply_override(after_a, Some(wrapping_hook("B", events.clone())));

        after_b.greet.unwrap()("x".to_string()).await.unwrap();
        assert_eq!(
            *events.lock().unwrap(),
            vec!["B-pre", "A-pre", "default", "A-post", "B-post"]
        );
    }
}

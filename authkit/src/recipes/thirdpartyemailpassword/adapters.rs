//! Adapters between the unified capability table and the two sub-recipes'
//! narrower tables.
//!
//! Each adapter is an override hook over the sub-recipe's default table:
//! the delegating slots are replaced with closures that wrap the
//! composer's unified operation, mapping the narrower call into the
//! credential union and the unified outcome back onto the narrower
//! tagged-union result. The mappings are total — branches that cannot
//! occur for a given credential variant are mapped to an explicit domain
//! error rather than silently ignored. A sub-recipe driven this way never
//! learns the composer exists. Clearing the unified slot cascades: the
//! derived sub-recipe slots come out cleared as well.

use std::sync::Arc;

use crate::errors::AuthError;
use crate::recipe::{Op, OverrideFn};
use crate::recipes::{emailpassword, thirdparty};

use super::recipe::RecipeInterface;
use super::types::{SignInUpCredentials, SignInUpInput, SignInUpOutcome, User};

/// Compose the adapter-derived hook with the integrator's own sub-recipe
/// hook; the integrator's hook sees the adapted table, so it can wrap the
/// composer-driven operations like any other default
pub(super) fn chain<T: 'static>(
    first: OverrideFn<T>,
    second: Option<OverrideFn<T>>,
) -> OverrideFn<T> {
    match second {
        Some(second) => Box::new(move |table| second(first(table))),
        None => first,
    }
}

fn email_password_user(user: User) -> emailpassword::User {
    emailpassword::User {
        id: user.id,
        email: user.email,
        time_joined: user.time_joined,
    }
}

fn third_party_user(user: User) -> Result<thirdparty::User, AuthError> {
    let third_party = user.third_party.ok_or_else(|| {
        AuthError::UnexpectedCoreResponse(
            "third-party sign-in produced a user without provider info".to_string(),
        )
    })?;
    Ok(thirdparty::User {
        id: user.id,
        email: user.email,
        time_joined: user.time_joined,
        third_party,
    })
}

fn adapted_sign_up(
    unified_op: Op<SignInUpInput, SignInUpOutcome>,
) -> Op<emailpassword::SignUpInput, emailpassword::SignUpOutcome> {
    Arc::new(move |input: emailpassword::SignUpInput| {
        let unified_op = unified_op.clone();
        Box::pin(async move {
            let outcome = unified_op(SignInUpInput {
                credentials: SignInUpCredentials::EmailPasswordSignUp {
                    email: input.email,
                    password: input.password,
                },
                tenant_id: input.tenant_id,
                context: input.context,
            })
            .await?;
            match outcome {
                SignInUpOutcome::Ok { user, .. } => Ok(emailpassword::SignUpOutcome::Ok {
                    user: email_password_user(user),
                }),
                SignInUpOutcome::EmailAlreadyExists => {
                    Ok(emailpassword::SignUpOutcome::EmailAlreadyExists)
                }
                SignInUpOutcome::WrongCredentials => Err(AuthError::UnexpectedCoreResponse(
                    "wrong-credentials outcome for a sign-up call".to_string(),
                )),
            }
        })
    })
}

fn adapted_sign_in(
    unified_op: Op<SignInUpInput, SignInUpOutcome>,
) -> Op<emailpassword::SignInInput, emailpassword::SignInOutcome> {
    Arc::new(move |input: emailpassword::SignInInput| {
        let unified_op = unified_op.clone();
        Box::pin(async move {
            let outcome = unified_op(SignInUpInput {
                credentials: SignInUpCredentials::EmailPasswordSignIn {
                    email: input.email,
                    password: input.password,
                },
                tenant_id: input.tenant_id,
                context: input.context,
            })
            .await?;
            match outcome {
                SignInUpOutcome::Ok { user, .. } => Ok(emailpassword::SignInOutcome::Ok {
                    user: email_password_user(user),
                }),
                SignInUpOutcome::WrongCredentials => {
                    Ok(emailpassword::SignInOutcome::WrongCredentials)
                }
                SignInUpOutcome::EmailAlreadyExists => Err(AuthError::UnexpectedCoreResponse(
                    "email-exists outcome for a sign-in call".to_string(),
                )),
            }
        })
    })
}

fn adapted_ep_get_user_by_id(
    unified_op: Op<super::types::GetUserByIdInput, Option<User>>,
) -> Op<emailpassword::GetUserByIdInput, Option<emailpassword::User>> {
    Arc::new(move |input: emailpassword::GetUserByIdInput| {
        let unified_op = unified_op.clone();
        Box::pin(async move {
            let user = unified_op(super::types::GetUserByIdInput {
                user_id: input.user_id,
                tenant_id: input.tenant_id,
                context: input.context,
            })
            .await?;
            // A provider-backed account is not an email-password user
            Ok(user
                .filter(|user| user.third_party.is_none())
                .map(email_password_user))
        })
    })
}

fn adapted_ep_get_user_by_email(
    unified_op: Op<super::types::GetUserByEmailInput, Option<User>>,
) -> Op<emailpassword::GetUserByEmailInput, Option<emailpassword::User>> {
    Arc::new(move |input: emailpassword::GetUserByEmailInput| {
        let unified_op = unified_op.clone();
        Box::pin(async move {
            let user = unified_op(super::types::GetUserByEmailInput {
                email: input.email,
                tenant_id: input.tenant_id,
                context: input.context,
            })
            .await?;
            Ok(user
                .filter(|user| user.third_party.is_none())
                .map(email_password_user))
        })
    })
}

fn adapted_tp_sign_in_up(
    unified_op: Op<SignInUpInput, SignInUpOutcome>,
) -> Op<thirdparty::SignInUpInput, thirdparty::SignInUpOutcome> {
    Arc::new(move |input: thirdparty::SignInUpInput| {
        let unified_op = unified_op.clone();
        Box::pin(async move {
            let outcome = unified_op(SignInUpInput {
                credentials: SignInUpCredentials::ThirdParty {
                    third_party_id: input.third_party_id,
                    third_party_user_id: input.third_party_user_id,
                    email: input.email,
                },
                tenant_id: input.tenant_id,
                context: input.context,
            })
            .await?;
            match outcome {
                SignInUpOutcome::Ok {
                    created_new_user,
                    user,
                } => Ok(thirdparty::SignInUpOutcome {
                    created_new_user,
                    user: third_party_user(user)?,
                }),
                SignInUpOutcome::EmailAlreadyExists => Err(AuthError::UnexpectedCoreResponse(
                    "email-exists outcome for a third-party call".to_string(),
                )),
                SignInUpOutcome::WrongCredentials => Err(AuthError::UnexpectedCoreResponse(
                    "wrong-credentials outcome for a third-party call".to_string(),
                )),
            }
        })
    })
}

fn adapted_tp_get_user_by_id(
    unified_op: Op<super::types::GetUserByIdInput, Option<User>>,
) -> Op<thirdparty::GetUserByIdInput, Option<thirdparty::User>> {
    Arc::new(move |input: thirdparty::GetUserByIdInput| {
        let unified_op = unified_op.clone();
        Box::pin(async move {
            let user = unified_op(super::types::GetUserByIdInput {
                user_id: input.user_id,
                tenant_id: input.tenant_id,
                context: input.context,
            })
            .await?;
            match user {
                Some(user) if user.third_party.is_some() => Ok(Some(third_party_user(user)?)),
                _ => Ok(None),
            }
        })
    })
}

/// Derive the email-password recipe's programmatic table from the unified
/// one
pub(super) fn email_password_functions(
    unified: Arc<RecipeInterface>,
) -> OverrideFn<emailpassword::RecipeInterface> {
    Box::new(move |mut table: emailpassword::RecipeInterface| {
        table.sign_up = unified.sign_in_up.clone().map(adapted_sign_up);
        table.sign_in = unified.sign_in_up.clone().map(adapted_sign_in);
        table.get_user_by_id = unified.get_user_by_id.clone().map(adapted_ep_get_user_by_id);
        table.get_user_by_email = unified
            .get_user_by_email
            .clone()
            .map(adapted_ep_get_user_by_email);
        table
    })
}

/// Derive the third-party recipe's programmatic table from the unified
/// one. The authorisation-url operation stays with the sub-recipe's
/// default: it is config-local and has no unified counterpart.
pub(super) fn third_party_functions(
    unified: Arc<RecipeInterface>,
) -> OverrideFn<thirdparty::RecipeInterface> {
    Box::new(move |mut table: thirdparty::RecipeInterface| {
        table.sign_in_up = unified.sign_in_up.clone().map(adapted_tp_sign_in_up);
        table.get_user_by_id = unified.get_user_by_id.clone().map(adapted_tp_get_user_by_id);
        table
    })
}

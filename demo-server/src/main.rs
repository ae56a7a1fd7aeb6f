//! Demo application: a small axum server with the email-password, session,
//! and OpenID recipes mounted under `/auth`.
//!
//! Configuration comes from the environment (a `.env` file works):
//! - `AUTHKIT_CORE_URI`: base URI of the authentication core
//! - `AUTHKIT_API_KEY`: optional shared secret
//! - `ORIGIN`: website origin, e.g. `http://localhost:3000`

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use authkit::{AppConfig, AuthConfig, CoreConfig, ProcessRegistry};
use authkit::{emailpassword, openid, session};
use authkit_axum::{cors_layer, with_authkit};

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "authkit=debug,authkit_axum=debug,demo_server=debug,info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn auth_config() -> AuthConfig {
    let origin = std::env::var("ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());
    AuthConfig {
        app: AppConfig {
            app_name: Some("Demo App".to_string()),
            api_domain: Some(origin.clone()),
            website_domain: Some(origin),
            ..Default::default()
        },
        core: CoreConfig {
            connection_uri: std::env::var("AUTHKIT_CORE_URI").ok(),
            api_key: std::env::var("AUTHKIT_API_KEY").ok(),
        },
        recipes: vec![
            emailpassword::init(Default::default()),
            session::init(Default::default()),
            openid::init(Default::default()),
        ],
    }
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "message": "demo server up",
        "try": ["/auth/signup", "/auth/signin", "/auth/.well-known/openid-configuration"],
    }))
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let registry = match ProcessRegistry::build(auth_config()) {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            tracing::error!("failed to initialize authkit: {e}");
            std::process::exit(1);
        }
    };

    let app = Router::new().route("/", get(index));
    let app = with_authkit(app, registry.clone()).layer(cors_layer(&registry));

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("demo server listening on {addr}");
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}

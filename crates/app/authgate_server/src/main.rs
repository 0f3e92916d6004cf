//! Authgate HTTP server binary.
//!
//! Verifies credentials against the users API and issues 72 h session tokens.

use std::time::Duration;

use authgate_api::config::ApiConfig;
use authgate_core::auth::SigningSecret;
use authgate_core::config::{ConfigError, parse_allowed_users, resolve_signing_secret};
use clap::Parser;
use tracing::{info, warn};
use url::Url;

/// CLI arguments for the auth server.
#[derive(Parser, Debug)]
#[command(name = "authgate_server", about = "Authgate credential and token server")]
struct Args {
    /// Interface to listen on.
    #[arg(long, env = "AUTH_API_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "AUTH_API_PORT", default_value_t = 8000)]
    port: u16,

    /// Base URL of the users API.
    #[arg(long, env = "USERS_API_ADDRESS", default_value = "http://127.0.0.1:8083")]
    users_api_address: String,

    /// Timeout for a single users API call, in seconds.
    #[arg(long, env = "USERS_API_TIMEOUT_SECS", default_value_t = 5)]
    users_api_timeout_secs: u64,

    /// JWT signing secret. Falls back to an insecure development default.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Comma-separated `username:password` pairs allowed to reach the users API.
    #[arg(
        long,
        env = "ALLOWED_USERS",
        default_value = "admin:admin,johnd:foo,janed:ddd",
        hide_env_values = true
    )]
    allowed_users: String,
}

impl Args {
    fn into_config(self) -> Result<ApiConfig, ConfigError> {
        let users_api_address = Url::parse(&self.users_api_address).map_err(|e| {
            ConfigError::InvalidUsersApiAddress(self.users_api_address.clone(), e.to_string())
        })?;

        let allow_list = parse_allowed_users(&self.allowed_users)?;

        let signing_secret = SigningSecret::new(resolve_signing_secret(self.jwt_secret.as_deref()))
            .map_err(|e| ConfigError::InvalidSecret(e.to_string()))?;

        Ok(ApiConfig {
            bind_addr: format!("{}:{}", self.host, self.port),
            users_api_address,
            users_api_timeout: Duration::from_secs(self.users_api_timeout_secs),
            signing_secret,
            allow_list,
        })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,authgate_api=debug,authgate_core=debug")
            }),
        )
        .init();

    let config = Args::parse().into_config()?;

    info!(
        bind_addr = %config.bind_addr,
        users_api = %config.users_api_address,
        timeout_secs = config.users_api_timeout.as_secs(),
        "starting authgate_server"
    );

    let state = authgate_api::AppState::new(&config)?;
    let app = authgate_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "auth API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["authgate_server", "--jwt-secret", "test-secret"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn default_allow_list_admits_seed_users() {
        let config = args(&[]).into_config().unwrap();
        assert!(config.allow_list.admits("admin", "admin"));
        assert!(config.allow_list.admits("janed", "ddd"));
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
    }

    #[test]
    fn disable_flag_is_not_accepted() {
        let argv = ["authgate_server", "--jwt-secret", "test-secret", "--disable-allow-list"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn bad_users_api_address_is_rejected() {
        let err = args(&["--users-api-address", "not a url"])
            .into_config()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUsersApiAddress(..)));
    }

    #[test]
    fn port_and_timeout_flow_into_config() {
        let config = args(&["--port", "9100", "--users-api-timeout-secs", "2"])
            .into_config()
            .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9100");
        assert_eq!(config.users_api_timeout, Duration::from_secs(2));
    }
}

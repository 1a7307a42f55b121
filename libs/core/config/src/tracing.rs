use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Default directives when `RUST_LOG` is unset. HTTP/2 framing and the SQL
/// driver are noisy at debug, so they are held back in both modes.
const PRODUCTION_FILTER: &str = "info,sea_orm=warn,sqlx=warn,h2=warn";
const DEVELOPMENT_FILTER: &str = "debug,h2=info,tower=info,hyper=info";

/// Install color-eyre for report output: error location on, env section off.
///
/// A second install is ignored, so tests and `main` can both call it.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// `RUST_LOG` if set and valid, otherwise the default for `environment`
pub fn env_filter(environment: &Environment) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if environment.is_production() {
            PRODUCTION_FILTER
        } else {
            DEVELOPMENT_FILTER
        })
    })
}

/// Set up the global subscriber.
///
/// - Production (`APP_ENV=production`): flattened JSON lines, no targets
/// - Development: pretty multi-line output with targets
///
/// Both carry `tracing_error::ErrorLayer`, so `eyre` reports raised inside
/// `#[instrument]`ed handlers show the span trace:
///
/// ```ignore
/// #[instrument(skip(repo))]
/// async fn load(repo: &PgUserRepository, user_id: Uuid) -> eyre::Result<User> {
///     repo.get(user_id).await.wrap_err("Failed to fetch user")
/// }
/// ```
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_tracing(environment: &Environment) {
    install_color_eyre();

    let filter = env_filter(environment);

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(()) => info!(environment = ?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_per_environment() {
        temp_env::with_var_unset("RUST_LOG", || {
            let prod = env_filter(&Environment::Production).to_string();
            let dev = env_filter(&Environment::Development).to_string();

            assert!(prod.contains("sea_orm=warn"));
            assert!(!prod.contains("debug"));
            assert!(dev.contains("debug"));
            assert!(dev.contains("h2=info"));
        });
    }

    #[test]
    fn test_rust_log_overrides_default() {
        temp_env::with_var("RUST_LOG", Some("zerg_users=trace"), || {
            let filter = env_filter(&Environment::Production).to_string();
            assert!(filter.contains("zerg_users=trace"));
            assert!(!filter.contains("sea_orm"));
        });
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        // Builds both subscriber stacks; only the first install takes effect.
        init_tracing(&Environment::Development);
        init_tracing(&Environment::Production);
        init_tracing(&Environment::Development);
    }
}

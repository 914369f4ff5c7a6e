use keycloak_admin_domain::application::ports::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{CliError, CliResult};

/// Default directives when `RUST_LOG` is unset
pub fn default_directives(config: &LoggingConfig) -> String {
    format!(
        "keycloak_admin_cli={level},keycloak_admin_domain={level}",
        level = config.level
    )
}

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays machine readable.
pub fn init(config: &LoggingConfig) -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Compact => registry.with(fmt.compact()).try_init(),
        LogFormat::Pretty => registry.with(fmt.pretty()).try_init(),
        LogFormat::Json => registry.with(fmt.json()).try_init(),
    };

    result.map_err(|e| CliError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use keycloak_admin_domain::application::ports::LogLevel;

    #[test]
    fn directives_follow_configured_level() {
        let config = LoggingConfig {
            level: LogLevel::Debug,
            format: LogFormat::Json,
        };
        assert_eq!(
            default_directives(&config),
            "keycloak_admin_cli=debug,keycloak_admin_domain=debug"
        );
    }
}

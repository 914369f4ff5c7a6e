use std::sync::Arc;

use clap::Parser;
use keycloak_admin_cli::{cli::Cli, commands, output, telemetry, CliResult};
use keycloak_admin_domain::{
    application::{ports::ConfigurationPort, services::UserManagementService},
    infrastructure::adapters::{EnvConfigurationAdapter, KeycloakAdminClient},
};
use tracing::info;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = EnvConfigurationAdapter::new()?;
    telemetry::init(config.get_logging_config())?;

    let client = KeycloakAdminClient::with_http_config(
        config.get_keycloak_config().clone(),
        config.get_http_config(),
    )?;
    info!(
        base_url = %client.config().base_url,
        realm = %client.config().realm,
        "Keycloak admin client ready"
    );

    let service = UserManagementService::new(Arc::new(client));
    commands::run(cli.command, &service, cli.output).await
}

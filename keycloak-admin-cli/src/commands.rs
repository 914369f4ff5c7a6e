use keycloak_admin_domain::{
    application::services::UserManagementService,
    domain::entities::{NewUser, Pagination, UserUpdate},
};
use tracing::debug;

use crate::cli::{Command, CreateArgs, UpdateArgs, UserCommand};
use crate::output::{print_json, print_page, print_user, success, OutputFormat};
use crate::{CliError, CliResult};

pub async fn run(
    command: Command,
    service: &UserManagementService,
    format: OutputFormat,
) -> CliResult<()> {
    match command {
        Command::Users(cmd) => run_users(cmd, service, format).await,
    }
}

async fn run_users(
    cmd: UserCommand,
    service: &UserManagementService,
    format: OutputFormat,
) -> CliResult<()> {
    debug!(command = ?cmd_name(&cmd), "Running users command");

    match cmd {
        UserCommand::List { first, max } => {
            let page = service.list_users(Pagination::new(first, max)).await?;
            print_page(&page, format)
        }
        UserCommand::Get { id: Some(id), .. } => {
            let user = service.get_user(&id).await?;
            print_user(&user, format)
        }
        UserCommand::Get {
            id: None,
            username: Some(username),
        } => match service.find_user_by_username(&username).await? {
            Some(user) => print_user(&user, format),
            None => Err(CliError::NotFound(format!("user with username '{username}'"))),
        },
        UserCommand::Get { .. } => Err(CliError::InvalidArgument(
            "either a user id or --username is required".to_string(),
        )),
        UserCommand::Create(args) => {
            let user = service.create_user(&new_user(args)).await?;
            print_user(&user, format)
        }
        UserCommand::Update(args) => {
            let (id, update) = user_update(args);
            let user = service.update_user(&id, &update).await?;
            print_user(&user, format)
        }
        UserCommand::Delete { id } => {
            service.delete_user(&id).await?;
            success("User deleted successfully", format)
        }
        UserCommand::ResetPassword {
            id,
            password,
            temporary,
        } => {
            service.reset_password(&id, &password, temporary).await?;
            success("Password reset successfully", format)
        }
        UserCommand::Enable { id } => {
            service.set_user_enabled(&id, true).await?;
            success("User enabled", format)
        }
        UserCommand::Disable { id } => {
            service.set_user_enabled(&id, false).await?;
            success("User disabled", format)
        }
        UserCommand::Count => {
            let count = service.count_users().await?;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({ "count": count })),
                OutputFormat::Table => {
                    println!("{count}");
                    Ok(())
                }
            }
        }
    }
}

fn cmd_name(cmd: &UserCommand) -> &'static str {
    match cmd {
        UserCommand::List { .. } => "list",
        UserCommand::Get { .. } => "get",
        UserCommand::Create(_) => "create",
        UserCommand::Update(_) => "update",
        UserCommand::Delete { .. } => "delete",
        UserCommand::ResetPassword { .. } => "reset-password",
        UserCommand::Enable { .. } => "enable",
        UserCommand::Disable { .. } => "disable",
        UserCommand::Count => "count",
    }
}

pub fn new_user(args: CreateArgs) -> NewUser {
    let mut user = NewUser::new(args.username, args.email)
        .with_names(args.first_name, args.last_name)
        .with_enabled(!args.disabled)
        .with_email_verified(args.email_verified);
    if let Some(password) = args.password {
        user = user.with_password(password, args.temporary);
    }
    user
}

pub fn user_update(args: UpdateArgs) -> (String, UserUpdate) {
    let update = UserUpdate {
        email: args.email,
        first_name: args.first_name,
        last_name: args.last_name,
        enabled: args.enabled,
        email_verified: args.email_verified,
    };
    (args.id, update)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_args_map_to_new_user() {
        let user = new_user(CreateArgs {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            first_name: Some("Alice".to_string()),
            last_name: None,
            password: Some("wonderland".to_string()),
            temporary: true,
            disabled: true,
            email_verified: false,
        });

        assert_eq!(user.username, "alice");
        assert!(!user.enabled);
        assert_eq!(user.password.as_deref(), Some("wonderland"));
        assert!(user.temporary_password);
    }

    #[test]
    fn update_args_without_fields_produce_empty_update() {
        let (id, update) = user_update(UpdateArgs {
            id: "u1".to_string(),
            email: None,
            first_name: None,
            last_name: None,
            enabled: None,
            email_verified: None,
        });

        assert_eq!(id, "u1");
        assert!(update.is_empty());
    }
}

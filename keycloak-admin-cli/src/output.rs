//! Output formatting for command results.

use clap::ValueEnum;
use keycloak_admin_domain::domain::entities::{KeycloakUser, UserPage};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::CliResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Flattened user row for table output
#[derive(Debug, Clone, Tabled)]
pub struct UserRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Username")]
    pub username: String,
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Enabled")]
    pub enabled: bool,
    #[tabled(rename = "Verified")]
    pub email_verified: bool,
}

impl From<&KeycloakUser> for UserRow {
    fn from(user: &KeycloakUser) -> Self {
        let name = [user.first_name.as_deref(), user.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            id: user.id.clone().unwrap_or_default(),
            username: user.username.clone(),
            email: user.email.clone().unwrap_or_default(),
            name,
            enabled: user.enabled,
            email_verified: user.email_verified,
        }
    }
}

pub fn render_users(users: &[KeycloakUser]) -> String {
    let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn print_page(page: &UserPage, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(page),
        OutputFormat::Table => {
            if page.users.is_empty() {
                println!("No users found.");
            } else {
                println!("{}", render_users(&page.users));
            }
            println!(
                "first={} max={} count={}",
                page.first, page.max, page.count
            );
            Ok(())
        }
    }
}

pub fn print_user(user: &KeycloakUser, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(user),
        OutputFormat::Table => {
            println!("{}", render_users(std::slice::from_ref(user)));
            Ok(())
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Confirmation for commands without a result body
pub fn success(message: &str, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "success": true, "message": message })),
        OutputFormat::Table => {
            println!("{message}");
            Ok(())
        }
    }
}

pub fn error(message: &str) {
    eprintln!("error: {message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> KeycloakUser {
        KeycloakUser {
            id: Some("u1".to_string()),
            username: "alice".to_string(),
            email: Some("alice@example.com".to_string()),
            first_name: Some("Alice".to_string()),
            last_name: None,
            enabled: true,
            ..Default::default()
        }
    }

    #[test]
    fn row_joins_present_names() {
        let row = UserRow::from(&user());
        assert_eq!(row.id, "u1");
        assert_eq!(row.name, "Alice");
        assert_eq!(row.email, "alice@example.com");
    }

    #[test]
    fn table_contains_headers_and_values() {
        let table = render_users(&[user()]);
        assert!(table.contains("Username"));
        assert!(table.contains("alice@example.com"));
    }
}

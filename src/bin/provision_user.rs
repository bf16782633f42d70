//! Development utility: create a user and print a bearer token for it.
//!
//! Stands in for the external identity provider while developing against
//! a local database.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin provision_user -- --name <display name> --role <ROLE> [--db <path>] [--ttl-hours <n>]
//! ```
//!
//! The token is printed once and only its hash is stored.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use carecircle_lib::models::enums::Role;
use carecircle_lib::{config, db, identity};

#[derive(Parser, Debug)]
#[command(name = "provision_user")]
#[command(about = "Create a CareCircle user and print its id and a fresh bearer token")]
#[command(version)]
struct Cli {
    /// Display name of the new user
    #[arg(long)]
    name: String,

    /// ADMIN, DOCTOR, MODERATOR, PATIENT or USER (case-insensitive)
    #[arg(long, value_parser = parse_role)]
    role: Role,

    /// Database file (defaults to CARECIRCLE_DB_PATH or the data directory)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Session lifetime in hours; 0 or less never expires
    #[arg(long, allow_negative_numbers = true)]
    ttl_hours: Option<i64>,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    Role::from_str(&raw.to_uppercase()).map_err(|_| format!("unknown role: {raw}"))
}

fn main() {
    carecircle_lib::init_tracing();
    let cli = Cli::parse();

    if let Err(e) = provision(cli) {
        eprintln!("provision_user: {e}");
        std::process::exit(1);
    }
}

fn provision(cli: Cli) -> Result<(), String> {
    let db_path = match cli.db {
        Some(path) => path,
        None => config::database_path().map_err(|e| e.to_string())?,
    };
    let ttl = match cli.ttl_hours {
        Some(hours) => (hours > 0).then(|| chrono::Duration::hours(hours)),
        None => config::session_ttl().map_err(|e| e.to_string())?,
    };

    let conn = db::open_database(&db_path).map_err(|e| e.to_string())?;
    let user = identity::create_user(&conn, &cli.name, cli.role).map_err(|e| e.to_string())?;
    let token = identity::issue_session(&conn, &user.id, ttl).map_err(|e| e.to_string())?;

    println!("user_id={}", user.id);
    println!("role={}", user.role);
    println!("token={token}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn role_is_case_insensitive() {
        let cli = Cli::try_parse_from(["provision_user", "--name", "Dr. Lee", "--role", "doctor"])
            .unwrap();
        assert_eq!(cli.role, Role::Doctor);
        assert_eq!(cli.ttl_hours, None);
    }

    #[test]
    fn rejects_unknown_role_and_missing_name() {
        assert!(Cli::try_parse_from(["provision_user", "--name", "x", "--role", "root"]).is_err());
        assert!(Cli::try_parse_from(["provision_user", "--role", "ADMIN"]).is_err());
    }

    #[test]
    fn negative_ttl_is_accepted() {
        let cli = Cli::try_parse_from([
            "provision_user", "--name", "x", "--role", "USER", "--ttl-hours", "-1",
        ])
        .unwrap();
        assert_eq!(cli.ttl_hours, Some(-1));
    }
}

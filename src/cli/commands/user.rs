use std::time::Duration;

use anyhow::Context;
use clap::Args;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::auth::password::hash_password;
use crate::auth::Role;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::models::NewUser;
use crate::database::postgres::PgStore;
use crate::database::UserRepository;

const GENERATED_PASSWORD_LEN: usize = 16;

#[derive(Debug, Args)]
pub struct CreateUserArgs {
    #[arg(long, help = "Login name")]
    pub username: String,

    #[arg(long, help = "Email address")]
    pub email: String,

    #[arg(long, help = "Password (a random one is generated and printed once if omitted)")]
    pub password: Option<String>,

    #[arg(long, default_value = "user", help = "Role: admin or user")]
    pub role: String,
}

pub async fn create_user(args: CreateUserArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let role = Role::parse(&args.role)
        .with_context(|| format!("unknown role '{}', expected admin or user", args.role))?;

    if args.username.trim().is_empty() || args.email.trim().is_empty() {
        anyhow::bail!("username and email must not be empty");
    }

    let (password, generated) = match args.password {
        Some(password) if !password.is_empty() => (password, false),
        _ => (generate_password(), true),
    };

    let config = AppConfig::from_env();
    if config.database.url.is_empty() {
        anyhow::bail!("DATABASE_URL is not set");
    }

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(config.database.connection_timeout))
        .connect(&config.database.url)
        .await
        .context("failed to connect to postgres")?;

    let store = PgStore::new(pool.clone());
    let password_hash = hash_password(&password).await?;

    let user = store
        .create(NewUser {
            username: args.username,
            email: args.email,
            password_hash,
            role,
        })
        .await?;
    pool.close().await;

    info!("Created user {} (id {}, role {})", user.username, user.id, user.role);

    let mut details = json!({ "user": user });
    if generated {
        details["password"] = json!(password);
    }

    match output_format {
        OutputFormat::Json => output_success(&output_format, "User created", Some(details)),
        OutputFormat::Text => {
            output_success(&output_format, &format!("User '{}' created with id {}", user.username, user.id), None)?;
            if generated {
                println!("Generated password (shown once): {}", password);
            }
            Ok(())
        }
    }
}

fn generate_password() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..GENERATED_PASSWORD_LEN].to_string()
}

//! create-admin: insert an administrator into the `users` table.
//!
//! ```text
//! create-admin <name> <phone> <password>
//! ```
//!
//! The password is hashed locally (bcrypt by default) and only the hash is
//! sent to the database.

use std::process::ExitCode;
use std::time::Instant;

use atelier_cli::{fail, init_tracing, pool_config, with_deadline, LogConfig};
use atelier_core::{logging, Config, Error, NewAdminUser, Result, UserRepository};
use atelier_crypto::{HashAlgorithm, PasswordHasher};
use atelier_db::Database;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "create-admin")]
#[command(author, version, about = "Create an administrator user")]
struct Cli {
    /// Display name
    name: String,

    /// Phone number (unique across users)
    phone: String,

    /// Plaintext password; only its hash is stored
    password: String,

    /// Hash algorithm: bcrypt or argon2id
    #[arg(long, default_value_t = HashAlgorithm::Bcrypt)]
    algorithm: HashAlgorithm,

    /// bcrypt cost (4-31, default 10)
    #[arg(long)]
    cost: Option<u32>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let _log_guard = match init_tracing(&LogConfig::from_env()) {
        Ok(guard) => guard,
        Err(e) => return fail(&e),
    };

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => return fail(&e),
    };

    let password_hash = match hash(&cli) {
        Ok(hash) => hash,
        Err(e) => return fail(&e),
    };
    let user = NewAdminUser::new(cli.name, cli.phone, password_hash);

    match with_deadline(config.admin_timeout, insert(&config, &user)).await {
        Ok(()) => {
            println!("Admin user created successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn hash(cli: &Cli) -> Result<String> {
    let mut hasher = PasswordHasher::new(cli.algorithm);
    if let Some(cost) = cli.cost {
        if cli.algorithm != HashAlgorithm::Bcrypt {
            return Err(Error::InvalidInput(format!(
                "--cost applies to bcrypt only, not {}",
                cli.algorithm
            )));
        }
        hasher = hasher
            .with_bcrypt_cost(cost)
            .map_err(|e| Error::Hashing(e.to_string()))?;
    }
    hasher
        .hash(&cli.password)
        .map_err(|e| Error::Hashing(e.to_string()))
}

async fn insert(config: &Config, user: &NewAdminUser) -> Result<()> {
    let start = Instant::now();
    let db =
        Database::connect_with_config(&config.database_url, pool_config(config, config.admin_timeout))
            .await?;
    let result = db.users.insert_admin(user).await;
    db.close().await;
    result?;

    info!(
        { logging::SUBSYSTEM } = "cli",
        { logging::OPERATION } = "create_admin",
        { logging::DURATION_MS } = start.elapsed().as_millis() as u64,
        { logging::USER_NAME } = user.name.as_str(),
        "Admin user created"
    );
    Ok(())
}

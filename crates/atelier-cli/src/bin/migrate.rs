//! migrate: apply pending `*.sql` migrations in lexical order.
//!
//! Reads `DATABASE_URL` (and optionally `MIGRATIONS_DIR`) from the
//! environment or a `.env` file. Each file runs once; applied versions are
//! tracked in `schema_migrations`.

use std::path::PathBuf;
use std::process::ExitCode;

use atelier_cli::{fail, init_tracing, pool_config, with_deadline, LogConfig};
use atelier_core::{Config, Error, MigrationLoader, MigrationRunner, MigrationStatus, Result};
use atelier_db::Database;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "migrate")]
#[command(author, version, about = "Apply pending SQL migrations")]
struct Cli {
    /// Migrations directory (overrides MIGRATIONS_DIR)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Show applied/pending state without applying anything
    #[arg(long)]
    status: bool,

    /// Print --status output as JSON
    #[arg(long, requires = "status")]
    json: bool,
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
        Ok(config) => match &cli.dir {
            Some(dir) => config.with_migrations_dir(dir),
            None => config,
        },
        Err(e) => return fail(&e),
    };

    match with_deadline(config.migrate_timeout, run(&cli, &config)).await {
        Ok(Some(line)) => {
            println!("{}", line);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

/// Returns the closing line to print on success, if any.
async fn run(cli: &Cli, config: &Config) -> Result<Option<String>> {
    let db = Database::connect_with_config(
        &config.database_url,
        pool_config(config, config.migrate_timeout),
    )
    .await?;

    let result = execute(cli, config, &db).await;
    db.close().await;
    result
}

async fn execute(cli: &Cli, config: &Config, db: &Database) -> Result<Option<String>> {
    db.ping().await?;

    let runner = MigrationRunner::new(
        MigrationLoader::new(&config.migrations_dir),
        db.migrations.clone(),
        db.executor(),
    );

    if cli.status {
        let statuses = runner.status().await?;
        print!("{}", render_status(&statuses, cli.json)?);
        return Ok(None);
    }

    runner.run().await?;
    Ok(Some("Migrations complete.".to_string()))
}

fn render_status(statuses: &[MigrationStatus], json: bool) -> Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(statuses)
            .map_err(|e| Error::Io(std::io::Error::from(e)))?;
        out.push('\n');
        return Ok(out);
    }

    let width = statuses
        .iter()
        .map(|s| s.version.as_str().len())
        .max()
        .unwrap_or(0);
    Ok(statuses
        .iter()
        .map(|s| format!("{:<width$}  {}\n", s.version, s.state, width = width))
        .collect())
}

use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Password policy: also require one of `@$!%*#?&`.
    pub require_password_symbol: bool,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Multi-user document management API")]
pub struct Args {
    /// Host to bind to (overrides DOCSHELF_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides DOCSHELF_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides DOCSHELF_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Require a symbol in passwords (overrides DOCSHELF_REQUIRE_PASSWORD_SYMBOL)
    #[arg(long)]
    pub require_password_symbol: bool,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("DOCSHELF_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("DOCSHELF_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing DOCSHELF_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading DOCSHELF_PORT"),
        };
        let env_db = env::var("DOCSHELF_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/docshelf.db".into());
        let env_symbol = env::var("DOCSHELF_REQUIRE_PASSWORD_SYMBOL")
            .map(|value| matches!(value.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            require_password_symbol: args.require_password_symbol || env_symbol,
        };

        Ok((cfg, args.migrate))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

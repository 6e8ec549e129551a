use anyhow::{Context, Result, bail};

use super::config_model::{BackendServer, Database, DotEnvyConfig};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    from_lookup(|key| std::env::var(key).ok())
}

/// Builds the config from any key lookup, so tests don't touch the process env.
pub fn from_lookup<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let backend_server = BackendServer {
        port: parse_or(&var, "SERVER_PORT", 8080)?,
        body_limit: parse_or(&var, "SERVER_BODY_LIMIT", 1)?,
        timeout: parse_or(&var, "SERVER_TIMEOUT", 30)?,
    };

    let url = match var("DATABASE_URL") {
        Some(url) => url,
        None => database_url_from_parts(&var)?,
    };

    let database = Database {
        url,
        pool_max_size: parse_or(&var, "DATABASE_POOL_MAX_SIZE", 10)?,
        disable_prepared_statements: parse_or(
            &var,
            "DATABASE_DISABLE_PREPARED_STATEMENTS",
            false,
        )?,
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
    })
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} is invalid")),
        None => Ok(default),
    }
}

fn database_url_from_parts<F>(var: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| var(key).with_context(|| format!("{key} is invalid"));

    let (Some(_), Some(_)) = (var("DB_HOST"), var("DB_NAME")) else {
        bail!("DATABASE_URL is invalid: set it or DB_HOST/DB_NAME/DB_USER/DB_PASSWORD");
    };

    let user = required("DB_USER")?;
    let password = required("DB_PASSWORD")?;
    let host = required("DB_HOST")?;
    let name = required("DB_NAME")?;
    let port: u16 = parse_or(var, "DB_PORT", 5432)?;
    let ssl_mode = var("DB_SSL_MODE").unwrap_or_else(|| "disable".to_string());

    Ok(format!(
        "postgres://{user}:{password}@{host}:{port}/{name}?sslmode={ssl_mode}"
    ))
}

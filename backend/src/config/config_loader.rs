use std::str::FromStr;

use anyhow::{Context, Result};

use super::{
    config_model::{
        AdminCredentials, AdminSecret, BackendServer, Database, DotEnvyConfig, QrPolicy,
        UserSecret,
    },
    stage::Stage,
};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: required("SERVER_PORT_BACKEND")?,
        body_limit: required("SERVER_BODY_LIMIT")?,
        timeout: required("SERVER_TIMEOUT")?,
        cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
            .map(|raw| split_list(&raw))
            .unwrap_or_default(),
    };

    let database = Database {
        url: required_string("DATABASE_URL")?,
        max_connections: optional("DATABASE_MAX_CONNECTIONS", 10)?,
    };

    let admin = AdminCredentials {
        username: required_string("ADMIN_USERNAME")?,
        password_hash: required_string("ADMIN_PASSWORD_HASH")?,
    };

    let defaults = QrPolicy::default();
    let qr_policy = QrPolicy {
        earn_ttl_minutes: optional("QR_EARN_TTL_MINUTES", defaults.earn_ttl_minutes)?,
        spend_ttl_minutes: optional("QR_SPEND_TTL_MINUTES", defaults.spend_ttl_minutes)?,
        default_ttl_days: optional("QR_DEFAULT_TTL_DAYS", defaults.default_ttl_days)?,
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        admin,
        qr_policy,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or_default();
    Stage::try_from(&stage_str).unwrap_or_default()
}

pub fn get_user_secret() -> Result<UserSecret> {
    dotenvy::dotenv().ok();

    Ok(UserSecret {
        secret: required_string("JWT_USER_SECRET")?,
        ttl_hours: optional("JWT_USER_TTL_HOURS", 720)?,
    })
}

pub fn get_admin_secret() -> Result<AdminSecret> {
    dotenvy::dotenv().ok();

    Ok(AdminSecret {
        secret: required_string("JWT_ADMIN_SECRET")?,
        ttl_hours: optional("JWT_ADMIN_TTL_HOURS", 12)?,
    })
}

fn required_string(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("{key} is invalid"))
}

fn required<T>(key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    required_string(key)?
        .trim()
        .parse::<T>()
        .with_context(|| format!("{key} is invalid"))
}

fn optional<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} is invalid")),
        _ => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_lists_are_trimmed() {
        assert_eq!(
            split_list(" https://a.example.com, ,https://b.example.com "),
            vec!["https://a.example.com", "https://b.example.com"]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn stage_names_are_parsed() {
        assert_eq!(Stage::try_from(&"prod".to_string()).unwrap(), Stage::Production);
        assert!(Stage::try_from(&"staging".to_string()).is_err());
    }
}

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub admin: AdminCredentials,
    pub qr_policy: QrPolicy,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrPolicy {
    pub earn_ttl_minutes: i64,
    pub spend_ttl_minutes: i64,
    pub default_ttl_days: i64,
}

impl Default for QrPolicy {
    fn default() -> Self {
        Self {
            earn_ttl_minutes: 15,
            spend_ttl_minutes: 10,
            default_ttl_days: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserSecret {
    pub secret: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct AdminSecret {
    pub secret: String,
    pub ttl_hours: i64,
}

use crate::auth::jwt::JwtConfig;

/// Default public site URL used for QR codes and the sitemap.
pub const DEFAULT_PUBLIC_BASE_URL: &str = "https://portaldalembranca.com.br";

/// Default Stripe REST endpoint.
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Public site URL, without trailing slash.
    pub public_base_url: String,
    /// Lifetime of the public memorial list cache (default: `60`).
    pub memorial_cache_ttl_secs: u64,
    /// Family invitation lifetime in days (default: `7`).
    pub invitation_expiry_days: i64,
    /// Stripe credentials; `None` selects the mock payment provider.
    pub stripe: Option<StripeConfig>,
    /// Interval of the session cleanup job (default: `3600`).
    pub session_cleanup_interval_secs: u64,
    /// Admin account created at startup when no admin exists yet.
    pub bootstrap_admin: Option<BootstrapAdmin>,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

/// Stripe API access.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub api_base: String,
}

/// Credentials of the first admin account.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                            |
    /// |---------------------------------|------------------------------------|
    /// | `HOST`                          | `0.0.0.0`                          |
    /// | `PORT`                          | `3000`                             |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173`            |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                               |
    /// | `PUBLIC_BASE_URL`               | `https://portaldalembranca.com.br` |
    /// | `MEMORIAL_CACHE_TTL_SECS`       | `60`                               |
    /// | `INVITATION_EXPIRY_DAYS`        | `7`                                |
    /// | `STRIPE_SECRET_KEY`             | unset (mock provider)              |
    /// | `STRIPE_API_BASE`               | `https://api.stripe.com`           |
    /// | `SESSION_CLEANUP_INTERVAL_SECS` | `3600`                             |
    /// | `BOOTSTRAP_ADMIN_EMAIL`         | unset                              |
    /// | `BOOTSTRAP_ADMIN_PASSWORD`      | unset                              |
    /// | `BOOTSTRAP_ADMIN_NAME`          | `Administrador`                    |
    ///
    /// See [`JwtConfig::from_env`] for the `JWT_*` variables.
    ///
    /// # Panics
    ///
    /// Panics on malformed numeric values, and on a zero cleanup interval,
    /// so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = var("HOST", "0.0.0.0");

        let port: u16 = var("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(&var("CORS_ORIGINS", "http://localhost:5173"));

        let request_timeout_secs: u64 = var("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let public_base_url = var("PUBLIC_BASE_URL", DEFAULT_PUBLIC_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let memorial_cache_ttl_secs: u64 = var("MEMORIAL_CACHE_TTL_SECS", "60")
            .parse()
            .expect("MEMORIAL_CACHE_TTL_SECS must be a valid u64");

        let invitation_expiry_days: i64 = var("INVITATION_EXPIRY_DAYS", "7")
            .parse()
            .expect("INVITATION_EXPIRY_DAYS must be a valid i64");

        let stripe = non_empty("STRIPE_SECRET_KEY").map(|secret_key| StripeConfig {
            secret_key,
            api_base: var("STRIPE_API_BASE", DEFAULT_STRIPE_API_BASE)
                .trim_end_matches('/')
                .to_string(),
        });

        let session_cleanup_interval_secs: u64 = var("SESSION_CLEANUP_INTERVAL_SECS", "3600")
            .parse()
            .ok()
            .filter(|&secs| secs > 0)
            .expect("SESSION_CLEANUP_INTERVAL_SECS must be a positive integer");

        let bootstrap_admin = match (
            non_empty("BOOTSTRAP_ADMIN_EMAIL"),
            non_empty("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdmin {
                email,
                password,
                name: var("BOOTSTRAP_ADMIN_NAME", "Administrador"),
            }),
            _ => None,
        };

        let jwt = JwtConfig::from_lookup(&lookup);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            public_base_url,
            memorial_cache_ttl_secs,
            invitation_expiry_days,
            stripe,
            session_cleanup_interval_secs,
            bootstrap_admin,
            jwt,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Configuration management
///
/// Loads configuration from environment variables into a type-safe struct.
/// The core treats all of these as opaque, externally supplied values.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret for project-access token signing (required, >= 32 bytes)
/// - `PROJECT_TOKEN_TTL_MINUTES`: Project-access token lifetime (default: 60)
/// - `BASE_URL`: Base URL used when constructing invite links (required)
/// - `MAIL_HOST`, `MAIL_PORT`, `MAIL_USERNAME`, `MAIL_PASSWORD`: SMTP relay
/// - `MAIL_FROM_ADDRESS`, `MAIL_FROM_NAME`: Sender identity
/// - `MAIL_TLS`: Use a TLS relay connection (default: true)
///
/// # Example
///
/// ```no_run
/// use taskboard::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("invite links built under {}", config.base_url);
/// # Ok(())
/// # }
/// ```
use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseSettings,

    /// Project-access token configuration
    pub token: TokenSettings,

    /// Outbound mail configuration
    pub mail: MailSettings,

    /// Base URL for constructing invite links (e.g. "https://app.example.com")
    pub base_url: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Project-access token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Secret key for HS256 signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Token lifetime in minutes
    pub ttl_minutes: i64,
}

/// Outbound mail (SMTP) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailSettings {
    /// SMTP relay host (None disables sending)
    pub host: Option<String>,

    /// SMTP port
    pub port: u16,

    /// SMTP username (optional, relay may be unauthenticated)
    pub username: Option<String>,

    /// SMTP password
    pub password: Option<String>,

    /// From address for invitation mail
    pub from_address: Option<String>,

    /// Display name for the From header
    pub from_name: String,

    /// Whether to use a TLS relay connection
    pub tls: bool,
}

impl MailSettings {
    /// True when enough is configured to actually send mail
    pub fn is_configured(&self) -> bool {
        self.host.is_some() && self.from_address.is_some()
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// Reads a `.env` file first when present (development convenience).
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing, fail to parse, or
    /// the signing secret is shorter than 32 bytes.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let ttl_minutes = env::var("PROJECT_TOKEN_TTL_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<i64>()?;

        let base_url = env::var("BASE_URL")
            .map_err(|_| anyhow::anyhow!("BASE_URL environment variable is required"))?;

        let mail = MailSettings {
            host: env::var("MAIL_HOST").ok(),
            port: env::var("MAIL_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse::<u16>()?,
            username: env::var("MAIL_USERNAME").ok(),
            password: env::var("MAIL_PASSWORD").ok(),
            from_address: env::var("MAIL_FROM_ADDRESS").ok(),
            from_name: env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "Taskboard".to_string()),
            tls: env::var("MAIL_TLS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        };

        Ok(Self {
            database: DatabaseSettings {
                url: database_url,
                max_connections,
            },
            token: TokenSettings {
                secret,
                ttl_minutes,
            },
            mail,
            base_url,
        })
    }
}

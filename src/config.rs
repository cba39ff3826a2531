use anyhow::{bail, Context};

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_LOGIN_EXPIRE_SECS: i64 = 3600;
const DEFAULT_CURRENCY: &str = "usd";
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

/// Process-wide settings, loaded once at startup and shared as `web::Data<Config>`.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind: String,
    pub login_expire_secs: i64,
    pub admin_email: String,
    pub admin_password: String,
    pub stripe_key: Option<String>,
    pub currency: String,
    pub frontend_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> anyhow::Result<String> {
            match lookup(key) {
                Some(value) if !value.is_empty() => Ok(value),
                _ => bail!("{} not found", key),
            }
        };

        let login_expire_secs = match lookup("LOGIN_EXPIRE_SECS") {
            Some(secs) => secs
                .parse::<i64>()
                .with_context(|| format!("LOGIN_EXPIRE_SECS is not a number: {}", secs))?,
            None => DEFAULT_LOGIN_EXPIRE_SECS,
        };

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            bind: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            login_expire_secs,
            admin_email: required("ADMIN_EMAIL")?,
            admin_password: required("ADMIN_PASSWORD")?,
            stripe_key: lookup("STRIPE_KEY").filter(|key| !key.is_empty()),
            currency: lookup("CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            frontend_url: lookup("FRONTEND_URL")
                .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string()),
        })
    }
}

use std::env;

use chrono_tz::Tz;
use dotenvy::dotenv;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    /// IANA zone the business day follows. POS timestamps arrive in UTC
    /// and are converted against this zone, DST included.
    pub business_tz: Tz,

    // Rate limiting
    pub rate_preview_per_min: u32,
    pub rate_confirm_per_min: u32,
    pub rate_read_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),

            business_tz: env::var("BUSINESS_TIMEZONE")
                .unwrap_or_else(|_| "America/Santiago".to_string())
                .parse()
                .expect("BUSINESS_TIMEZONE must be a valid IANA zone"),

            rate_preview_per_min: env::var("RATE_PREVIEW_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_confirm_per_min: env::var("RATE_CONFIRM_PER_MIN")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap(),
            rate_read_per_min: env::var("RATE_READ_PER_MIN")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }
}

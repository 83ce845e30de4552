use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub migrations_path: PathBuf,
    pub static_path: PathBuf,
    /// Secret used to sign bearer tokens. Must be set; there is no default.
    pub token_secret: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let token_secret = match env::var("TALLY_TOKEN_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            Ok(_) => {
                panic!("TALLY_TOKEN_SECRET is empty. Set a non-empty secret to sign login tokens.");
            }
            Err(_) => {
                panic!(
                    "TALLY_TOKEN_SECRET environment variable is not set. Login tokens \
                     cannot be signed without it."
                );
            }
        };

        Self {
            host: env::var("TALLY_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("TALLY_PORT")
                .or_else(|_| env::var("PORT"))
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: env::var("TALLY_DATABASE_URL")
                .map(|v| {
                    PathBuf::from(
                        v.strip_prefix("sqlite://")
                            .or_else(|| v.strip_prefix("sqlite:"))
                            .unwrap_or(&v),
                    )
                })
                .unwrap_or_else(|_| PathBuf::from("data/tally.db")),
            migrations_path: env::var("TALLY_MIGRATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("migrations")),
            static_path: env::var("TALLY_STATIC_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("static")),
            token_secret,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

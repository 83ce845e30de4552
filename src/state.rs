use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::config::Config;
use crate::db::DbPool;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub token_keys: TokenKeys,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        let token_keys = TokenKeys::from_secret(&config.token_secret);
        Self {
            db,
            config: Arc::new(config),
            token_keys,
        }
    }
}

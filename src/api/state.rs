//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::Config;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub tokens: Arc<TokenService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            store,
            tokens: Arc::new(TokenService::new(&config)),
            config: Arc::new(config),
        }
    }
}

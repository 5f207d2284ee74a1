//! Process-wide handle to the configured marketplace contract
//!
//! The contract client is built once at startup from the CLI flags and
//! installed here; the server functions fetch it on every request. A missing
//! handle is an error the caller reports, never a panic.

#![cfg(feature = "server")]

use std::sync::Arc;

use lazy_static::lazy_static;

use crate::contract::Marketplace;

#[derive(Default)]
pub struct AppState {
    market: Option<Arc<Marketplace>>,
}

lazy_static! {
    static ref APP_STATE: tokio::sync::RwLock<AppState> =
        tokio::sync::RwLock::new(AppState::default());
}

/// Installs the contract handle. Runs before the app starts serving, while
/// the lock is still free.
pub fn install_market(market: Marketplace) {
    match APP_STATE.try_write() {
        Ok(mut state) => state.market = Some(Arc::new(market)),
        Err(_) => log::error!("app state locked during startup, contract handle not installed"),
    }
}

/// The installed contract handle, if any.
pub async fn market() -> Option<Arc<Marketplace>> {
    APP_STATE.read().await.market.clone()
}

//! Shared application state.

use mongodb::{Client, Database};

/// Cloned into handlers that need infrastructure directly (cheap: the client
/// shares one connection pool).
#[derive(Clone)]
pub struct AppState {
    pub mongo_client: Client,
    pub db: Database,
}

//! Factory functions for creating server instances.

use crate::{config::ServerConfig, server::BoardServer};
use board_store::{BoardStore, MemoryStore};
use std::sync::Arc;

/// Creates a board server with default configuration over an empty
/// in-memory store.
///
/// # Example
///
/// ```rust
/// use board_server::create_server;
///
/// let server = create_server();
/// assert_eq!(server.config().bind_address.port(), 3000);
/// ```
pub fn create_server() -> BoardServer {
    BoardServer::new(ServerConfig::default(), Arc::new(MemoryStore::new()))
}

/// Creates a board server with custom configuration over `store`.
///
/// # Example
///
/// ```rust
/// use board_server::{create_server_with_config, ServerConfig};
/// use board_store::MemoryStore;
/// use std::sync::Arc;
///
/// let config = ServerConfig {
///     bind_address: "0.0.0.0:9000".parse().unwrap(),
///     ..Default::default()
/// };
///
/// let server = create_server_with_config(config, Arc::new(MemoryStore::new()));
/// ```
pub fn create_server_with_config(config: ServerConfig, store: Arc<dyn BoardStore>) -> BoardServer {
    BoardServer::new(config, store)
}

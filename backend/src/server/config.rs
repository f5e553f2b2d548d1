//! HTTP server configuration object.

use std::net::SocketAddr;

use crate::outbound::persistence::DbPool;

/// Configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: Vec<u8>,
    pub(crate) db_pool: DbPool,
}

impl ServerConfig {
    /// Bundle the listener address, token signing secret, and database pool.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, jwt_secret: impl Into<Vec<u8>>, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            jwt_secret: jwt_secret.into(),
            db_pool,
        }
    }

    /// The socket address the server will bind to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

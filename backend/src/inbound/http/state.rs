//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data`, so they depend only on
//! the domain service and ports and stay testable without I/O. The state is
//! built once at startup from explicitly constructed adapters; there is no
//! ambient or global database handle.

use std::sync::Arc;

use crate::domain::ports::{ListRepository, MealRepository};
use crate::domain::{AuthService, TokenCodec};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: AuthService,
    pub lists: Arc<dyn ListRepository>,
    pub meals: Arc<dyn MealRepository>,
}

impl HttpState {
    /// Bundle the authentication service and resource stores.
    pub fn new(
        auth: AuthService,
        lists: Arc<dyn ListRepository>,
        meals: Arc<dyn MealRepository>,
    ) -> Self {
        Self { auth, lists, meals }
    }

    /// Token codec used by the [`super::auth::Identity`] extractor.
    pub const fn tokens(&self) -> &TokenCodec {
        self.auth.tokens()
    }
}

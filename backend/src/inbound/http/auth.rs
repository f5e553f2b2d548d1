//! Bearer-token authentication for protected routes.
//!
//! `Identity` is an extractor: protected handlers take it as a parameter,
//! which both enforces the token check before the handler body runs and
//! hands the handler an explicit caller identity rather than ambient request
//! state. Public routes (register, login, health, docs) simply do not take
//! it.

use std::future::{Ready, ready};

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};

use crate::domain::{Error, UserId};

use super::state::HttpState;

/// Authenticated caller identity, extracted from `Authorization: Bearer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity(UserId);

impl Identity {
    /// The verified user identifier.
    pub const fn user_id(&self) -> &UserId {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::unauthorized("malformed authorization header"))
}

fn verify_request(req: &HttpRequest) -> Result<Identity, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state not configured"))?;
    let token = bearer_token(req)?;
    state.tokens().verify(token).map(Identity)
}

impl FromRequest for Identity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(verify_request(req))
    }
}

//! Signed session tokens.
//!
//! Tokens are self-contained HS256 JWTs carrying the user identifier and an
//! expiry one hour after issuance. Nothing is persisted; the signing secret is
//! process-wide configuration fixed for the process lifetime.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{Error, UserId};

/// Token lifetime from issuance.
pub const TOKEN_TTL: Duration = Duration::hours(1);

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies session tokens with a fixed process-wide secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec from the raw signing secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; the default 60s leeway would accept stale tokens.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Mint a token for `user_id` expiring [`TOKEN_TTL`] from now.
    pub fn issue(&self, user_id: &UserId) -> Result<String, Error> {
        self.issue_with_ttl(user_id, TOKEN_TTL)
    }

    fn issue_with_ttl(&self, user_id: &UserId, ttl: Duration) -> Result<String, Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| Error::internal(format!("failed to sign token: {err}")))
    }

    /// Verify signature and expiry, yielding the embedded user identifier.
    ///
    /// All verification failures collapse into a single `Unauthorized` error
    /// so callers cannot distinguish a forged token from an expired one.
    pub fn verify(&self, token: &str) -> Result<UserId, Error> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| Error::unauthorized("invalid or expired token"))?;
        UserId::parse(&data.claims.sub)
    }
}

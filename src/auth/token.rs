use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

/// Represents the claims encoded within a bearer token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// The id of the user the token was issued to.
    pub sub: Uuid,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiration, seconds since the epoch. The token is valid while `now < exp`.
    pub exp: i64,
}

impl Claims {
    pub fn new(subject: Uuid, issued_at: i64, ttl: Duration) -> Self {
        Self {
            sub: subject,
            iat: issued_at,
            exp: issued_at + ttl.num_seconds(),
        }
    }
}

/// Issues and verifies HS256-signed bearer tokens.
///
/// Tokens are stateless: there is no revocation list, expiry is the only way a token
/// stops working.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, Duration::minutes(config.token_ttl_minutes))
    }

    /// Signs a token for `subject` that expires `ttl` from now.
    pub fn issue(&self, subject: Uuid) -> Result<String, AppError> {
        let claims = Claims::new(subject, Utc::now().timestamp(), self.ttl);
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Returns the token's subject if the signature matches and the token has not expired.
    pub fn verify(&self, token: &str) -> Option<Uuid> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| log::debug!("token rejected: {}", e))
            .ok()?;

        if Utc::now().timestamp() < data.claims.exp {
            Some(data.claims.sub)
        } else {
            None
        }
    }
}

// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Signed bearer credentials.
//!
//! Tokens are self-contained HS256 JWTs carrying the account id, email and
//! expiry. The embedded expiry is checked at decode time with zero leeway;
//! the session row's own expiry is enforced separately by the gate, so a
//! still-valid token dies the moment its session is deactivated.
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Claims embedded in every issued token.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    /// Account id.
    pub sub: String,
    pub email: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

/// Signs and verifies bearer tokens with a server-held secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: Algorithm::HS256,
        }
    }

    /// Sign a token for an account, expiring at `issued_at + ttl`.
    ///
    /// The caller supplies `issued_at` so the embedded expiry and the stored
    /// session row can be derived from the same instant.
    pub fn issue(
        &self,
        account_id: &str,
        email: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: account_id.to_string(),
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        };

        let header = Header::new(self.algorithm);
        encode(&header, &claims, &self.encoding_key).map_err(AppError::internal)
    }

    /// Verify signature and structure, then the embedded expiry.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            }
        })?;
        Ok(data.claims)
    }
}

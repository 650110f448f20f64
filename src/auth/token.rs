use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of the `iss` claim on every issued token.
pub const TOKEN_ISSUER: &str = "todo-app";

/// Token lifetime in seconds.
pub const TOKEN_LIFETIME_SECS: i64 = 60 * 60;

/// Represents the claims encoded within a JWT.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's id. Optional on the wire so that a token without one
    /// is reported as such rather than as a generic decoding failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<i64>,
    #[serde(default)]
    pub iss: String,
    /// Issued-at, seconds since the epoch.
    #[serde(default)]
    pub iat: i64,
    /// Expiration, seconds since the epoch.
    pub exp: i64,
}

/// Why a token could not be issued or was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Not a decodable JWT.
    Malformed,
    /// The header names an algorithm other than HS256.
    WrongAlgorithm,
    /// The signature does not match the server secret.
    BadSignature,
    Expired,
    MissingSubject,
    /// Issuing failed; never produced by verification.
    Signing(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "malformed token"),
            TokenError::WrongAlgorithm => write!(f, "unexpected signing algorithm"),
            TokenError::BadSignature => write!(f, "signature mismatch"),
            TokenError::Expired => write!(f, "token expired"),
            TokenError::MissingSubject => write!(f, "subject claim missing"),
            TokenError::Signing(msg) => write!(f, "failed to sign token: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> TokenError {
        match error.kind() {
            ErrorKind::InvalidAlgorithm => TokenError::WrongAlgorithm,
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

/// Issues and verifies HS256 identity tokens.
///
/// Built once at startup from the configured secret and shared read-only afterwards.
/// Verification accepts HS256 only, whatever the token header claims, and applies no
/// clock leeway: a token stops working the second its `exp` passes.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issues a token for `user_id`, valid for one hour from now.
    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issues a token as if it had been created at `issued_at`.
    pub fn issue_at(&self, user_id: i64, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let expires_at = issued_at + Duration::seconds(TOKEN_LIFETIME_SECS);
        let claims = Claims {
            sub: Some(user_id),
            iss: TOKEN_ISSUER.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Checks algorithm, signature and expiry, returning the decoded claims.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    /// Verifies `token` and returns the user id it was issued for.
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        self.decode(token)?.sub.ok_or(TokenError::MissingSubject)
    }
}

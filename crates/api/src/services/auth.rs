//! Authentication primitives: Argon2id password hashing and HS256 bearer
//! tokens.
//!
//! Login exchanges email + password for a 24-hour JWT; every admin route then
//! verifies the bearer token against the shared signing secret.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use kifaru_core::AdminRole;

use crate::models::admin_user::AdminUser;

/// Token lifetime: 24 hours.
const TOKEN_TTL_HOURS: i64 = 24;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors from the authentication service.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Email unknown or password wrong. Deliberately a single variant so
    /// callers cannot leak which half failed.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// New password fails policy.
    #[error("{0}")]
    WeakPassword(String),

    /// Hashing failed (malformed stored hash or RNG failure).
    #[error("password hashing failed")]
    PasswordHash,

    /// Bearer token is malformed, expired, or signed with the wrong key.
    #[error("invalid token")]
    InvalidToken,

    /// Token could not be signed.
    #[error("token signing failed: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),
}

/// JWT claims for an authenticated admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin email address.
    pub sub: String,
    /// Admin role.
    pub role: AdminRole,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

/// Sign a bearer token for a freshly authenticated admin.
///
/// # Errors
///
/// Returns [`AuthError::TokenSigning`] if encoding fails.
pub fn issue_token(secret: &SecretString, user: &AdminUser) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = AdminClaims {
        sub: user.email.to_string(),
        role: user.role,
        iat: now.timestamp(),
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };

    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )?;
    Ok(token)
}

/// Verify a bearer token and return its claims.
///
/// # Errors
///
/// Returns [`AuthError::InvalidToken`] for malformed, expired, or
/// wrongly-signed tokens.
pub fn verify_token(secret: &SecretString, token: &str) -> Result<AdminClaims, AuthError> {
    let data = jsonwebtoken::decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AuthError::InvalidToken)?;

    Ok(data.claims)
}

/// Validate a new password against policy.
///
/// # Errors
///
/// Returns [`AuthError::WeakPassword`] when the password is too short.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns [`AuthError::PasswordHash`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredentials`] when the password does not match
/// or the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use kifaru_core::{AdminUserId, Email};

    fn test_admin() -> AdminUser {
        let now: DateTime<Utc> = Utc::now();
        AdminUser {
            id: AdminUserId::new(1),
            email: Email::parse("admin@kifarumotors.example").unwrap(),
            name: "Test Admin".to_owned(),
            role: AdminRole::Admin,
            created_at: now,
            updated_at: now,
        }
    }

    fn secret() -> SecretString {
        SecretString::from("kR9#vP2$mX7@qL4!wZ8^nC5&jB1*tH6%")
    }

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_malformed_hash_rejected() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_token_roundtrip() {
        let secret = secret();
        let token = issue_token(&secret, &test_admin()).unwrap();
        let claims = verify_token(&secret, &token).unwrap();
        assert_eq!(claims.sub, "admin@kifarumotors.example");
        assert_eq!(claims.role, AdminRole::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(&secret(), &test_admin()).unwrap();
        let other = SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6!");
        assert!(matches!(
            verify_token(&other, &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            verify_token(&secret(), "not.a.token"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough password").is_ok());
    }
}

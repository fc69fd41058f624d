//! Admin session issuing and bearer-token verification
//!
//! A single shared secret gates the admin role. Login issues a signed,
//! time-limited bearer token; the [`AdminBearer`] extractor verifies the
//! signature and expiry at the routing boundary, before a handler runs.
//! There is no refresh, no revocation list, and no per-admin identity.

use crate::core::error::{ApiError, ApiResult};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Token lifetime: 24 hours from issuance
const TOKEN_TTL_HOURS: i64 = 24;

/// Claims carried by an admin bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Always `"admin"`; there is a single shared role
    pub role: String,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// A freshly issued admin session
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub logged_in_at: DateTime<Utc>,
}

/// Issues and verifies admin bearer tokens against a shared secret
pub struct AdminSessions {
    password: String,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AdminSessions {
    /// Create a session issuer from the shared admin password and the
    /// token-signing secret
    pub fn new(password: impl Into<String>, token_secret: &str) -> Self {
        Self {
            password: password.into(),
            encoding: EncodingKey::from_secret(token_secret.as_bytes()),
            decoding: DecodingKey::from_secret(token_secret.as_bytes()),
        }
    }

    /// Verify the shared secret and issue a bearer token
    ///
    /// Fails with an auth error on mismatch, every time; there is no
    /// lockout and repeated failures never succeed.
    pub fn login(&self, candidate: &str) -> ApiResult<IssuedToken> {
        if candidate != self.password {
            return Err(ApiError::Auth {
                message: "Invalid password".to_string(),
            });
        }

        let now = Utc::now();
        let claims = AdminClaims {
            role: "admin".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("failed to sign token: {}", e)))?;

        Ok(IssuedToken {
            token,
            logged_in_at: now,
        })
    }

    /// Verify a bearer token's signature and expiry
    pub fn verify(&self, token: &str) -> ApiResult<AdminClaims> {
        let data =
            decode::<AdminClaims>(token, &self.decoding, &Validation::default()).map_err(|e| {
                ApiError::Auth {
                    message: format!("Invalid or expired token: {}", e),
                }
            })?;

        Ok(data.claims)
    }
}

/// Extractor enforcing an admin bearer token on a route
///
/// # Usage
///
/// ```rust,ignore
/// async fn list_orders(
///     _admin: AdminBearer,
///     State(orders): State<Arc<OrderService>>,
/// ) -> ApiResult<Json<Value>> {
///     // only reached with a valid, unexpired token
/// }
/// ```
pub struct AdminBearer(pub AdminClaims);

impl<S> FromRequestParts<S> for AdminBearer
where
    S: Send + Sync,
    Arc<AdminSessions>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = Arc::<AdminSessions>::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Auth {
                message: "Missing bearer token".to_string(),
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| ApiError::Auth {
            message: "Authorization header is not a bearer token".to_string(),
        })?;

        let claims = sessions.verify(token)?;
        Ok(AdminBearer(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sessions() -> AdminSessions {
        AdminSessions::new("hunter2", "signing-secret")
    }

    #[test]
    fn test_login_with_correct_password_issues_token() {
        let issued = sessions().login("hunter2").expect("login should succeed");
        assert!(!issued.token.is_empty());
    }

    #[test]
    fn test_login_with_wrong_password_fails_every_time() {
        let sessions = sessions();
        for _ in 0..20 {
            let err = sessions.login("wrong").unwrap_err();
            assert!(matches!(err, ApiError::Auth { .. }));
        }
    }

    #[test]
    fn test_issued_token_verifies() {
        let sessions = sessions();
        let issued = sessions.login("hunter2").unwrap();
        let claims = sessions.verify(&issued.token).expect("token should verify");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let err = sessions().verify("not-a-token").unwrap_err();
        assert!(matches!(err, ApiError::Auth { .. }));
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let issued = AdminSessions::new("hunter2", "other-secret")
            .login("hunter2")
            .unwrap();
        let err = sessions().verify(&issued.token).unwrap_err();
        assert!(matches!(err, ApiError::Auth { .. }));
    }

    #[test]
    fn test_expired_token_rejected() {
        let sessions = sessions();
        let past = Utc::now() - Duration::hours(48);
        let claims = AdminClaims {
            role: "admin".to_string(),
            iat: past.timestamp(),
            exp: (past + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"signing-secret"),
        )
        .unwrap();

        let err = sessions.verify(&token).unwrap_err();
        assert!(matches!(err, ApiError::Auth { .. }));
    }
}

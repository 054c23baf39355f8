//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs carrying the caller's user id. Issuing them (login)
//! happens elsewhere; this module only needs the shared secret to verify them.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::RequestPartsExt;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::user::UserId;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: UserId,
    pub exp: i64,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

#[derive(Clone)]
pub struct Authenticator {
    keys: Arc<Keys>,
    validation: Validation,
    ttl: Duration,
}

impl Authenticator {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
            validation: Validation::new(Algorithm::HS256),
            ttl,
        }
    }

    /// Signs an access token for `user_id` valid for the configured ttl.
    pub fn issue(&self, user_id: UserId) -> AppResult<String> {
        let claims = Claims {
            user_id,
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| AppError::Other(e.into()))
    }

    pub fn verify(&self, token: &str) -> AppResult<UserId> {
        let data = decode::<Claims>(token, &self.keys.decoding, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            AppError::Unauthenticated
        })?;
        Ok(data.claims.user_id)
    }
}

/// The authenticated caller, resolved from the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    Authenticator: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Unauthenticated)?;

        let user_id = Authenticator::from_ref(state).verify(bearer.token())?;
        Ok(CurrentUser(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_to_same_user() {
        let auth = Authenticator::new("secret", Duration::minutes(5));
        let token = auth.issue(42).unwrap();
        assert_eq!(auth.verify(&token).unwrap(), 42);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = Authenticator::new("one", Duration::minutes(5))
            .issue(1)
            .unwrap();
        let err = Authenticator::new("two", Duration::minutes(5))
            .verify(&token)
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[test]
    fn expired_token_is_rejected() {
        // past the default 60s leeway
        let auth = Authenticator::new("secret", Duration::minutes(-5));
        let token = auth.issue(1).unwrap();
        assert!(matches!(auth.verify(&token), Err(AppError::Unauthenticated)));
    }

    #[test]
    fn garbage_is_rejected() {
        let auth = Authenticator::new("secret", Duration::minutes(5));
        assert!(matches!(
            auth.verify("not.a.jwt"),
            Err(AppError::Unauthenticated)
        ));
    }
}

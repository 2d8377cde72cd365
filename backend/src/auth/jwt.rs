//! Bearer tokens are minted by the identity provider that owns signup and
//! login; this service only verifies them against the shared HS256 secret.

use jsonwebtoken::{decode, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
    #[serde(default)]
    pub email: Option<String>,
}

pub fn verify_token(token: &str, config: &Config) -> AppResult<TokenData<Claims>> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        AppError::Unauthorized
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn config(secret: &str) -> Config {
        Config {
            database_url: "postgres://localhost/unlate".into(),
            db_max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: Vec::new(),
            jwt_secret: secret.into(),
            default_window_days: 30,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(ttl: Duration) -> Claims {
        let now = Utc::now();
        Claims {
            sub: Uuid::new_v4(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            email: Some("me@example.com".into()),
        }
    }

    #[test]
    fn test_valid_token_verifies() {
        let claims = claims(Duration::minutes(15));
        let token = sign(&claims, "secret");

        let data = verify_token(&token, &config("secret")).unwrap();
        assert_eq!(data.claims.sub, claims.sub);
        assert_eq!(data.claims.email.as_deref(), Some("me@example.com"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign(&claims(Duration::minutes(15)), "other");
        assert!(matches!(
            verify_token(&token, &config("secret")),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = sign(&claims(Duration::hours(-2)), "secret");
        assert!(matches!(
            verify_token(&token, &config("secret")),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(verify_token("not-a-jwt", &config("secret")).is_err());
    }
}

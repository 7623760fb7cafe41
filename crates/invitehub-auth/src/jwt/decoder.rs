//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use invitehub_core::config::AuthConfig;
use invitehub_core::error::AppError;

use super::claims::Claims;

/// Validates JWT access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // seconds of clock skew
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;
    use chrono::{Duration, Utc};
    use invitehub_core::error::ErrorKind;
    use invitehub_core::types::UserId;
    use invitehub_entity::user::User;
    use uuid::Uuid;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.into(),
            ..AuthConfig::default()
        }
    }

    fn user() -> User {
        User {
            id: UserId::from_uuid(Uuid::new_v4()),
            email: "a@x.com".into(),
            username: "alice".into(),
            first_name: "Alice".into(),
            last_name: "Doe".into(),
            picture_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_access_token_carries_identity() {
        let user = user();
        let token = JwtEncoder::new(&config("s3cret"))
            .generate_access_token(&user, Utc::now())
            .unwrap();

        let claims = JwtDecoder::new(&config("s3cret"))
            .decode_access_token(&token.access_token)
            .unwrap();
        assert_eq!(claims.user_id(), user.id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = JwtEncoder::new(&config("one"))
            .generate_access_token(&user(), Utc::now())
            .unwrap();
        let err = JwtDecoder::new(&config("two"))
            .decode_access_token(&token.access_token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = JwtEncoder::new(&config("s3cret"))
            .generate_access_token(&user(), Utc::now() - Duration::days(2))
            .unwrap();
        let err = JwtDecoder::new(&config("s3cret"))
            .decode_access_token(&token.access_token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::AppState;
use crate::error::{AppError, AppResult};

/// The authenticated caller, inserted into request extensions by
/// `require_auth` and extracted by handlers.
#[derive(Clone, Copy, Debug)]
pub struct AuthUser(pub Uuid);

/// Claims carried by the auth provider's bearer tokens. The subject is the
/// user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Middleware requiring a valid HS256 bearer token on every request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing authorization header".to_string()))?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("authorization header must be a bearer token".to_string())
    })?;

    let user_id = decode_user_id(token, state.jwt_secret.as_bytes())?;

    request.extensions_mut().insert(AuthUser(user_id));
    Ok(next.run(request).await)
}

/// Validates a token and extracts the user id from its subject claim.
pub fn decode_user_id(token: &str, secret: &[u8]) -> AppResult<Uuid> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Tokens from the auth provider carry an audience we do not care about.
    validation.validate_aud = false;

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| AppError::Unauthorized(format!("invalid token: {}", e)))?;

    Uuid::parse_str(&data.claims.sub)
        .map_err(|_| AppError::Unauthorized("invalid user id in token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &[u8] = b"test-secret";

    fn make_token(sub: &str, exp_offset_secs: i64) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset_secs) as usize;
        let claims = Claims {
            sub: sub.to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = make_token(&user_id.to_string(), 3600);
        assert_eq!(decode_user_id(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = make_token(&Uuid::new_v4().to_string(), -3600);
        let result = decode_user_id(&token, SECRET);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = make_token(&Uuid::new_v4().to_string(), 3600);
        let result = decode_user_id(&token, b"other-secret");
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_non_uuid_subject_is_rejected() {
        let token = make_token("not-a-uuid", 3600);
        let result = decode_user_id(&token, SECRET);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let result = decode_user_id("definitely.not.ajwt", SECRET);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}

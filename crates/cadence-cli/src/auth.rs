//! Password sign-in for the HTTP API.
//!
//! With a password configured, `POST /api/signin` trades it for an HS256 JWT
//! signed with the password itself, so changing the password revokes every
//! token issued before. The token is returned in the body and as a `token`
//! cookie; task routes accept either the cookie or `Authorization: Bearer`.
//! Without a password every route stays open.

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, warn};

use crate::server::{ApiError, ApiResult, AppState};

const TOKEN_COOKIE: &str = "token";
const TOKEN_TTL_HOURS: i64 = 8;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
pub struct SignInBody {
    #[serde(default)]
    password: String,
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

pub fn issue_token(password: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: "cadence".to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(password.as_bytes()),
    )
}

fn verify_token(token: &str, password: &str) -> bool {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(password.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .is_ok()
}

/// Token from the `token` cookie, else from a bearer `Authorization` header.
fn request_token(headers: &HeaderMap) -> Option<&str> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, token)| token);

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
    })
}

pub async fn sign_in(
    State(state): State<AppState>,
    body: Result<Json<SignInBody>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(body) = body?;
    let password = match state.password.as_deref() {
        Some(password) if constant_time_eq(&body.password, password) => password,
        _ => {
            warn!("rejected sign-in attempt");
            return Err(ApiError::Unauthorized("Invalid password".to_string()));
        }
    };

    let token = issue_token(password).map_err(|e| {
        error!(error = %e, "failed to sign token");
        ApiError::Internal
    })?;
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        TOKEN_COOKIE,
        token,
        TOKEN_TTL_HOURS * 3600
    );
    Ok(([(header::SET_COOKIE, cookie)], Json(json!({ "token": token }))).into_response())
}

/// Rejects task requests without a valid token while a password is configured.
pub async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(password) = state.password.as_deref() else {
        return next.run(request).await;
    };

    let authorized = request_token(request.headers()).is_some_and(|token| verify_token(token, password));
    if authorized {
        return next.run(request).await;
    }

    debug!(uri = %request.uri(), "missing, invalid or expired token");
    ApiError::Unauthorized("Authentication required".to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use rstest::rstest;

    #[test]
    fn test_token_is_bound_to_password() {
        let token = issue_token("hunter2").unwrap();
        assert!(verify_token(&token, "hunter2"));
        assert!(!verify_token(&token, "hunter3"));
        assert!(!verify_token("not.a.token", "hunter2"));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = Claims {
            sub: "cadence".to_string(),
            iat: 0,
            exp: 60,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"hunter2"),
        )
        .unwrap();
        assert!(!verify_token(&token, "hunter2"));
    }

    #[rstest]
    #[case(&[("cookie", "token=abc")], Some("abc"))]
    #[case(&[("cookie", "theme=dark; token=abc; lang=en")], Some("abc"))]
    #[case(&[("authorization", "Bearer xyz")], Some("xyz"))]
    #[case(&[("cookie", "token=abc"), ("authorization", "Bearer xyz")], Some("abc"))]
    #[case(&[("cookie", "tokens=abc")], None)]
    #[case(&[("authorization", "Basic xyz")], None)]
    #[case(&[], None)]
    fn test_request_token(#[case] headers: &[(&'static str, &'static str)], #[case] expected: Option<&str>) {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.append(*name, HeaderValue::from_static(*value));
        }
        assert_eq!(request_token(&map), expected);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("secret", "secret"));
        assert!(!constant_time_eq("secret", "secreT"));
        assert!(!constant_time_eq("secret", "secrets"));
    }
}

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use service::member::LoginMember;

use crate::errors::ApiError;
use crate::routes::auth::{ServerState, AUTH_COOKIE};

/// The member a request acts as, resolved from `Authorization: Bearer <jwt>`
/// or, failing that, the `auth_token` cookie.
#[derive(Debug, Clone)]
pub struct CurrentMember(pub LoginMember);

/// `Ok(None)` when no token was sent; `Err` when the header is malformed.
pub fn token_from_headers(headers: &HeaderMap) -> Result<Option<String>, ApiError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let raw = value.to_str().map_err(|_| ApiError::unauthorized("invalid Authorization header"))?;
        return match raw.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
            _ => Err(ApiError::unauthorized("invalid Authorization format (expect Bearer)")),
        };
    }
    let jar = CookieJar::from_headers(headers);
    Ok(jar
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty()))
}

#[async_trait]
impl FromRequestParts<ServerState> for CurrentMember {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path().to_string();
        let Some(token) = token_from_headers(&parts.headers)? else {
            warn!(path = %path, "missing Authorization header and auth_token cookie");
            return Err(ApiError::unauthorized("login required"));
        };
        match state.auth.resolve_login_member(&token).await {
            Ok(member) => Ok(CurrentMember(member)),
            Err(e) => {
                warn!(path = %path, err = %e, "token rejected");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        h.insert(header::COOKIE, HeaderValue::from_static("auth_token=cookie"));
        assert_eq!(token_from_headers(&h).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn cookie_is_used_without_header() {
        let mut h = HeaderMap::new();
        h.insert(header::COOKIE, HeaderValue::from_static("theme=dark; auth_token=xyz"));
        assert_eq!(token_from_headers(&h).unwrap().as_deref(), Some("xyz"));
        assert_eq!(token_from_headers(&HeaderMap::new()).unwrap(), None);
    }

    #[test]
    fn non_bearer_header_is_rejected() {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert!(token_from_headers(&h).is_err());
    }
}

//! Cookie-based session resolution.
//!
//! Every request carries its identity in the `auth_secret` cookie. The session layers
//! resolve it once per request and hand the result to handlers as a [`Session`] (API
//! endpoints) or [`PageSession`] (UI pages) request extension. Invalid secrets never fail
//! a request, the request just proceeds without a user.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, Request},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::db::Repository;
use crate::models::User;

/// Name of the session cookie.
pub const AUTH_SECRET_COOKIE: &str = "auth_secret";

/// Lifetime of the session cookie.
pub const COOKIE_MAX_AGE_DAYS: i64 = 360;

/// Identity of the current request, as seen by API endpoints.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user: Option<User>,
}

/// Identity of the current request, as seen by UI pages. Pages always have a user.
#[derive(Debug, Clone)]
pub struct PageSession {
    pub user: User,
}

#[derive(Debug, Deserialize)]
struct LoginQuery {
    login: Option<String>,
}

/// Session layer for API endpoints: resolves the user from the cookie, if any.
pub async fn session_layer(repo: Arc<Repository>, mut request: Request, next: Next) -> Response {
    let user = resolve_user(&repo, request.headers()).await;
    request.extensions_mut().insert(Session { user });
    next.run(request).await
}

/// Session layer for UI pages.
///
/// On top of cookie resolution, redeems a `login` query code and, if there is still no
/// user, logs in a new one. Whenever the identity changes the cookie is (re)issued.
pub async fn page_session_layer(
    repo: Arc<Repository>,
    cookie_secure: bool,
    mut request: Request,
    next: Next,
) -> Response {
    let mut user = resolve_user(&repo, request.headers()).await;
    let mut issued = None;

    if let Some(code) = login_code(&request) {
        match repo.authenticate(&code).await {
            Ok(Some(login_user)) => {
                issued = Some(login_user.auth_secret.clone());
                user = Some(login_user);
            }
            Ok(None) => tracing::debug!("Ignoring invalid login code"),
            Err(e) => tracing::debug!(error = %e, "Failed to redeem login code"),
        }
    }

    let user = match user {
        Some(user) => user,
        None => match repo.login().await {
            Ok(new_user) => {
                issued = Some(new_user.auth_secret.clone());
                new_user
            }
            Err(e) => return e.into_response(),
        },
    };

    request.extensions_mut().insert(PageSession { user });
    let mut response = next.run(request).await;

    if let Some(secret) = issued {
        match HeaderValue::from_str(&auth_secret_cookie(&secret, cookie_secure)) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "Could not encode session cookie"),
        }
    }
    response
}

/// Resolve the current user from the `auth_secret` cookie.
///
/// Unknown secrets and lookup failures both yield `None`.
pub async fn resolve_user(repo: &Repository, headers: &HeaderMap) -> Option<User> {
    let secret = parse_cookies(headers).remove(AUTH_SECRET_COOKIE)?;
    if secret.is_empty() {
        return None;
    }
    match repo.authenticate(&secret).await {
        Ok(Some(user)) => Some(user),
        Ok(None) => {
            tracing::debug!("Ignoring invalid authentication secret");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to resolve authentication secret");
            None
        }
    }
}

fn login_code(request: &Request) -> Option<String> {
    Query::<LoginQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(query)| query.login)
        .filter(|code| !code.is_empty())
}

/// Parse all `Cookie` headers into a name → value map.
pub fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

/// `Set-Cookie` value carrying the session secret.
pub fn auth_secret_cookie(secret: &str, secure: bool) -> String {
    let expires = Utc::now() + Duration::days(COOKIE_MAX_AGE_DAYS);
    let mut cookie = format!(
        "{}={}; Expires={}; Max-Age={}; Path=/; HttpOnly",
        AUTH_SECRET_COOKIE,
        secret,
        expires.format("%a, %d %b %Y %H:%M:%S GMT"),
        COOKIE_MAX_AGE_DAYS * 24 * 60 * 60,
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; auth_secret=abc123"),
        );
        headers.append(header::COOKIE, HeaderValue::from_static("lang=en"));

        let cookies = parse_cookies(&headers);
        assert_eq!(cookies.get("auth_secret"), Some(&"abc123".to_string()));
        assert_eq!(cookies.get("theme"), Some(&"dark".to_string()));
        assert_eq!(cookies.get("lang"), Some(&"en".to_string()));
    }

    #[test]
    fn test_parse_cookies_ignores_malformed_pairs() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("garbage; a=b"));

        let cookies = parse_cookies(&headers);
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies.get("a"), Some(&"b".to_string()));
    }

    #[test]
    fn test_auth_secret_cookie() {
        let cookie = auth_secret_cookie("abc123", false);
        assert!(cookie.starts_with("auth_secret=abc123; "));
        assert!(cookie.contains("Max-Age=31104000"));
        assert!(cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Secure"));

        assert!(auth_secret_cookie("abc123", true).ends_with("; Secure"));
    }
}

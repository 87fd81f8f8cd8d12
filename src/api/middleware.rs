//! Security middleware: anti-forgery tokens and CORS configuration.
//!
//! Uses the double-submit pattern. Each client gets a random token in a
//! cookie, and any state-changing request must echo that token back in the
//! `X-CSRF-Token` header or the `_csrf` form field.

use axum::{
    body::{to_bytes, Body},
    extract::{Form, FromRequest, State},
    http::{
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
        HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode,
    },
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

pub const CSRF_COOKIE: &str = "goal_tracker_csrf";
pub const CSRF_HEADER: &str = "x-csrf-token";
pub const CSRF_FIELD: &str = "_csrf";

/// Largest form body buffered while looking for the token field.
const MAX_FORM_BYTES: usize = 64 * 1024;

/// Security configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct SecurityConfig {
    /// Reject unsafe requests without a matching token (GOAL_TRACKER_CSRF, default on)
    pub csrf: bool,
    /// Allowed CORS origins (from GOAL_TRACKER_CORS_ORIGINS, comma-separated)
    pub cors_origins: Option<Vec<String>>,
}

impl SecurityConfig {
    /// Load security configuration from environment variables.
    pub fn from_env() -> Self {
        let csrf = !matches!(
            std::env::var("GOAL_TRACKER_CSRF").as_deref(),
            Ok("off") | Ok("false") | Ok("0")
        );

        let cors_origins = std::env::var("GOAL_TRACKER_CORS_ORIGINS")
            .ok()
            .map(|s| s.split(',').map(|s| s.trim().to_string()).collect());

        Self { csrf, cors_origins }
    }

    /// Create a config with token checks enforced.
    pub fn enabled() -> Self {
        Self {
            csrf: true,
            cors_origins: None,
        }
    }

    /// Create a config with no token checks (for local development/testing).
    pub fn disabled() -> Self {
        Self {
            csrf: false,
            cors_origins: None,
        }
    }

    /// Build the CORS layer. Without configured origins, no cross-origin
    /// access is granted.
    pub fn cors_layer(&self) -> CorsLayer {
        match &self.cors_origins {
            Some(origins) => {
                let origins: Vec<HeaderValue> =
                    origins.iter().filter_map(|o| o.parse().ok()).collect();
                CorsLayer::new()
                    .allow_origin(origins)
                    .allow_methods([Method::GET, Method::POST])
                    .allow_headers([CONTENT_TYPE, HeaderName::from_static(CSRF_HEADER)])
                    .allow_credentials(true)
            }
            None => CorsLayer::new(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// The anti-forgery token for the current client, available to handlers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfToken(pub String);

#[derive(Deserialize)]
struct CsrfField {
    #[serde(rename = "_csrf")]
    token: Option<String>,
}

/// Attach the client's token to the request and verify it on unsafe methods.
pub async fn csrf_middleware(
    State(config): State<SecurityConfig>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let existing = cookie_token(request.headers());
    let token = existing.clone().unwrap_or_else(generate_token);

    if config.csrf && !is_safe_method(request.method()) {
        let Some(expected) = existing.as_deref() else {
            tracing::warn!("Missing anti-forgery cookie on {}", request.uri());
            return Err(StatusCode::FORBIDDEN);
        };

        let (submitted, rebuilt) = submitted_token(request).await?;
        request = rebuilt;
        if submitted.as_deref() != Some(expected) {
            tracing::warn!("Anti-forgery token mismatch on {}", request.uri());
            return Err(StatusCode::FORBIDDEN);
        }
    }

    request.extensions_mut().insert(CsrfToken(token.clone()));
    let mut response = next.run(request).await;

    if existing.is_none() {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Strict",
            CSRF_COOKIE, token
        );
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }

    Ok(response)
}

fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Extract the token from the `Cookie` header.
fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == CSRF_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Find the submitted token in the header or, failing that, the form body.
///
/// Reading the body consumes it, so the request is rebuilt from the buffered
/// bytes and handed back.
async fn submitted_token(
    request: Request<Body>,
) -> Result<(Option<String>, Request<Body>), StatusCode> {
    if let Some(token) = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|h| h.to_str().ok())
    {
        return Ok((Some(token.to_string()), request));
    }

    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
    if !is_form {
        return Ok((None, request));
    }

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_FORM_BYTES).await.map_err(|e| {
        tracing::warn!("Failed to read form body: {}", e);
        StatusCode::PAYLOAD_TOO_LARGE
    })?;

    let probe = Request::builder()
        .method(Method::POST)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(bytes.clone()))
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    let token = match Form::<CsrfField>::from_request(probe, &()).await {
        Ok(Form(field)) => field.token,
        Err(_) => None,
    };

    Ok((token, Request::from_parts(parts, Body::from(bytes))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_token_finds_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; goal_tracker_csrf=abc123; lang=en"),
        );
        assert_eq!(cookie_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn cookie_token_ignores_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(cookie_token(&headers), None);
        assert_eq!(cookie_token(&HeaderMap::new()), None);
    }

    #[test]
    fn generated_tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
        assert_eq!(generate_token().len(), 32);
    }

    #[test]
    fn only_read_methods_are_safe() {
        assert!(is_safe_method(&Method::GET));
        assert!(!is_safe_method(&Method::POST));
    }

    #[test]
    fn security_config_disabled_has_no_csrf() {
        let config = SecurityConfig::disabled();
        assert!(!config.csrf);
        assert!(config.cors_origins.is_none());
    }

    #[test]
    fn security_config_default_reads_the_environment() {
        let default = SecurityConfig::default();
        let from_env = SecurityConfig::from_env();
        assert_eq!(default.csrf, from_env.csrf);
        assert_eq!(default.cors_origins, from_env.cors_origins);
    }

    #[test]
    fn security_config_enabled_has_csrf() {
        assert!(SecurityConfig::enabled().csrf);
    }
}

// HTTP middleware
// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

use super::routes::AppState;
use crate::error::ExporterError;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::debug;

const WWW_AUTHENTICATE_VALUE: &str = r#"Basic realm="ovh_exporter", charset="UTF-8""#;

/// Create request ID layers for the application
pub fn request_id_layers() -> (SetRequestIdLayer<MakeRequestUuid>, PropagateRequestIdLayer) {
    (
        SetRequestIdLayer::x_request_id(MakeRequestUuid),
        PropagateRequestIdLayer::x_request_id(),
    )
}

/// HTTP basic auth on every route, when enabled in the server config.
pub async fn basic_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let auth = &state.config.server.basic_auth;
    if !auth.enabled {
        return next.run(request).await;
    }

    let credentials = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(decode_basic);

    match credentials {
        Some((login, password))
            if Some(login.as_str()) == auth.login.as_deref()
                && Some(password.as_str()) == auth.password.as_deref() =>
        {
            next.run(request).await
        }
        _ => unauthorized(),
    }
}

fn unauthorized() -> Response {
    let mut response = ExporterError::Unauthorized.into_response();
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static(WWW_AUTHENTICATE_VALUE),
    );
    debug!("Rejected request without valid credentials");
    response
}

/// Split a `Basic` authorization header into login and password.
fn decode_basic(header: &str) -> Option<(String, String)> {
    let Some(encoded) = header.strip_prefix("Basic ") else {
        debug!("Authorization is not a basic authentication");
        return None;
    };

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (login, password) = decoded.split_once(':')?;
    Some((login.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_basic() {
        // admin:s3cr:et
        assert_eq!(
            decode_basic("Basic YWRtaW46czNjcjpldA=="),
            Some(("admin".to_string(), "s3cr:et".to_string()))
        );
        assert_eq!(decode_basic("Bearer abc"), None);
        assert_eq!(decode_basic("Basic !!!"), None);
        // "nocolon"
        assert_eq!(decode_basic("Basic bm9jb2xvbg=="), None);
    }
}

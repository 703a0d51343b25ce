//! Cross-origin access for the browser frontend.

use std::str::FromStr;

use axum::{
    body::Body,
    extract::State,
    http::{
        HeaderValue, Method, Request, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, InvalidHeaderValue, ORIGIN,
            VARY,
        },
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

pub const DEFAULT_ORIGIN: &str = "http://localhost:5173";

/// The one origin allowed to call the API with credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsOrigin(HeaderValue);

impl Default for CorsOrigin {
    fn default() -> Self {
        Self(HeaderValue::from_static(DEFAULT_ORIGIN))
    }
}

impl FromStr for CorsOrigin {
    type Err = InvalidHeaderValue;

    fn from_str(origin: &str) -> Result<Self, Self::Err> {
        HeaderValue::from_str(origin.trim_end_matches('/')).map(Self)
    }
}

fn allow(origin: &CorsOrigin, response: &mut Response) {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.0.clone());
    headers.insert(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(VARY, HeaderValue::from_static("Origin"));
}

/// Answers preflight requests and tags responses for the allowed origin.
/// Other origins get no CORS headers, so browsers block them.
pub async fn cors(
    State(origin): State<CorsOrigin>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let allowed = request.headers().get(ORIGIN) == Some(&origin.0);

    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        if allowed {
            allow(&origin, &mut response);
            let headers = response.headers_mut();
            headers.insert(
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("GET,POST,PUT,DELETE,OPTIONS"),
            );
            headers.insert(
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("content-type"),
            );
        }
        return response;
    }

    let mut response = next.run(request).await;
    if allowed {
        allow(&origin, &mut response);
    }
    response
}

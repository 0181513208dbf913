//! Response envelopes shared by the HTTP functions: the GET-only guard, the
//! permissive CORS headers, and the uniform error body with an
//! empty-but-present payload.

use lambda_http::http::{header, Method, StatusCode};
use lambda_http::{Body, Error, Request, Response};
use serde::Serialize;

/// Cache directives used by the functions; the values match the deployed site.
pub const CACHE_ONE_HOUR: &str = "public, max-age=3600";
pub const CACHE_SHORT: &str = "public, max-age=300, s-maxage=600";

/// JSON response carrying the CORS headers every function sends.
pub fn json<T: Serialize>(
    status: StatusCode,
    cache_control: Option<&str>,
    body: &T,
) -> Result<Response<Body>, Error> {
    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type");

    if let Some(directive) = cache_control {
        builder = builder.header(header::CACHE_CONTROL, directive);
    }

    Ok(builder.body(Body::from(serde_json::to_string(body)?))?)
}

/// GET-only guard, applied before configuration or network work.
pub fn reject_non_get(request: &Request) -> Result<Option<Response<Body>>, Error> {
    if request.method() == Method::GET {
        return Ok(None);
    }

    let rejection = json(
        StatusCode::METHOD_NOT_ALLOWED,
        None,
        &serde_json::json!({"error": "Method Not Allowed"}),
    )?;
    Ok(Some(rejection))
}

/// Error envelope: the upstream status (or 500) plus an `error` field merged
/// into the endpoint's empty payload, so clients always see their arrays.
pub fn error(
    err: &crate::error::FetchError,
    empty_payload: serde_json::Value,
) -> Result<Response<Body>, Error> {
    let mut body = empty_payload;
    if let serde_json::Value::Object(map) = &mut body {
        map.insert("error".into(), serde_json::Value::String(err.to_string()));
    }

    let status = StatusCode::from_u16(err.status().as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json(status, None, &body)
}

//! Conversion from stored responses to gateway HTTP responses.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response as AxumResponse;

use crate::model::Response;

/// Writes a stored response out as a gateway response.
pub fn write_response(response: &Response) -> AxumResponse {
    let mut header_map = HeaderMap::new();
    for (name, value) in &response.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_str()),
            HeaderValue::from_str(value),
        ) {
            header_map.insert(name, value);
        }
    }
    header_map.insert(
        header::CONTENT_LENGTH,
        HeaderValue::from(response.body.len() as u64),
    );

    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);

    AxumResponse::builder()
        .status(status)
        .body(Body::from(response.body.clone()))
        .map(|mut built| {
            *built.headers_mut() = header_map;
            built
        })
        .unwrap_or_else(|_| {
            AxumResponse::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::empty())
                .unwrap()
        })
}

/// Empty response with just a status, for gateway-level failures.
pub fn status_response(status: StatusCode) -> AxumResponse {
    AxumResponse::builder()
        .status(status)
        .body(Body::empty())
        .unwrap_or_else(|_| AxumResponse::new(Body::empty()))
}

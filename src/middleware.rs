use axum::{
    Json,
    body::{Bytes, to_bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::response::ErrorBody;

const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;

/// Ensures every error response leaves the server as the shared JSON
/// envelope, with `path` set to the request path. Handler-rendered
/// `ErrorBody` payloads get the path injected; anything else (extractor
/// rejections, 405s) is rewritten into a fresh envelope.
pub async fn error_envelope_middleware(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let response = next.run(req).await;

    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, MAX_ERROR_BODY_BYTES).await.unwrap_or_default();

    let (status, body) = match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(mut fields)) if fields.contains_key("timestamp") => {
            fields.insert("path".to_string(), Value::String(path));
            (status, Value::Object(fields))
        }
        _ => {
            // The JSON extractor reports data errors as 422; this API treats
            // them as plain client validation failures.
            let status = if status == StatusCode::UNPROCESSABLE_ENTITY {
                StatusCode::BAD_REQUEST
            } else {
                status
            };
            let mut envelope = ErrorBody::new(status, text_message(status, &bytes));
            envelope.path = path;
            (status, serde_json::to_value(envelope).unwrap_or(Value::Null))
        }
    };

    let mut rewritten = (status, Json(body)).into_response();
    copy_headers(&parts.headers, &mut rewritten);
    rewritten
}

fn text_message(status: StatusCode, bytes: &Bytes) -> String {
    let message = String::from_utf8_lossy(bytes).trim().to_string();
    if message.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }
    message
}

fn copy_headers(src: &HeaderMap, dest: &mut Response) {
    for (name, value) in src {
        if name == header::CONTENT_TYPE || name == header::CONTENT_LENGTH {
            continue;
        }
        dest.headers_mut().insert(name.clone(), value.clone());
    }
}

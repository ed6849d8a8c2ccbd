use crate::transport::http::error::ApiError;
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use serde_json::{Map, Value as JsonValue};

fn json_kind(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn is_json_content(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

/// A request body that must be a JSON object.
///
/// Extraction only buffers the body. Parsing waits for [`Payload::into_object`],
/// so a handler can resolve the target resource first. Transport-level parse
/// failures never reach the validator.
#[derive(Debug)]
pub struct Payload {
    json_content: bool,
    bytes: Bytes,
}

impl Payload {
    pub fn into_object(self) -> Result<Map<String, JsonValue>, ApiError> {
        if !self.json_content {
            return Err(ApiError::MalformedLiteral(
                "expected an application/json body".to_string(),
            ));
        }
        let value: JsonValue = serde_json::from_slice(&self.bytes)
            .map_err(|e| ApiError::MalformedLiteral(e.to_string()))?;
        match value {
            JsonValue::Object(map) => Ok(map),
            other => Err(ApiError::MalformedLiteral(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json_content = is_json_content(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::MalformedLiteral(e.body_text()))?;
        Ok(Self {
            json_content,
            bytes,
        })
    }
}

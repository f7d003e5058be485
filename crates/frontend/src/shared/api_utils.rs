//! API utilities for frontend-backend communication
//!
//! Builds API URLs, sends JSON requests and turns every kind of failure into
//! an [`ApiError`] the pages can show.

use contracts::shared::api::{error_message_from_body, ApiEnvelope, EnvelopeFailure};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Port of the remote API when no base URL was baked in at build time.
pub const DEFAULT_API_PORT: u16 = 5000;

/// Shown when a failure carries no server message.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("{}", .message.as_deref().unwrap_or("request was rejected"))]
    Application { message: Option<String> },
    #[error("unexpected response: {0}")]
    Malformed(String),
    #[error("HTTP {status}")]
    Http { status: u16, message: Option<String> },
}

impl ApiError {
    /// Text for a toast: the server's own message when it sent one.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Application { message: Some(m) } | ApiError::Http { message: Some(m), .. } => {
                m.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

impl From<EnvelopeFailure> for ApiError {
    fn from(failure: EnvelopeFailure) -> Self {
        match failure {
            EnvelopeFailure::Rejected(message) => ApiError::Application { message },
            EnvelopeFailure::MissingData => ApiError::Malformed("response has no data".into()),
        }
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(e: gloo_net::Error) -> Self {
        match e {
            gloo_net::Error::SerdeError(e) => ApiError::Malformed(e.to_string()),
            other => ApiError::Transport(other.to_string()),
        }
    }
}

/// Get the base URL for API requests
///
/// `OFFICE_API_BASE` set at build time wins; otherwise the current window
/// location with port [`DEFAULT_API_PORT`].
pub fn api_base() -> String {
    if let Some(base) = option_env!("OFFICE_API_BASE") {
        return base.trim_end_matches('/').to_string();
    }
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:{}", protocol, hostname, DEFAULT_API_PORT)
}

/// Build a full API URL from a path
pub fn api_url(path: &str) -> String {
    join_url(&api_base(), path)
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<ApiEnvelope<T>, ApiError> {
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(match error_message_from_body(&body) {
            Some(message) => ApiError::Application {
                message: Some(message),
            },
            None => ApiError::Http {
                status,
                message: None,
            },
        });
    }
    response
        .json::<ApiEnvelope<T>>()
        .await
        .map_err(|e| ApiError::Malformed(e.to_string()))
}

async fn send_json<B: Serialize>(path: &str, body: &B) -> Result<Response, ApiError> {
    let url = api_url(path);
    log::debug!("POST {}", url);
    Request::post(&url)
        .json(body)
        .map_err(|e| ApiError::Malformed(format!("failed to serialize request: {}", e)))?
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))
}

/// POST a JSON body and unwrap the `data` of the envelope.
pub async fn post_data<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, ApiError> {
    let response = send_json(path, body).await?;
    Ok(read_envelope::<T>(response).await?.into_data()?)
}

/// POST a mutation; returns the server's confirmation message, if any.
pub async fn post_ack<B: Serialize>(path: &str, body: &B) -> Result<Option<String>, ApiError> {
    let response = send_json(path, body).await?;
    Ok(read_envelope::<serde_json::Value>(response).await?.into_ack()?)
}

/// GET and unwrap the `data` of the envelope.
pub async fn get_data<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    let url = api_url(path);
    log::debug!("GET {}", url);
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    Ok(read_envelope::<T>(response).await?.into_data()?)
}

/// Non-2xx replies of the endpoints that skip the envelope.
async fn ensure_ok(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Http {
        status,
        message: error_message_from_body(&body),
    })
}

/// GET a bare JSON document (settings endpoints are not wrapped).
pub async fn get_plain<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    let url = api_url(path);
    log::debug!("GET {}", url);
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    ensure_ok(response).await?.json::<T>().await.map_err(ApiError::from)
}

/// POST a JSON body where any 2xx reply counts as accepted.
pub async fn post_plain<B: Serialize>(path: &str, body: &B) -> Result<(), ApiError> {
    let response = send_json(path, body).await?;
    ensure_ok(response).await.map(|_| ())
}

/// POST a multipart form (file uploads). The reply is not wrapped.
pub async fn post_form<T: DeserializeOwned>(path: &str, form: web_sys::FormData) -> Result<T, ApiError> {
    let url = api_url(path);
    log::debug!("POST (multipart) {}", url);
    let response = Request::post(&url)
        .body(form)
        .map_err(ApiError::from)?
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    ensure_ok(response).await?.json::<T>().await.map_err(ApiError::from)
}

/// A file returned by a binary endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Decides whether a binary response is the expected file or an error in
/// disguise.
///
/// Binary endpoints answer failures with a JSON body under a blob content
/// type, so anything that is not `expected_mime` is re-read as text and its
/// `message` recovered.
pub fn interpret_binary(
    status: u16,
    content_type: &str,
    bytes: Vec<u8>,
    expected_mime: &str,
) -> Result<Binary, ApiError> {
    let ok = (200..300).contains(&status);
    if ok && content_type.to_ascii_lowercase().contains(expected_mime) {
        return Ok(Binary {
            content_type: content_type.to_string(),
            bytes,
        });
    }

    let text = std::str::from_utf8(&bytes).ok();
    if let Some(message) = text.and_then(error_message_from_body) {
        return Err(ApiError::Application {
            message: Some(message),
        });
    }
    if !ok {
        return Err(ApiError::Http {
            status,
            message: None,
        });
    }
    let looks_like_json = text
        .map(|t| serde_json::from_str::<serde_json::Value>(t.trim()).is_ok())
        .unwrap_or(false);
    if looks_like_json || bytes.is_empty() {
        return Err(ApiError::Malformed(format!(
            "expected {}, got {}",
            expected_mime, content_type
        )));
    }
    Ok(Binary {
        content_type: content_type.to_string(),
        bytes,
    })
}

/// POST a JSON body to a binary endpoint (PDF, CSV).
pub async fn post_binary<B: Serialize>(
    path: &str,
    body: &B,
    expected_mime: &str,
) -> Result<Binary, ApiError> {
    let response = send_json(path, body).await?;
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap_or_default();
    let bytes = response
        .binary()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    interpret_binary(status, &content_type, bytes, expected_mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(join_url("http://h:5000/", "/kpi/getAll"), "http://h:5000/kpi/getAll");
        assert_eq!(join_url("http://h:5000", "kpi/punch"), "http://h:5000/kpi/punch");
    }

    #[test]
    fn user_message_prefers_server_text() {
        let e = ApiError::Application {
            message: Some("Invalid credentials".into()),
        };
        assert_eq!(e.user_message("Login failed"), "Invalid credentials");
        let e = ApiError::Application { message: None };
        assert_eq!(e.user_message("Login failed"), "Login failed");
        let e = ApiError::Transport("offline".into());
        assert_eq!(e.user_message("Login failed"), "Login failed");
        let e = ApiError::Http {
            status: 500,
            message: None,
        };
        assert_eq!(e.to_string(), "HTTP 500");
    }

    #[test]
    fn envelope_failures_map_to_api_errors() {
        assert_eq!(
            ApiError::from(EnvelopeFailure::Rejected(Some("nope".into()))),
            ApiError::Application {
                message: Some("nope".into())
            }
        );
        assert!(matches!(
            ApiError::from(EnvelopeFailure::MissingData),
            ApiError::Malformed(_)
        ));
    }

    #[test]
    fn binary_with_expected_type_passes() {
        let out = interpret_binary(200, "application/pdf", b"%PDF-1.7".to_vec(), "application/pdf").unwrap();
        assert_eq!(out.bytes, b"%PDF-1.7");
    }

    #[test]
    fn json_error_in_blob_is_recovered() {
        let body = br#"{"success":false,"message":"Employee not found"}"#.to_vec();
        let err = interpret_binary(200, "application/octet-stream", body.clone(), "application/pdf").unwrap_err();
        assert_eq!(err.user_message("x"), "Employee not found");
        let err = interpret_binary(404, "application/json", body, "text/csv").unwrap_err();
        assert_eq!(err.user_message("x"), "Employee not found");
    }

    #[test]
    fn unknown_failures() {
        assert_eq!(
            interpret_binary(502, "text/html", b"<html>".to_vec(), "application/pdf"),
            Err(ApiError::Http {
                status: 502,
                message: None
            })
        );
        assert!(matches!(
            interpret_binary(200, "application/json", b"{\"ok\":1}".to_vec(), "text/csv"),
            Err(ApiError::Malformed(_))
        ));
        let generic = interpret_binary(200, "application/octet-stream", b"a;b\n1;2".to_vec(), "text/csv");
        assert!(generic.is_ok());
    }
}

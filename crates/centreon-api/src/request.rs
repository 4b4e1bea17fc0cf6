// Request shaping and raw responses
//
// The legacy API is reached in three styles: a form POST (login), a JSON
// POST (external commands, CLAPI) and a header-only GET (metrics). Each
// style is captured as a `PreparedRequest` that `CentreonClient::dispatch`
// sends as-is.

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use url::Url;

use crate::error::{self, Error};

/// Body of a prepared request.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `application/x-www-form-urlencoded` fields, in order.
    Form(Vec<(String, String)>),
    /// JSON document.
    Json(Value),
    /// No body.
    Empty,
}

/// A fully-built request, ready for dispatch.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub payload: Payload,
}

/// Form-encoded POST.
pub fn form_request(url: Url, fields: &[(&str, &str)], headers: Option<HeaderMap>) -> PreparedRequest {
    let fields = fields
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();

    PreparedRequest {
        method: Method::POST,
        url,
        headers: headers.unwrap_or_default(),
        payload: Payload::Form(fields),
    }
}

/// JSON-body POST.
pub fn json_request(url: Url, body: Value, headers: Option<HeaderMap>) -> PreparedRequest {
    PreparedRequest {
        method: Method::POST,
        url,
        headers: headers.unwrap_or_default(),
        payload: Payload::Json(body),
    }
}

/// Header-only GET.
pub fn get_request(url: Url, headers: Option<HeaderMap>) -> PreparedRequest {
    PreparedRequest {
        method: Method::GET,
        url,
        headers: headers.unwrap_or_default(),
        payload: Payload::Empty,
    }
}

/// What came back from a single dispatch.
///
/// reqwest attaches no body to transport errors, so a request that never got
/// a response carries neither status nor body.
#[derive(Debug)]
pub enum RawResponse {
    /// A response with a readable body.
    Received { status: StatusCode, body: String },
    /// A response arrived but reading its body failed.
    Unreadable {
        status: StatusCode,
        error: reqwest::Error,
    },
    /// No response at all (DNS, connect, timeout, TLS).
    NoResponse(reqwest::Error),
}

impl RawResponse {
    /// The HTTP status, if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Received { status, .. } | Self::Unreadable { status, .. } => Some(*status),
            Self::NoResponse(_) => None,
        }
    }

    /// The raw body, if one was read.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Received { body, .. } => Some(body),
            Self::Unreadable { .. } | Self::NoResponse(_) => None,
        }
    }

    /// Apply the 200-only contract: decode the body on HTTP 200, fail otherwise.
    ///
    /// An empty 200 body decodes to `Value::Null`.
    pub fn into_json(self) -> Result<Value, Error> {
        match self {
            Self::NoResponse(err) => Err(Error::Transport(err)),
            Self::Unreadable { status, error: source } => Err(Error::ResponseBody {
                status: status.as_u16(),
                source,
            }),
            Self::Received { status, body } if status == StatusCode::OK => {
                if body.trim().is_empty() {
                    return Ok(Value::Null);
                }
                serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                    message: format!("{e} (body preview: {:?})", error::preview(&body)),
                    body,
                })
            }
            Self::Received { status, body } => Err(Error::Upstream {
                status: status.as_u16(),
                body,
            }),
        }
    }
}

//! Request and response records carried by every endpoint node.

use crate::table::ParameterCell;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const DEFAULT_VERSION: &str = "HTTP/1.1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct HttpRequest {
    pub method: String,
    /// Every path alias the operation is reachable by.
    pub uris: Vec<String>,
    pub query: Vec<QueryParam>,
    pub headers: Vec<Header>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub cells: Vec<ParameterCell>,
}

impl HttpRequest {
    /// `?a=1&b=2`, or empty when there are no query parameters.
    pub fn query_string(&self) -> String {
        if self.query.is_empty() {
            return String::new();
        }
        let pairs: Vec<String> = self
            .query
            .iter()
            .map(|q| format!("{}={}", q.name, q.value))
            .collect();
        format!("?{}", pairs.join("&"))
    }

    pub fn effective_headers(&self) -> IndexMap<&str, &str> {
        effective_headers(&self.headers)
    }

    pub fn has_body(&self) -> bool {
        self.body.as_deref().is_some_and(|b| !b.is_empty())
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct HttpResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub headers: Vec<Header>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub cells: Vec<ParameterCell>,
}

impl HttpResponse {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && !self.has_body() && self.cells.is_empty()
    }

    pub fn effective_headers(&self) -> IndexMap<&str, &str> {
        effective_headers(&self.headers)
    }

    pub fn has_body(&self) -> bool {
        self.body.as_deref().is_some_and(|b| !b.is_empty())
    }

    /// Status line tail, e.g. `200 OK`. Unknown codes render bare.
    pub fn status_text(&self) -> String {
        let Some(code) = self.status else {
            return "200 OK".to_string();
        };
        match http::StatusCode::from_u16(code)
            .ok()
            .and_then(|s| s.canonical_reason())
        {
            Some(reason) => format!("{} {}", code, reason),
            None => code.to_string(),
        }
    }
}

/// Collapse duplicate header names: the first occurrence keeps its position,
/// the last occurrence supplies the value.
fn effective_headers(headers: &[Header]) -> IndexMap<&str, &str> {
    let mut map = IndexMap::with_capacity(headers.len());
    for h in headers {
        map.insert(h.name.as_str(), h.value.as_str());
    }
    map
}
